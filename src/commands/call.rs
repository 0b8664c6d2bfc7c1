use std::fs;

use serde_json::{Map, Value};

use crate::cli::CallArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::output::OutputMode;
use crate::server::registry::CONNECTION_ID_ARG;

pub async fn run(ctx: &AppContext, args: CallArgs) -> AppResult<()> {
    let raw = match (&args.args, &args.args_file) {
        (Some(inline), _) => Some(inline.clone()),
        (None, Some(path)) => Some(fs::read_to_string(path)?),
        (None, None) => None,
    };
    let arguments = parse_arguments(raw.as_deref())?;

    let response = ctx
        .registry
        .call_tool(&ctx.outlook, &args.tool, arguments)
        .await;

    if ctx.output.mode() == OutputMode::Json {
        ctx.output.emit("", &response)?;
    } else {
        for content in &response.content {
            println!("{}", content.text);
        }
    }

    if response.is_error {
        return Err(AppError::ToolFailed(args.tool));
    }
    Ok(())
}

/// Parses `--args`; an absent or blank value means no arguments.
fn parse_arguments(raw: Option<&str>) -> AppResult<Value> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Value::Object(Map::new()));
    };

    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => {
            if let Some(id) = map.get(CONNECTION_ID_ARG) {
                tracing::debug!(connection_id = %id, "connection id given in arguments");
            }
            Ok(Value::Object(map))
        }
        other => Err(AppError::InvalidInput(format!(
            "--args must be a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arguments_become_empty_object() {
        assert_eq!(parse_arguments(None).expect("parse"), Value::Object(Map::new()));
        assert_eq!(parse_arguments(Some("  ")).expect("parse"), Value::Object(Map::new()));
    }

    #[test]
    fn rejects_non_object_arguments() {
        match parse_arguments(Some("[1, 2]")) {
            Err(AppError::InvalidInput(message)) => assert!(message.contains("JSON object")),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn keeps_object_arguments() {
        let value = parse_arguments(Some(r#"{"calendar_id":"cal-1"}"#)).expect("parse");
        assert_eq!(value["calendar_id"], "cal-1");
    }
}
