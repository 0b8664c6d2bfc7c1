use crate::cli::ToolsArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::output::OutputMode;

pub fn run(ctx: &AppContext, args: ToolsArgs) -> AppResult<()> {
    let tools = ctx.registry.tools();

    if ctx.output.mode() == OutputMode::Json {
        if args.schema {
            return ctx.output.emit("", tools);
        }
        let listing: Vec<_> = tools
            .iter()
            .map(|tool| serde_json::json!({ "name": tool.name, "description": tool.description }))
            .collect();
        return ctx.output.emit("", &listing);
    }

    let width = tools.iter().map(|tool| tool.name.len()).max().unwrap_or(0);
    for tool in tools {
        println!("{:width$}  {}", tool.name, tool.description);
        if args.schema {
            println!("{}", serde_json::to_string_pretty(&tool.input_schema)?);
            println!();
        }
    }
    Ok(())
}
