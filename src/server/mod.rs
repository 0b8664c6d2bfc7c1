pub mod args;
pub mod protocol;
pub mod registry;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::AppResult;
use crate::tools::Outlook;

use protocol::{
    INVALID_PARAMS, INVALID_REQUEST, InitializeRequest, InitializeResponse, JsonRpcRequest, JsonRpcResponse,
    MCP_PROTOCOL_VERSION, METHOD_NOT_FOUND, PARSE_ERROR, ServerCapabilities, ServerInfo, ToolsCallRequest,
    ToolsCapabilities, error, success,
};
pub use registry::ToolRegistry;

pub const SERVER_NAME: &str = "outlook";

pub fn handle_initialize(request: InitializeRequest) -> InitializeResponse {
    if let Some(client) = &request.client_info {
        tracing::info!(
            client = %client.name,
            requested_version = ?request.protocol_version,
            "client initialized"
        );
    }

    InitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapabilities { list_changed: false },
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: "Outlook mail, calendar and contact tools backed by Microsoft Graph. Every tool accepts an optional connection_id; confirm before calling delete or send tools.".to_string(),
    }
}

/// Serves tool calls over stdin/stdout until stdin closes.
pub async fn serve_stdio(registry: &ToolRegistry, outlook: &Outlook) -> AppResult<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(registry, outlook, reader, writer).await
}

/// Newline-delimited JSON-RPC loop. One request is handled at a time and
/// a failing request never ends the loop; only I/O errors do.
pub async fn serve<R, W>(registry: &ToolRegistry, outlook: &Outlook, mut reader: R, mut writer: W) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!(tools = registry.tools().len(), "tool server listening on stdio");
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(response) = handle_line(registry, outlook, trimmed).await {
            writer.write_all(serde_json::to_string(&response)?.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Returns `None` for notifications, which get no reply.
pub async fn handle_line(registry: &ToolRegistry, outlook: &Outlook, line: &str) -> Option<JsonRpcResponse> {
    let request = match serde_json::from_str::<JsonRpcRequest>(line) {
        Ok(request) => request,
        Err(err) => {
            return Some(error(Value::Null, PARSE_ERROR, format!("parse error: {err}")));
        }
    };

    let Some(id) = request.id.clone() else {
        tracing::debug!(method = %request.method, "notification received");
        return None;
    };

    if request.jsonrpc != "2.0" {
        return Some(error(id, INVALID_REQUEST, "jsonrpc must be \"2.0\""));
    }

    let response = match request.method.as_str() {
        "initialize" => match serde_json::from_value::<InitializeRequest>(request.params) {
            Ok(init) => encode(id, handle_initialize(init)),
            Err(err) => error(id, INVALID_PARAMS, format!("invalid initialize params: {err}")),
        },
        "ping" => success(id, json!({})),
        "tools/list" => encode(id, registry.list_response()),
        "tools/call" => match serde_json::from_value::<ToolsCallRequest>(request.params) {
            Ok(call) => {
                tracing::info!(tool = %call.name, "tool call");
                let result = registry.call_tool(outlook, &call.name, call.arguments).await;
                encode(id, result)
            }
            Err(err) => error(id, INVALID_PARAMS, format!("invalid tools/call params: {err}")),
        },
        "notifications/initialized" => success(id, json!({})),
        other => error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    };
    Some(response)
}

fn encode<T: serde::Serialize>(id: Value, payload: T) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(result) => success(id, result),
        Err(err) => error(id, protocol::INTERNAL_ERROR, format!("failed to encode response: {err}")),
    }
}
