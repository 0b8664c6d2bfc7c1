use outlook::config::Settings;
use outlook::server::{self, ToolRegistry};
use outlook::tools::Outlook;
use serde_json::{Value, json};

fn offline_outlook() -> Outlook {
    Outlook::from_settings(&Settings::default()).expect("outlook builds")
}

async fn exchange(lines: &[Value]) -> Vec<Value> {
    let input: String = lines
        .iter()
        .map(|line| format!("{line}\n"))
        .collect();
    let registry = ToolRegistry::new();
    let outlook = offline_outlook();
    let mut output = Vec::new();

    server::serve(&registry, &outlook, input.as_bytes(), &mut output)
        .await
        .expect("serve loop");

    String::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response json"))
        .collect()
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let responses = exchange(&[json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {"protocolVersion": "2025-03-26", "clientInfo": {"name": "inspector"}}
    })])
    .await;

    assert_eq!(responses.len(), 1);
    let result = &responses[0]["result"];
    assert_eq!(result["serverInfo"]["name"], "outlook");
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn tools_list_exposes_every_tool() {
    let responses = exchange(&[json!({"jsonrpc": "2.0", "id": "list", "method": "tools/list"})]).await;

    let tools = responses[0]["result"]["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 29);
    let send = tools
        .iter()
        .find(|tool| tool["name"] == "send_emails")
        .expect("send_emails listed");
    assert_eq!(send["inputSchema"]["type"], "object");
    assert!(send["inputSchema"]["properties"]["connection_id"].is_object());
}

#[tokio::test]
async fn unknown_tool_is_an_error_result_and_loop_continues() {
    let responses = exchange(&[
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "foo", "arguments": {"x": 1}}
        }),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
    ])
    .await;

    assert_eq!(responses.len(), 2);
    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().expect("text content");
    let payload: Value = serde_json::from_str(text).expect("payload json");
    assert_eq!(payload["error"], "Unknown tool: foo");
    assert_eq!(payload["tool"], "foo");

    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"], json!({}));
}

#[tokio::test]
async fn tool_without_connection_fails_inside_its_envelope() {
    let responses = exchange(&[json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": {"name": "get_all_calendars", "arguments": {}}
    })])
    .await;

    let result = &responses[0]["result"];
    assert_eq!(result["isError"], true);
    let payload: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().expect("text")).expect("payload");
    assert!(payload["result"].is_null());
    assert!(
        payload["error"]
            .as_str()
            .expect("error text")
            .contains("no connection id")
    );
}

#[tokio::test]
async fn malformed_lines_and_unknown_methods_get_rpc_errors() {
    let registry = ToolRegistry::new();
    let outlook = offline_outlook();
    let input = "not json\n\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"resources/list\"}\n";
    let mut output = Vec::new();

    server::serve(&registry, &outlook, input.as_bytes(), &mut output)
        .await
        .expect("serve loop");

    let responses: Vec<Value> = String::from_utf8(output)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("json"))
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["error"]["code"], -32601);
    assert_eq!(responses[1]["id"], 3);
}

#[tokio::test]
async fn notifications_get_no_reply() {
    let registry = ToolRegistry::new();
    let outlook = offline_outlook();

    let reply = server::handle_line(
        &registry,
        &outlook,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn wrong_protocol_version_is_invalid_request() {
    let registry = ToolRegistry::new();
    let outlook = offline_outlook();

    let reply = server::handle_line(&registry, &outlook, r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#)
        .await
        .expect("reply");

    let value = serde_json::to_value(reply).expect("encode");
    assert_eq!(value["error"]["code"], -32600);
}

#[tokio::test]
async fn null_id_is_a_request_not_a_notification() {
    let registry = ToolRegistry::new();
    let outlook = offline_outlook();

    let reply = server::handle_line(&registry, &outlook, r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
        .await
        .expect("reply for explicit null id");

    let value = serde_json::to_value(reply).expect("encode");
    assert!(value["id"].is_null());
    assert_eq!(value["result"], json!({}));
}
