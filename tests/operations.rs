use outlook::api::calendars::CreateCalendarInput;
use outlook::api::messages::SendEmailInput;
use outlook::config::Settings;
use outlook::envelope::Status;
use outlook::tools::folders::FetchCompleteness;
use outlook::tools::{self, Outlook};
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONNECTION: &str = "conn-1";
const TOKEN: &str = "graph-token";

fn outlook_for(server: &MockServer) -> Outlook {
    let settings = Settings {
        broker_base_url: Some(server.uri()),
        broker_secret_key: Some("broker-secret".to_string()),
        connection_id: Some(CONNECTION.to_string()),
        graph_base_url: Some(format!("{}/v1.0", server.uri())),
        timeout_secs: Some(5),
        ..Settings::default()
    };
    Outlook::from_settings(&settings).expect("outlook builds")
}

async fn mount_broker(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/connection/{CONNECTION}")))
        .and(header("authorization", "Bearer broker-secret"))
        .and(query_param("provider_config_key", "outlook"))
        .and(query_param("refresh_token", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_token(server: &MockServer) {
    mount_broker(server, json!({"credentials": {"access_token": TOKEN}})).await;
}

fn send_input(to: &str) -> SendEmailInput {
    serde_json::from_value(json!({
        "subject": format!("Hello {to}"),
        "content": "<p>Hi</p>",
        "to_recipients": [to],
    }))
    .expect("send input")
}

#[tokio::test]
async fn lists_calendars_as_summaries() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendars"))
        .and(header("authorization", "Bearer graph-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "cal-1", "name": "Calendar", "owner": {"name": "Ada", "address": "ada@example.com"}},
                {"id": "cal-2", "name": "Birthdays"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = tools::calendars::get_all_calendars(&outlook_for(&server), None).await;

    assert!(envelope.error.is_none());
    let calendars = envelope.result.expect("calendars");
    assert_eq!(calendars.len(), 2);
    assert_eq!(calendars[0].owner.as_deref(), Some("Ada"));
    assert_eq!(calendars[1].owner, None);
}

#[tokio::test]
async fn missing_access_token_makes_no_graph_call() {
    let server = MockServer::start().await;
    mount_broker(&server, json!({"connection_id": CONNECTION, "credentials": {}})).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&server)
        .await;

    let envelope = tools::contacts::get_all_contacts(&outlook_for(&server), None).await;

    assert!(envelope.result.is_none());
    assert!(
        envelope
            .error
            .as_deref()
            .expect("error text")
            .contains("access token is missing")
    );
}

#[tokio::test]
async fn broker_failure_is_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/connection/{CONNECTION}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("connection not found"))
        .mount(&server)
        .await;

    let envelope = tools::drafts::get_draft_emails(&outlook_for(&server), None).await;

    let error = envelope.error.expect("error");
    assert!(error.starts_with("credential error"));
    assert!(error.contains("connection not found"));
}

#[tokio::test]
async fn oversized_calendar_name_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let input = CreateCalendarInput {
        name: "c".repeat(256),
        color: None,
        client_request_id: None,
    };
    let envelope = tools::calendars::create_calendar(&outlook_for(&server), None, input).await;

    assert!(envelope.result.is_none());
    assert!(envelope.error.expect("error").contains("at most 255"));
}

#[tokio::test]
async fn create_calendar_forwards_client_request_id() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1.0/me/calendars"))
        .and(header("client-request-id", "req-42"))
        .and(body_string_contains("\"name\":\"Team\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "cal-3", "name": "Team"})))
        .expect(1)
        .mount(&server)
        .await;

    let input = CreateCalendarInput {
        name: "Team".to_string(),
        color: None,
        client_request_id: Some("req-42".to_string()),
    };
    let envelope = tools::calendars::create_calendar(&outlook_for(&server), None, input).await;

    assert_eq!(envelope.result.expect("calendar")["id"], "cal-3");
}

#[tokio::test]
async fn batch_send_reports_each_message() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1.0/me/sendMail"))
        .and(body_string_contains("second@example.com"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": "ErrorInternalServerError", "message": "mailbox unavailable"}
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1.0/me/sendMail"))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&server)
        .await;

    let inputs = vec![
        send_input("first@example.com"),
        send_input("second@example.com"),
        send_input("third@example.com"),
    ];
    let envelope = tools::mail::send_emails(&outlook_for(&server), None, inputs).await;

    let outcomes = envelope.result.expect("per-message outcomes");
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].status, Status::Success);
    assert_eq!(outcomes[1].status, Status::Failed);
    assert!(
        outcomes[1]
            .error
            .as_deref()
            .expect("failure text")
            .contains("mailbox unavailable")
    );
    assert_eq!(outcomes[1].recipients, vec!["second@example.com".to_string()]);
    assert_eq!(outcomes[2].status, Status::Success);
}

#[tokio::test]
async fn folder_tree_marks_failed_children_as_partial() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/mailFolders"))
        .and(query_param("$top", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "inbox", "displayName": "Inbox", "childFolderCount": 1},
                {"id": "archive", "displayName": "Archive", "childFolderCount": 3}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/mailFolders/inbox/childFolders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "receipts", "displayName": "Receipts", "parentFolderId": "inbox"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/mailFolders/archive/childFolders"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let envelope = tools::folders::get_all_folders(&outlook_for(&server), None, true).await;

    assert!(envelope.error.is_none());
    let tree = envelope.result.expect("tree");
    assert_eq!(tree.folders.len(), 2);
    assert_eq!(tree.folders[0].child_folders[0].id, "receipts");
    assert!(tree.folders[1].child_folders.is_empty());
    assert_eq!(
        tree.fetch,
        FetchCompleteness::Partial {
            omitted: vec!["archive".to_string()]
        }
    );
}

#[tokio::test]
async fn many_folders_use_one_batch_call() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1.0/$batch"))
        .and(body_string_contains("/me/mailFolders/inbox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [
                {"id": "request_1", "status": 404, "body": {"error": {"code": "ErrorItemNotFound"}}},
                {"id": "request_0", "status": 200, "body": {"id": "inbox", "displayName": "Inbox"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec!["inbox".to_string(), "gone".to_string()];
    let envelope = tools::folders::get_many_folders(&outlook_for(&server), None, &ids).await;

    let results = envelope.result.expect("batch results");
    assert_eq!(results[0].id, "inbox");
    assert_eq!(results[0].status, 200);
    assert_eq!(results[1].id, "gone");
    assert_eq!(results[1].status, 404);
}

#[tokio::test]
async fn delete_contact_requires_no_content() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/v1.0/me/contacts/c-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.0/me/contacts/c-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let outlook = outlook_for(&server);
    let deleted = tools::contacts::delete_contact(&outlook, None, "c-1").await;
    assert_eq!(deleted.result.as_deref(), Some("Contact deleted successfully"));

    let rejected = tools::contacts::delete_contact(&outlook, None, "c-2").await;
    assert!(rejected.result.is_none());
    assert!(rejected.error.expect("error").contains("unexpected status code: 200"));
}

#[tokio::test]
async fn unauthorized_graph_call_is_authentication_failure() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/calendar"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "InvalidAuthenticationToken", "message": "Access token is empty."}
        })))
        .mount(&server)
        .await;

    let envelope = tools::calendars::get_calendar_details(&outlook_for(&server), None, None).await;

    assert!(envelope.error.expect("error").starts_with("authentication failed"));
}

#[tokio::test]
async fn draft_lifecycle_uses_status_envelopes() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1.0/me/messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "draft-1", "isDraft": true})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/messages/draft-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "draft-1", "subject": "Draft"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1.0/me/messages/draft-1/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.0/me/messages/draft-2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ErrorItemNotFound", "message": "The specified object was not found in the store."}
        })))
        .mount(&server)
        .await;

    let outlook = outlook_for(&server);
    let message = serde_json::from_value(json!({
        "subject": "Draft",
        "content": "Body",
        "to_recipients": ["ada@example.com"]
    }))
    .expect("message input");

    let created = tools::drafts::create_draft_email(&outlook, None, message).await;
    assert_eq!(created.status, Status::Success);
    assert_eq!(created.draft_id.as_deref(), Some("draft-1"));

    let fetched = tools::drafts::get_draft(&outlook, None, "draft-1").await;
    assert!(fetched.is_ok());
    assert_eq!(fetched.draft.expect("draft")["subject"], "Draft");

    let sent = tools::drafts::send_draft_email(&outlook, None, "draft-1").await;
    assert!(sent.is_ok());

    let missing = tools::drafts::delete_draft_email(&outlook, None, "draft-2").await;
    assert_eq!(missing.status, Status::Failed);
    assert_eq!(missing.draft_id.as_deref(), Some("draft-2"));
    assert!(missing.error.expect("error").contains("not found"));
}

#[tokio::test]
async fn explicit_connection_overrides_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/connection/other-conn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {"access_token": "other-token"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/me/events/evt-1"))
        .and(header("authorization", "Bearer other-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "evt-1",
            "subject": "Review",
            "isOnlineMeeting": true,
            "onlineMeetingProvider": "teamsForBusiness",
            "onlineMeeting": {"joinUrl": "https://teams.example/join"}
        })))
        .mount(&server)
        .await;

    let envelope =
        tools::events::get_event_details(&outlook_for(&server), Some("other-conn"), "evt-1").await;

    let details = envelope.result.expect("details");
    let meeting = details.online_meeting.expect("online meeting");
    assert_eq!(meeting.provider.as_deref(), Some("teamsForBusiness"));
    assert_eq!(meeting.join_url.as_deref(), Some("https://teams.example/join"));
}
