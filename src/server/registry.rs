use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::api::calendars::{CreateCalendarInput, UpdateCalendarInput};
use crate::api::contacts::{CreateContactInput, UpdateContactInput};
use crate::api::events::CreateEventInput;
use crate::api::folders::{CreateFolderInput, UpdateFolderInput};
use crate::api::messages::{MessageInput, SendEmailInput, UpdateDraftInput};
use crate::tools::{self, Outlook};

use super::args::*;
use super::protocol::{McpTool, ToolAnnotations, ToolsCallResponse, ToolsListResponse};

pub const CONNECTION_ID_ARG: &str = "connection_id";

struct ToolSpec {
    name: &'static str,
    description: &'static str,
    read_only: bool,
    destructive: bool,
    schema: fn() -> Value,
}

const fn read(name: &'static str, description: &'static str, schema: fn() -> Value) -> ToolSpec {
    ToolSpec {
        name,
        description,
        read_only: true,
        destructive: false,
        schema,
    }
}

const fn write(name: &'static str, description: &'static str, schema: fn() -> Value) -> ToolSpec {
    ToolSpec {
        name,
        description,
        read_only: false,
        destructive: false,
        schema,
    }
}

const fn destroy(name: &'static str, description: &'static str, schema: fn() -> Value) -> ToolSpec {
    ToolSpec {
        name,
        description,
        read_only: false,
        destructive: true,
        schema,
    }
}

static CATALOG: &[ToolSpec] = &[
    read("get_all_calendars", "List the user's calendars with id, name and owner.", schema_of::<NoArgs>),
    read(
        "get_calendar_details",
        "Get one calendar by id, or the default calendar when no id is given.",
        schema_of::<OptionalCalendarArgs>,
    ),
    write("create_calendar", "Create a calendar.", schema_of::<CreateCalendarInput>),
    write("update_calendar", "Rename, recolor or make a calendar the default.", schema_of::<UpdateCalendarInput>),
    destroy("delete_calendar", "Delete a calendar.", schema_of::<CalendarIdArgs>),
    read(
        "get_all_events",
        "List events with subject, times, organizer, location and attendees.",
        schema_of::<OptionalCalendarArgs>,
    ),
    read(
        "get_many_events",
        "List raw events, optionally limited to a start/end window.",
        schema_of::<EventWindowArgs>,
    ),
    read("get_event_details", "Get full details of one event, times in UTC.", schema_of::<EventIdArgs>),
    write("create_event", "Create an event; invalid attendee addresses are skipped.", schema_of::<CreateEventInput>),
    destroy("delete_event", "Delete an event.", schema_of::<EventIdArgs>),
    write("create_contact", "Create a contact.", schema_of::<CreateContactInput>),
    read("get_all_contacts", "List contacts with names, addresses and phones.", schema_of::<NoArgs>),
    read("get_contact_details", "Get one contact by id.", schema_of::<ContactIdArgs>),
    write("update_contact", "Update fields of a contact.", schema_of::<UpdateContactInput>),
    destroy("delete_contact", "Delete a contact.", schema_of::<ContactIdArgs>),
    read(
        "get_all_folders",
        "List mail folders, optionally with their child folders.",
        schema_of::<FolderTreeArgs>,
    ),
    read("get_folder_details", "Get one mail folder by id.", schema_of::<FolderIdArgs>),
    write("create_folder", "Create a mail folder, optionally under a parent.", schema_of::<CreateFolderInput>),
    write("update_folder", "Rename or move a mail folder.", schema_of::<UpdateFolderInput>),
    destroy("delete_folder", "Delete a mail folder.", schema_of::<FolderIdArgs>),
    read("get_many_folders", "Get several mail folders in one batch request.", schema_of::<FolderIdsArgs>),
    write("send_email", "Send one email.", schema_of::<SendEmailInput>),
    write("send_emails", "Send several emails; each is reported separately.", schema_of::<SendEmailsArgs>),
    write("create_draft_email", "Save a new draft email.", schema_of::<MessageInput>),
    read("get_draft", "Get one draft by id.", schema_of::<DraftIdArgs>),
    read("get_draft_emails", "List drafts in the drafts folder.", schema_of::<NoArgs>),
    write("update_draft_email", "Update fields of a draft.", schema_of::<UpdateDraftInput>),
    destroy("delete_draft_email", "Delete a draft.", schema_of::<DraftIdArgs>),
    write("send_draft_email", "Send an existing draft.", schema_of::<DraftIdArgs>),
];

/// JSON schema for `T`, with the shared `connection_id` argument added.
fn schema_of<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T))
        .unwrap_or_else(|_| json!({ "type": "object" }));

    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
        let properties = object
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(properties) = properties.as_object_mut() {
            properties.insert(
                CONNECTION_ID_ARG.to_string(),
                json!({
                    "type": "string",
                    "description": "Credential broker connection id. Defaults to the configured connection."
                }),
            );
        }
    }
    schema
}

#[derive(Debug)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidArguments(String),
    Encoding(String),
}

impl ToolCallError {
    fn message(&self) -> String {
        match self {
            Self::UnknownTool(name) => format!("Unknown tool: {name}"),
            Self::InvalidArguments(message) => format!("Invalid arguments: {message}"),
            Self::Encoding(message) => format!("Failed to encode result: {message}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<McpTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let tools = CATALOG
            .iter()
            .map(|spec| McpTool {
                name: spec.name.to_string(),
                description: spec.description.to_string(),
                input_schema: (spec.schema)(),
                annotations: Some(ToolAnnotations {
                    read_only_hint: Some(spec.read_only),
                    destructive_hint: Some(spec.destructive),
                    open_world_hint: Some(true),
                }),
            })
            .collect();
        Self { tools }
    }

    pub fn tools(&self) -> &[McpTool] {
        &self.tools
    }

    pub fn list_response(&self) -> ToolsListResponse {
        ToolsListResponse {
            tools: self.tools.clone(),
        }
    }

    /// Runs a tool and renders its envelope as text. Never fails: unknown
    /// tools and bad arguments come back as error results.
    pub async fn call_tool(&self, outlook: &Outlook, name: &str, arguments: Value) -> ToolsCallResponse {
        match dispatch(outlook, name, arguments.clone()).await {
            Ok(value) => {
                let is_error = envelope_failed(&value);
                ToolsCallResponse::text(render(&value), is_error)
            }
            Err(err) => {
                tracing::warn!(tool = name, error = %err.message(), "tool call rejected");
                let body = json!({
                    "error": err.message(),
                    "tool": name,
                    "arguments": arguments,
                });
                ToolsCallResponse::text(render(&body), true)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn envelope_failed(value: &Value) -> bool {
    let has_error = value.get("error").is_some_and(|error| !error.is_null());
    let failed_status = value.get("status").and_then(Value::as_str) == Some("failed");
    has_error || failed_status
}

fn take_connection_id(arguments: &mut Map<String, Value>) -> Result<Option<String>, ToolCallError> {
    match arguments.remove(CONNECTION_ID_ARG) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(other) => Err(ToolCallError::InvalidArguments(format!(
            "{CONNECTION_ID_ARG} must be a string, got {other}"
        ))),
    }
}

fn parse<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, ToolCallError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|err| ToolCallError::InvalidArguments(err.to_string()))
}

fn encode<T: Serialize>(envelope: T) -> Result<Value, ToolCallError> {
    serde_json::to_value(envelope).map_err(|err| ToolCallError::Encoding(err.to_string()))
}

async fn dispatch(outlook: &Outlook, name: &str, arguments: Value) -> Result<Value, ToolCallError> {
    let mut arguments = match arguments {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(ToolCallError::InvalidArguments(format!(
                "arguments must be an object, got {other}"
            )));
        }
    };
    let connection_id = take_connection_id(&mut arguments)?;
    let conn = connection_id.as_deref();

    match name {
        "get_all_calendars" => {
            parse::<NoArgs>(arguments)?;
            encode(tools::calendars::get_all_calendars(outlook, conn).await)
        }
        "get_calendar_details" => {
            let args: OptionalCalendarArgs = parse(arguments)?;
            encode(tools::calendars::get_calendar_details(outlook, conn, args.calendar_id.as_deref()).await)
        }
        "create_calendar" => encode(tools::calendars::create_calendar(outlook, conn, parse(arguments)?).await),
        "update_calendar" => encode(tools::calendars::update_calendar(outlook, conn, parse(arguments)?).await),
        "delete_calendar" => {
            let args: CalendarIdArgs = parse(arguments)?;
            encode(tools::calendars::delete_calendar(outlook, conn, &args.calendar_id).await)
        }
        "get_all_events" => {
            let args: OptionalCalendarArgs = parse(arguments)?;
            encode(tools::events::get_all_events(outlook, conn, args.calendar_id.as_deref()).await)
        }
        "get_many_events" => {
            let args: EventWindowArgs = parse(arguments)?;
            encode(
                tools::events::get_many_events(
                    outlook,
                    conn,
                    args.calendar_id.as_deref(),
                    args.start_datetime.as_deref(),
                    args.end_datetime.as_deref(),
                )
                .await,
            )
        }
        "get_event_details" => {
            let args: EventIdArgs = parse(arguments)?;
            encode(tools::events::get_event_details(outlook, conn, &args.event_id).await)
        }
        "create_event" => encode(tools::events::create_event(outlook, conn, parse(arguments)?).await),
        "delete_event" => {
            let args: EventIdArgs = parse(arguments)?;
            encode(tools::events::delete_event(outlook, conn, &args.event_id).await)
        }
        "create_contact" => encode(tools::contacts::create_contact(outlook, conn, parse(arguments)?).await),
        "get_all_contacts" => {
            parse::<NoArgs>(arguments)?;
            encode(tools::contacts::get_all_contacts(outlook, conn).await)
        }
        "get_contact_details" => {
            let args: ContactIdArgs = parse(arguments)?;
            encode(tools::contacts::get_contact_details(outlook, conn, &args.contact_id).await)
        }
        "update_contact" => encode(tools::contacts::update_contact(outlook, conn, parse(arguments)?).await),
        "delete_contact" => {
            let args: ContactIdArgs = parse(arguments)?;
            encode(tools::contacts::delete_contact(outlook, conn, &args.contact_id).await)
        }
        "get_all_folders" => {
            let args: FolderTreeArgs = parse(arguments)?;
            encode(tools::folders::get_all_folders(outlook, conn, args.include_child_folders).await)
        }
        "get_folder_details" => {
            let args: FolderIdArgs = parse(arguments)?;
            encode(tools::folders::get_folder_details(outlook, conn, &args.folder_id).await)
        }
        "create_folder" => encode(tools::folders::create_folder(outlook, conn, parse(arguments)?).await),
        "update_folder" => encode(tools::folders::update_folder(outlook, conn, parse(arguments)?).await),
        "delete_folder" => {
            let args: FolderIdArgs = parse(arguments)?;
            encode(tools::folders::delete_folder(outlook, conn, &args.folder_id).await)
        }
        "get_many_folders" => {
            let args: FolderIdsArgs = parse(arguments)?;
            encode(tools::folders::get_many_folders(outlook, conn, &args.folder_ids).await)
        }
        "send_email" => encode(tools::mail::send_email(outlook, conn, parse(arguments)?).await),
        "send_emails" => {
            let args: SendEmailsArgs = parse(arguments)?;
            encode(tools::mail::send_emails(outlook, conn, args.messages).await)
        }
        "create_draft_email" => encode(tools::drafts::create_draft_email(outlook, conn, parse(arguments)?).await),
        "get_draft" => {
            let args: DraftIdArgs = parse(arguments)?;
            encode(tools::drafts::get_draft(outlook, conn, &args.draft_id).await)
        }
        "get_draft_emails" => {
            parse::<NoArgs>(arguments)?;
            encode(tools::drafts::get_draft_emails(outlook, conn).await)
        }
        "update_draft_email" => encode(tools::drafts::update_draft_email(outlook, conn, parse(arguments)?).await),
        "delete_draft_email" => {
            let args: DraftIdArgs = parse(arguments)?;
            encode(tools::drafts::delete_draft_email(outlook, conn, &args.draft_id).await)
        }
        "send_draft_email" => {
            let args: DraftIdArgs = parse(arguments)?;
            encode(tools::drafts::send_draft_email(outlook, conn, &args.draft_id).await)
        }
        _ => Err(ToolCallError::UnknownTool(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::Settings;

    fn unconfigured() -> Outlook {
        Outlook::from_settings(&Settings::default()).expect("outlook builds")
    }

    #[test]
    fn catalog_names_are_unique() {
        let names: HashSet<&str> = CATALOG.iter().map(|spec| spec.name).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 29);
    }

    #[test]
    fn every_schema_accepts_connection_id() {
        for tool in ToolRegistry::new().tools() {
            assert_eq!(
                tool.input_schema["properties"][CONNECTION_ID_ARG]["type"], "string",
                "{} is missing connection_id",
                tool.name
            );
        }
    }

    #[test]
    fn create_calendar_schema_requires_name() {
        let registry = ToolRegistry::new();
        let tool = registry
            .tools()
            .iter()
            .find(|tool| tool.name == "create_calendar")
            .expect("create_calendar is registered");

        let required = tool.input_schema["required"].as_array().expect("required list");
        assert!(required.iter().any(|field| field == "name"));
    }

    #[tokio::test]
    async fn every_catalog_entry_has_a_handler() {
        let outlook = unconfigured();
        for spec in CATALOG {
            let outcome = dispatch(&outlook, spec.name, json!({})).await;
            assert!(
                !matches!(outcome, Err(ToolCallError::UnknownTool(_))),
                "{} has no handler",
                spec.name
            );
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let response = ToolRegistry::new()
            .call_tool(&unconfigured(), "foo", json!({"x": 1}))
            .await;

        assert!(response.is_error);
        let body: Value = serde_json::from_str(&response.content[0].text).expect("json text");
        assert_eq!(body["error"], "Unknown tool: foo");
        assert_eq!(body["tool"], "foo");
        assert_eq!(body["arguments"], json!({"x": 1}));
    }

    #[tokio::test]
    async fn missing_connection_is_reported_in_the_envelope() {
        let response = ToolRegistry::new()
            .call_tool(&unconfigured(), "get_all_calendars", Value::Null)
            .await;

        assert!(response.is_error);
        let body: Value = serde_json::from_str(&response.content[0].text).expect("json text");
        assert!(body["result"].is_null());
        assert!(body["error"].as_str().expect("error text").contains("connection"));
    }

    #[tokio::test]
    async fn non_string_connection_id_is_rejected() {
        let outcome = dispatch(&unconfigured(), "get_all_contacts", json!({"connection_id": 7})).await;
        assert!(matches!(outcome, Err(ToolCallError::InvalidArguments(_))));
    }
}
