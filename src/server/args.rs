//! Argument shapes for tools whose wrappers take plain parameters.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::api::messages::SendEmailInput;

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArgs {}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OptionalCalendarArgs {
    /// Calendar to read; the default calendar when omitted.
    #[serde(default)]
    pub calendar_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalendarIdArgs {
    pub calendar_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EventWindowArgs {
    #[serde(default)]
    pub calendar_id: Option<String>,
    /// Only events starting at or after this time.
    #[serde(default)]
    pub start_datetime: Option<String>,
    /// Only events ending at or before this time.
    #[serde(default)]
    pub end_datetime: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EventIdArgs {
    pub event_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ContactIdArgs {
    pub contact_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FolderTreeArgs {
    #[serde(default = "default_include_children")]
    pub include_child_folders: bool,
}

fn default_include_children() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FolderIdArgs {
    pub folder_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FolderIdsArgs {
    /// Up to 20 folder ids, fetched in one batch request.
    pub folder_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SendEmailsArgs {
    pub messages: Vec<SendEmailInput>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DraftIdArgs {
    pub draft_id: String,
}
