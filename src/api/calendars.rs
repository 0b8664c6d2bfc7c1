use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{AppError, AppResult};

use super::client::Endpoint;
use super::validation::present;

pub const MAX_CALENDAR_NAME_CHARS: usize = 255;

pub fn calendars_endpoint() -> Endpoint {
    Endpoint::me(["calendars"])
}

pub fn calendar_endpoint(id: &str) -> Endpoint {
    calendars_endpoint().join(id)
}

/// The signed-in user's primary calendar.
pub fn default_calendar_endpoint() -> Endpoint {
    Endpoint::me(["calendar"])
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCalendarInput {
    /// Name of the new calendar, 1 to 255 characters.
    pub name: String,
    /// Graph calendar color such as `auto`, `lightBlue` or `lightGreen`.
    #[serde(default)]
    pub color: Option<String>,
    /// Correlation id forwarded as the `client-request-id` header.
    #[serde(default)]
    pub client_request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateCalendarInput {
    pub calendar_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Make this the user's default calendar.
    #[serde(default)]
    pub is_default_calendar: Option<bool>,
}

pub fn validate_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid("calendar name must be a non-empty string"));
    }
    if trimmed.chars().count() > MAX_CALENDAR_NAME_CHARS {
        return Err(AppError::invalid(format!(
            "calendar name must be at most {MAX_CALENDAR_NAME_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

pub fn create_payload(input: &CreateCalendarInput) -> AppResult<Value> {
    let name = validate_name(&input.name)?;
    let mut payload = json!({ "name": name });
    if let Some(color) = present(&input.color) {
        payload["color"] = json!(color);
    }
    Ok(payload)
}

pub fn update_payload(input: &UpdateCalendarInput) -> AppResult<Value> {
    let mut payload = Map::new();
    if let Some(name) = input.name.as_deref() {
        let name = validate_name(name)?;
        payload.insert("name".into(), json!(name));
    }
    if let Some(color) = present(&input.color) {
        payload.insert("color".into(), json!(color));
    }
    if let Some(is_default) = input.is_default_calendar {
        payload.insert("isDefaultCalendar".into(), json!(is_default));
    }

    if payload.is_empty() {
        return Err(AppError::invalid(
            "no properties provided to update the calendar",
        ));
    }
    Ok(Value::Object(payload))
}
