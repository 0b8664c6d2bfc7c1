use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};

use super::client::Endpoint;
use super::validation::{is_valid_email, present};

pub const PREFER_UTC: &str = "outlook.timezone=\"UTC\"";

pub fn events_endpoint(calendar_id: Option<&str>) -> Endpoint {
    match calendar_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Endpoint::me(["calendars"]).join(id).join("events"),
        None => Endpoint::me(["events"]),
    }
}

pub fn event_endpoint(id: &str) -> Endpoint {
    Endpoint::me(["events"]).join(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeType {
    Required,
    Optional,
}

/// Either a bare address or an address with its attendance type.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AttendeeInput {
    Address(String),
    Detailed {
        email: String,
        #[serde(default)]
        optional: bool,
    },
}

impl AttendeeInput {
    fn email(&self) -> &str {
        match self {
            Self::Address(email) | Self::Detailed { email, .. } => email.trim(),
        }
    }

    fn kind(&self) -> AttendeeType {
        match self {
            Self::Detailed { optional: true, .. } => AttendeeType::Optional,
            _ => AttendeeType::Required,
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEventInput {
    pub subject: String,
    /// Local start time, e.g. `2026-03-01T09:00:00`.
    pub start_datetime: String,
    pub end_datetime: String,
    #[serde(default = "default_time_zone")]
    pub start_timezone: String,
    #[serde(default = "default_time_zone")]
    pub end_timezone: String,
    #[serde(default)]
    pub body_content: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Addresses that fail syntax validation are dropped.
    #[serde(default)]
    pub attendees: Vec<AttendeeInput>,
    #[serde(default)]
    pub is_online_meeting: Option<bool>,
    /// Create in this calendar instead of the default one.
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub client_request_id: Option<String>,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

/// Keeps well-formed attendees in order; returns the rejected addresses separately.
pub fn attendee_payload(attendees: &[AttendeeInput]) -> (Vec<Value>, Vec<String>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for attendee in attendees {
        let email = attendee.email();
        if !is_valid_email(email) {
            rejected.push(email.to_string());
            continue;
        }

        let kind = match attendee.kind() {
            AttendeeType::Required => "required",
            AttendeeType::Optional => "optional",
        };
        accepted.push(json!({
            "emailAddress": { "address": email },
            "type": kind,
        }));
    }

    (accepted, rejected)
}

pub fn create_payload(input: &CreateEventInput) -> AppResult<Value> {
    if input.subject.trim().is_empty() {
        return Err(AppError::invalid("event subject must be a non-empty string"));
    }
    if input.start_datetime.trim().is_empty() || input.end_datetime.trim().is_empty() {
        return Err(AppError::invalid(
            "event start_datetime and end_datetime are required",
        ));
    }

    let mut payload = json!({
        "subject": input.subject.trim(),
        "start": { "dateTime": input.start_datetime.trim(), "timeZone": input.start_timezone },
        "end": { "dateTime": input.end_datetime.trim(), "timeZone": input.end_timezone },
    });

    if let Some(content) = present(&input.body_content) {
        payload["body"] = json!({ "contentType": "HTML", "content": content });
    }
    if let Some(location) = present(&input.location) {
        payload["location"] = json!({ "displayName": location });
    }
    if let Some(online) = input.is_online_meeting {
        payload["isOnlineMeeting"] = json!(online);
    }

    let (attendees, rejected) = attendee_payload(&input.attendees);
    for address in &rejected {
        tracing::warn!(address = %address, "skipping attendee with invalid email");
    }
    if !attendees.is_empty() {
        payload["attendees"] = Value::Array(attendees);
    }

    Ok(payload)
}

/// Quotes inside an OData string literal are doubled.
fn odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// OData filter restricting events to a start/end window; `None` when unbounded.
pub fn window_filter(start: Option<&str>, end: Option<&str>) -> Option<String> {
    let mut clauses = Vec::new();
    if let Some(start) = start.map(str::trim).filter(|s| !s.is_empty()) {
        clauses.push(format!("start/dateTime ge '{}'", odata_literal(start)));
    }
    if let Some(end) = end.map(str::trim).filter(|s| !s.is_empty()) {
        clauses.push(format!("end/dateTime le '{}'", odata_literal(end)));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" and "))
    }
}
