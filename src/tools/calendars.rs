use serde_json::Value;

use crate::api::calendars::{self, CreateCalendarInput, UpdateCalendarInput};
use crate::api::models::{CalendarSummary, GraphCalendar, ListResponse};
use crate::api::GraphRequest;
use crate::envelope::Envelope;
use crate::error::{AppResult, require_id};

use super::Outlook;

impl Outlook {
    pub async fn list_calendars(&self, connection_id: Option<&str>) -> AppResult<Vec<CalendarSummary>> {
        let token = self.access_token(connection_id).await?;
        let body = self
            .graph()
            .send_json(&token, GraphRequest::get(calendars::calendars_endpoint()))
            .await?;
        let list: ListResponse<GraphCalendar> = serde_json::from_value(body)?;
        tracing::info!(count = list.value.len(), "fetched calendars");
        Ok(list.value.into_iter().map(CalendarSummary::from).collect())
    }

    pub async fn calendar(&self, connection_id: Option<&str>, calendar_id: Option<&str>) -> AppResult<Value> {
        let endpoint = match calendar_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => calendars::calendar_endpoint(id),
            None => calendars::default_calendar_endpoint(),
        };
        let token = self.access_token(connection_id).await?;
        self.graph().send_json(&token, GraphRequest::get(endpoint)).await
    }

    pub async fn create_calendar(&self, connection_id: Option<&str>, input: &CreateCalendarInput) -> AppResult<Value> {
        let payload = calendars::create_payload(input)?;
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::post(calendars::calendars_endpoint(), payload)
            .client_request_id(input.client_request_id.as_deref());
        let calendar = self.graph().send_json(&token, request).await?;
        tracing::info!(id = ?calendar.get("id"), "created calendar");
        Ok(calendar)
    }

    pub async fn update_calendar(&self, connection_id: Option<&str>, input: &UpdateCalendarInput) -> AppResult<Value> {
        let calendar_id = require_id("calendar_id", &input.calendar_id)?;
        let payload = calendars::update_payload(input)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .send_json(&token, GraphRequest::patch(calendars::calendar_endpoint(calendar_id), payload))
            .await
    }

    pub async fn delete_calendar(&self, connection_id: Option<&str>, calendar_id: &str) -> AppResult<()> {
        let calendar_id = require_id("calendar_id", calendar_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(&token, GraphRequest::delete(calendars::calendar_endpoint(calendar_id)))
            .await?;
        tracing::info!(calendar_id, "deleted calendar");
        Ok(())
    }
}

pub async fn get_all_calendars(outlook: &Outlook, connection_id: Option<&str>) -> Envelope<Vec<CalendarSummary>> {
    Envelope::finish("get_all_calendars", outlook.list_calendars(connection_id).await)
}

/// Without an id, returns the user's default calendar.
pub async fn get_calendar_details(
    outlook: &Outlook,
    connection_id: Option<&str>,
    calendar_id: Option<&str>,
) -> Envelope<Value> {
    Envelope::finish("get_calendar_details", outlook.calendar(connection_id, calendar_id).await)
}

pub async fn create_calendar(
    outlook: &Outlook,
    connection_id: Option<&str>,
    input: CreateCalendarInput,
) -> Envelope<Value> {
    Envelope::finish("create_calendar", outlook.create_calendar(connection_id, &input).await)
}

pub async fn update_calendar(
    outlook: &Outlook,
    connection_id: Option<&str>,
    input: UpdateCalendarInput,
) -> Envelope<Value> {
    Envelope::finish("update_calendar", outlook.update_calendar(connection_id, &input).await)
}

pub async fn delete_calendar(outlook: &Outlook, connection_id: Option<&str>, calendar_id: &str) -> Envelope<String> {
    let outcome = outlook.delete_calendar(connection_id, calendar_id).await;
    Envelope::finish(
        "delete_calendar",
        outcome.map(|()| "Calendar deleted successfully".to_string()),
    )
}
