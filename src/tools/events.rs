use serde_json::Value;

use crate::api::events::{self, CreateEventInput, PREFER_UTC};
use crate::api::models::{EventDetails, EventSummary, GraphEvent, ListResponse};
use crate::api::GraphRequest;
use crate::envelope::Envelope;
use crate::error::{AppResult, require_id};

use super::Outlook;

impl Outlook {
    pub async fn list_events(&self, connection_id: Option<&str>, calendar_id: Option<&str>) -> AppResult<Vec<EventSummary>> {
        let token = self.access_token(connection_id).await?;
        let body = self
            .graph()
            .send_json(&token, GraphRequest::get(events::events_endpoint(calendar_id)))
            .await?;
        let list: ListResponse<GraphEvent> = serde_json::from_value(body)?;
        tracing::info!(count = list.value.len(), "fetched events");
        Ok(list.value.into_iter().map(EventSummary::from).collect())
    }

    /// Raw events, optionally bounded to a start/end window.
    pub async fn events_in_window(
        &self,
        connection_id: Option<&str>,
        calendar_id: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> AppResult<Vec<Value>> {
        let token = self.access_token(connection_id).await?;
        let mut request = GraphRequest::get(events::events_endpoint(calendar_id));
        if let Some(filter) = events::window_filter(start, end) {
            request = request.query("$filter", filter);
        }

        let body = self.graph().send_json(&token, request).await?;
        let list: ListResponse<Value> = serde_json::from_value(body)?;
        Ok(list.value)
    }

    pub async fn event(&self, connection_id: Option<&str>, event_id: &str) -> AppResult<EventDetails> {
        let event_id = require_id("event_id", event_id)?;
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::get(events::event_endpoint(event_id)).header("Prefer", PREFER_UTC);
        let body = self.graph().send_json(&token, request).await?;
        let event: GraphEvent = serde_json::from_value(body)?;
        Ok(EventDetails::from(event))
    }

    pub async fn create_event(&self, connection_id: Option<&str>, input: &CreateEventInput) -> AppResult<Value> {
        let payload = events::create_payload(input)?;
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::post(events::events_endpoint(input.calendar_id.as_deref()), payload)
            .client_request_id(input.client_request_id.as_deref());
        let event = self.graph().send_json(&token, request).await?;
        tracing::info!(id = ?event.get("id"), "created event");
        Ok(event)
    }

    pub async fn delete_event(&self, connection_id: Option<&str>, event_id: &str) -> AppResult<()> {
        let event_id = require_id("event_id", event_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(&token, GraphRequest::delete(events::event_endpoint(event_id)))
            .await?;
        tracing::info!(event_id, "deleted event");
        Ok(())
    }
}

pub async fn get_all_events(
    outlook: &Outlook,
    connection_id: Option<&str>,
    calendar_id: Option<&str>,
) -> Envelope<Vec<EventSummary>> {
    Envelope::finish("get_all_events", outlook.list_events(connection_id, calendar_id).await)
}

pub async fn get_many_events(
    outlook: &Outlook,
    connection_id: Option<&str>,
    calendar_id: Option<&str>,
    start_datetime: Option<&str>,
    end_datetime: Option<&str>,
) -> Envelope<Vec<Value>> {
    let outcome = outlook
        .events_in_window(connection_id, calendar_id, start_datetime, end_datetime)
        .await;
    Envelope::finish("get_many_events", outcome)
}

pub async fn get_event_details(outlook: &Outlook, connection_id: Option<&str>, event_id: &str) -> Envelope<EventDetails> {
    Envelope::finish("get_event_details", outlook.event(connection_id, event_id).await)
}

pub async fn create_event(outlook: &Outlook, connection_id: Option<&str>, input: CreateEventInput) -> Envelope<Value> {
    Envelope::finish("create_event", outlook.create_event(connection_id, &input).await)
}

pub async fn delete_event(outlook: &Outlook, connection_id: Option<&str>, event_id: &str) -> Envelope<String> {
    let outcome = outlook.delete_event(connection_id, event_id).await;
    Envelope::finish(
        "delete_event",
        outcome.map(|()| "Event deleted successfully".to_string()),
    )
}
