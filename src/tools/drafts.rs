use serde_json::Value;

use crate::api::messages::{self, MessageInput, UpdateDraftInput};
use crate::api::models::{DraftSummary, GraphMessage, ListResponse};
use crate::api::GraphRequest;
use crate::envelope::{Envelope, StatusEnvelope};
use crate::error::{AppError, AppResult, require_id};

use super::Outlook;

impl Outlook {
    /// Saves a draft and returns its id.
    pub async fn create_draft(&self, connection_id: Option<&str>, input: &MessageInput) -> AppResult<String> {
        let payload = messages::build_message(input);
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::post(messages::messages_endpoint(), payload).accept(&[200, 201]);
        let response = self.graph().execute(&token, request).await?;

        let id = response
            .body
            .get("id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::Api {
                status: response.status.as_u16(),
                message: "draft created but the response carried no id".to_string(),
            })?;
        tracing::info!(draft_id = %id, "created draft");
        Ok(id)
    }

    pub async fn draft(&self, connection_id: Option<&str>, draft_id: &str) -> AppResult<Value> {
        let draft_id = require_id("draft_id", draft_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .send_json(&token, GraphRequest::get(messages::message_endpoint(draft_id)).accept(&[200]))
            .await
    }

    pub async fn list_drafts(&self, connection_id: Option<&str>) -> AppResult<Vec<DraftSummary>> {
        let token = self.access_token(connection_id).await?;
        let body = self
            .graph()
            .send_json(&token, GraphRequest::get(messages::drafts_endpoint()))
            .await?;
        let list: ListResponse<GraphMessage> = serde_json::from_value(body)?;
        tracing::info!(count = list.value.len(), "fetched drafts");
        Ok(list.value.into_iter().map(DraftSummary::from).collect())
    }

    pub async fn update_draft(&self, connection_id: Option<&str>, input: &UpdateDraftInput) -> AppResult<()> {
        let draft_id = require_id("draft_id", &input.draft_id)?;
        let payload = messages::update_draft_payload(input)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(
                &token,
                GraphRequest::patch(messages::message_endpoint(draft_id), payload).accept(&[200]),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_draft(&self, connection_id: Option<&str>, draft_id: &str) -> AppResult<()> {
        let draft_id = require_id("draft_id", draft_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(
                &token,
                GraphRequest::delete(messages::message_endpoint(draft_id)).accept(&[204]),
            )
            .await?;
        tracing::info!(draft_id, "deleted draft");
        Ok(())
    }

    pub async fn send_draft(&self, connection_id: Option<&str>, draft_id: &str) -> AppResult<()> {
        let draft_id = require_id("draft_id", draft_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(
                &token,
                GraphRequest::action(messages::send_draft_endpoint(draft_id)).accept(&[202]),
            )
            .await?;
        tracing::info!(draft_id, "sent draft");
        Ok(())
    }
}

pub async fn create_draft_email(outlook: &Outlook, connection_id: Option<&str>, input: MessageInput) -> StatusEnvelope {
    StatusEnvelope::created("create_draft_email", outlook.create_draft(connection_id, &input).await)
}

pub async fn get_draft(outlook: &Outlook, connection_id: Option<&str>, draft_id: &str) -> StatusEnvelope {
    StatusEnvelope::draft("get_draft", outlook.draft(connection_id, draft_id).await)
}

pub async fn get_draft_emails(outlook: &Outlook, connection_id: Option<&str>) -> Envelope<Vec<DraftSummary>> {
    Envelope::finish("get_draft_emails", outlook.list_drafts(connection_id).await)
}

pub async fn update_draft_email(outlook: &Outlook, connection_id: Option<&str>, input: UpdateDraftInput) -> StatusEnvelope {
    let outcome = outlook.update_draft(connection_id, &input).await;
    StatusEnvelope::draft_id("update_draft_email", Some(input.draft_id), outcome)
}

pub async fn delete_draft_email(outlook: &Outlook, connection_id: Option<&str>, draft_id: &str) -> StatusEnvelope {
    let outcome = outlook.delete_draft(connection_id, draft_id).await;
    StatusEnvelope::draft_id("delete_draft_email", Some(draft_id.to_string()), outcome)
}

pub async fn send_draft_email(outlook: &Outlook, connection_id: Option<&str>, draft_id: &str) -> StatusEnvelope {
    let outcome = outlook.send_draft(connection_id, draft_id).await;
    StatusEnvelope::draft_id("send_draft_email", Some(draft_id.to_string()), outcome)
}
