use serde_json::Value;

use crate::api::contacts::{self, CreateContactInput, UpdateContactInput};
use crate::api::models::{ContactSummary, ListResponse};
use crate::api::GraphRequest;
use crate::envelope::Envelope;
use crate::error::{AppResult, require_id};

use super::Outlook;

impl Outlook {
    pub async fn create_contact(&self, connection_id: Option<&str>, input: &CreateContactInput) -> AppResult<Value> {
        let payload = contacts::create_payload(input)?;
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::post(contacts::contacts_endpoint(), payload)
            .client_request_id(input.client_request_id.as_deref());
        let contact = self.graph().send_json(&token, request).await?;
        tracing::info!(id = ?contact.get("id"), "created contact");
        Ok(contact)
    }

    pub async fn list_contacts(&self, connection_id: Option<&str>) -> AppResult<Vec<ContactSummary>> {
        let token = self.access_token(connection_id).await?;
        let body = self
            .graph()
            .send_json(&token, GraphRequest::get(contacts::contacts_endpoint()))
            .await?;
        let list: ListResponse<ContactSummary> = serde_json::from_value(body)?;
        tracing::info!(count = list.value.len(), "fetched contacts");
        Ok(list.value)
    }

    pub async fn contact(&self, connection_id: Option<&str>, contact_id: &str) -> AppResult<Value> {
        let contact_id = require_id("contact_id", contact_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .send_json(&token, GraphRequest::get(contacts::contact_endpoint(contact_id)))
            .await
    }

    pub async fn update_contact(&self, connection_id: Option<&str>, input: &UpdateContactInput) -> AppResult<Value> {
        let contact_id = require_id("contact_id", &input.contact_id)?;
        let payload = contacts::update_payload(input)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .send_json(&token, GraphRequest::patch(contacts::contact_endpoint(contact_id), payload))
            .await
    }

    /// Graph answers a successful delete with 204; any other 2xx is treated as a failure.
    pub async fn delete_contact(&self, connection_id: Option<&str>, contact_id: &str) -> AppResult<()> {
        let contact_id = require_id("contact_id", contact_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(
                &token,
                GraphRequest::delete(contacts::contact_endpoint(contact_id)).accept(&[204]),
            )
            .await?;
        tracing::info!(contact_id, "deleted contact");
        Ok(())
    }
}

pub async fn create_contact(outlook: &Outlook, connection_id: Option<&str>, input: CreateContactInput) -> Envelope<Value> {
    Envelope::finish("create_contact", outlook.create_contact(connection_id, &input).await)
}

pub async fn get_all_contacts(outlook: &Outlook, connection_id: Option<&str>) -> Envelope<Vec<ContactSummary>> {
    Envelope::finish("get_all_contacts", outlook.list_contacts(connection_id).await)
}

pub async fn get_contact_details(outlook: &Outlook, connection_id: Option<&str>, contact_id: &str) -> Envelope<Value> {
    Envelope::finish("get_contact_details", outlook.contact(connection_id, contact_id).await)
}

pub async fn update_contact(outlook: &Outlook, connection_id: Option<&str>, input: UpdateContactInput) -> Envelope<Value> {
    Envelope::finish("update_contact", outlook.update_contact(connection_id, &input).await)
}

pub async fn delete_contact(outlook: &Outlook, connection_id: Option<&str>, contact_id: &str) -> Envelope<String> {
    let outcome = outlook.delete_contact(connection_id, contact_id).await;
    Envelope::finish(
        "delete_contact",
        outcome.map(|()| "Contact deleted successfully".to_string()),
    )
}
