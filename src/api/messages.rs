use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{AppError, AppResult};

use super::client::Endpoint;

pub const FILE_ATTACHMENT_TYPE: &str = "#microsoft.graph.fileAttachment";

pub fn send_mail_endpoint() -> Endpoint {
    Endpoint::me(["sendMail"])
}

pub fn messages_endpoint() -> Endpoint {
    Endpoint::me(["messages"])
}

pub fn message_endpoint(id: &str) -> Endpoint {
    messages_endpoint().join(id)
}

pub fn send_draft_endpoint(id: &str) -> Endpoint {
    message_endpoint(id).join("send")
}

pub fn drafts_endpoint() -> Endpoint {
    Endpoint::me(["mailFolders", "drafts", "messages"])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BodyContentType {
    #[default]
    #[serde(rename = "HTML", alias = "html")]
    Html,
    #[serde(rename = "Text", alias = "text")]
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AttachmentInput {
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Base64-encoded file content.
    pub content_bytes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MessageInput {
    pub subject: String,
    /// Message body, HTML unless `content_type` says otherwise.
    pub content: String,
    #[serde(default)]
    pub content_type: BodyContentType,
    pub to_recipients: Vec<String>,
    #[serde(default)]
    pub cc_recipients: Vec<String>,
    #[serde(default)]
    pub bcc_recipients: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
    /// Custom `x-` headers copied into `internetMessageHeaders`.
    #[serde(default)]
    pub custom_headers: Vec<MessageHeader>,
    #[serde(default)]
    pub importance: Option<Importance>,
    /// Graph follow-up flag object, e.g. `{"flagStatus": "flagged"}`.
    #[serde(default)]
    pub flag: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SendEmailInput {
    #[serde(flatten)]
    pub message: MessageInput,
    #[serde(default = "default_save_to_sent")]
    pub save_to_sent_items: bool,
}

fn default_save_to_sent() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateDraftInput {
    pub draft_id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: BodyContentType,
    #[serde(default)]
    pub to_recipients: Option<Vec<String>>,
    #[serde(default)]
    pub cc_recipients: Option<Vec<String>>,
    #[serde(default)]
    pub bcc_recipients: Option<Vec<String>>,
    #[serde(default)]
    pub importance: Option<Importance>,
}

pub fn recipients(addresses: &[String]) -> Value {
    addresses
        .iter()
        .map(|address| address.trim())
        .filter(|address| !address.is_empty())
        .map(|address| json!({ "emailAddress": { "address": address } }))
        .collect()
}

fn attachments(items: &[AttachmentInput]) -> Value {
    items
        .iter()
        .map(|item| {
            json!({
                "@odata.type": FILE_ATTACHMENT_TYPE,
                "name": item.name,
                "contentType": item.content_type.as_deref().unwrap_or_default(),
                "contentBytes": item.content_bytes,
            })
        })
        .collect()
}

/// Graph `message` resource for a send or a new draft.
pub fn build_message(input: &MessageInput) -> Value {
    let mut message = json!({
        "subject": input.subject,
        "body": { "contentType": input.content_type, "content": input.content },
        "toRecipients": recipients(&input.to_recipients),
    });

    if !input.cc_recipients.is_empty() {
        message["ccRecipients"] = recipients(&input.cc_recipients);
    }
    if !input.bcc_recipients.is_empty() {
        message["bccRecipients"] = recipients(&input.bcc_recipients);
    }
    if !input.attachments.is_empty() {
        message["attachments"] = attachments(&input.attachments);
    }
    if !input.custom_headers.is_empty() {
        message["internetMessageHeaders"] = json!(input.custom_headers);
    }
    if let Some(importance) = input.importance {
        message["importance"] = json!(importance);
    }
    if let Some(flag) = &input.flag {
        message["flag"] = flag.clone();
    }

    message
}

pub fn send_payload(input: &SendEmailInput) -> AppResult<Value> {
    if input.message.to_recipients.iter().all(|address| address.trim().is_empty()) {
        return Err(AppError::invalid("at least one recipient is required"));
    }
    Ok(json!({
        "message": build_message(&input.message),
        "saveToSentItems": input.save_to_sent_items,
    }))
}

pub fn update_draft_payload(input: &UpdateDraftInput) -> AppResult<Value> {
    let mut patch = Map::new();
    if let Some(subject) = &input.subject {
        patch.insert("subject".into(), json!(subject));
    }
    if let Some(content) = &input.content {
        patch.insert(
            "body".into(),
            json!({ "contentType": input.content_type, "content": content }),
        );
    }
    if let Some(to) = &input.to_recipients {
        patch.insert("toRecipients".into(), recipients(to));
    }
    if let Some(cc) = &input.cc_recipients {
        patch.insert("ccRecipients".into(), recipients(cc));
    }
    if let Some(bcc) = &input.bcc_recipients {
        patch.insert("bccRecipients".into(), recipients(bcc));
    }
    if let Some(importance) = input.importance {
        patch.insert("importance".into(), json!(importance));
    }

    if patch.is_empty() {
        return Err(AppError::invalid("no properties provided to update the draft"));
    }
    Ok(Value::Object(patch))
}
