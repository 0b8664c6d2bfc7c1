use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::api::folders::{self, BatchFolderResult, CreateFolderInput, FOLDER_PAGE_SIZE, UpdateFolderInput};
use crate::api::models::{ListResponse, MailFolder};
use crate::api::GraphRequest;
use crate::envelope::Envelope;
use crate::error::{AppResult, require_id};

use super::Outlook;

/// Folder listing plus children can be slow on large mailboxes.
pub const FOLDER_TREE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderTree {
    pub folders: Vec<MailFolder>,
    pub fetch: FetchCompleteness,
}

/// Whether every child listing succeeded. `Partial` names the folders
/// whose children could not be fetched and were left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchCompleteness {
    Complete,
    Partial { omitted: Vec<String> },
}

impl Outlook {
    pub async fn folder_tree(&self, connection_id: Option<&str>, include_child_folders: bool) -> AppResult<FolderTree> {
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::get(folders::folders_endpoint())
            .query("$top", FOLDER_PAGE_SIZE.to_string())
            .timeout(FOLDER_TREE_TIMEOUT);
        let body = self.graph().send_json(&token, request).await?;
        let mut folders = serde_json::from_value::<ListResponse<MailFolder>>(body)?.value;

        let mut omitted = Vec::new();
        if include_child_folders {
            for folder in &mut folders {
                let request = GraphRequest::get(folders::child_folders_endpoint(&folder.id))
                    .timeout(FOLDER_TREE_TIMEOUT);
                let children = match self.graph().send_json(&token, request).await {
                    Ok(body) => serde_json::from_value::<ListResponse<MailFolder>>(body).map(|list| list.value),
                    Err(err) => {
                        tracing::warn!(folder_id = %folder.id, error = %err, "child folder fetch failed");
                        omitted.push(folder.id.clone());
                        continue;
                    }
                };
                match children {
                    Ok(children) => folder.child_folders = children,
                    Err(err) => {
                        tracing::warn!(folder_id = %folder.id, error = %err, "child folder listing was malformed");
                        omitted.push(folder.id.clone());
                    }
                }
            }
        }

        tracing::info!(count = folders.len(), omitted = omitted.len(), "fetched folder tree");
        let fetch = if omitted.is_empty() {
            FetchCompleteness::Complete
        } else {
            FetchCompleteness::Partial { omitted }
        };
        Ok(FolderTree { folders, fetch })
    }

    pub async fn folder(&self, connection_id: Option<&str>, folder_id: &str) -> AppResult<Value> {
        let folder_id = require_id("folder_id", folder_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .send_json(&token, GraphRequest::get(folders::folder_endpoint(folder_id)))
            .await
    }

    pub async fn create_folder(&self, connection_id: Option<&str>, input: &CreateFolderInput) -> AppResult<Value> {
        let payload = folders::create_payload(input)?;
        let token = self.access_token(connection_id).await?;
        let request = GraphRequest::post(folders::create_target(input), payload)
            .client_request_id(input.client_request_id.as_deref());
        let folder = self.graph().send_json(&token, request).await?;
        tracing::info!(id = ?folder.get("id"), "created folder");
        Ok(folder)
    }

    pub async fn update_folder(&self, connection_id: Option<&str>, input: &UpdateFolderInput) -> AppResult<Value> {
        let folder_id = require_id("folder_id", &input.folder_id)?;
        let payload = folders::update_payload(input)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .send_json(&token, GraphRequest::patch(folders::folder_endpoint(folder_id), payload))
            .await
    }

    pub async fn delete_folder(&self, connection_id: Option<&str>, folder_id: &str) -> AppResult<()> {
        let folder_id = require_id("folder_id", folder_id)?;
        let token = self.access_token(connection_id).await?;
        self.graph()
            .execute(&token, GraphRequest::delete(folders::folder_endpoint(folder_id)))
            .await?;
        tracing::info!(folder_id, "deleted folder");
        Ok(())
    }

    /// Fetches several folders in one `$batch` round trip.
    pub async fn folders_by_id(&self, connection_id: Option<&str>, folder_ids: &[String]) -> AppResult<Vec<BatchFolderResult>> {
        let payload = folders::batch_payload(folder_ids)?;
        let token = self.access_token(connection_id).await?;
        let body = self
            .graph()
            .send_json(&token, GraphRequest::post(folders::batch_endpoint(), payload))
            .await?;
        folders::batch_results(folder_ids, body)
    }
}

pub async fn get_all_folders(
    outlook: &Outlook,
    connection_id: Option<&str>,
    include_child_folders: bool,
) -> Envelope<FolderTree> {
    Envelope::finish(
        "get_all_folders",
        outlook.folder_tree(connection_id, include_child_folders).await,
    )
}

pub async fn get_folder_details(outlook: &Outlook, connection_id: Option<&str>, folder_id: &str) -> Envelope<Value> {
    Envelope::finish("get_folder_details", outlook.folder(connection_id, folder_id).await)
}

pub async fn create_folder(outlook: &Outlook, connection_id: Option<&str>, input: CreateFolderInput) -> Envelope<Value> {
    Envelope::finish("create_folder", outlook.create_folder(connection_id, &input).await)
}

pub async fn update_folder(outlook: &Outlook, connection_id: Option<&str>, input: UpdateFolderInput) -> Envelope<Value> {
    Envelope::finish("update_folder", outlook.update_folder(connection_id, &input).await)
}

pub async fn delete_folder(outlook: &Outlook, connection_id: Option<&str>, folder_id: &str) -> Envelope<String> {
    let outcome = outlook.delete_folder(connection_id, folder_id).await;
    Envelope::finish(
        "delete_folder",
        outcome.map(|()| format!("Folder with ID {} deleted successfully.", folder_id.trim())),
    )
}

pub async fn get_many_folders(
    outlook: &Outlook,
    connection_id: Option<&str>,
    folder_ids: &[String],
) -> Envelope<Vec<BatchFolderResult>> {
    Envelope::finish("get_many_folders", outlook.folders_by_id(connection_id, folder_ids).await)
}
