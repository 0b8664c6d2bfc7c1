use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{AppError, AppResult};

use super::client::Endpoint;
use super::validation::present;

/// Page size for the top-level folder listing.
pub const FOLDER_PAGE_SIZE: u32 = 100;
/// Graph rejects JSON batches with more sub-requests than this.
pub const MAX_BATCH_REQUESTS: usize = 20;

pub fn folders_endpoint() -> Endpoint {
    Endpoint::me(["mailFolders"])
}

pub fn folder_endpoint(id: &str) -> Endpoint {
    folders_endpoint().join(id)
}

pub fn child_folders_endpoint(id: &str) -> Endpoint {
    folder_endpoint(id).join("childFolders")
}

pub fn batch_endpoint() -> Endpoint {
    Endpoint::root(["$batch"])
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateFolderInput {
    pub display_name: String,
    /// Create the folder beneath this folder instead of at the top level.
    #[serde(default)]
    pub parent_folder_id: Option<String>,
    #[serde(default)]
    pub client_request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateFolderInput {
    pub folder_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Move the folder under a new parent.
    #[serde(default)]
    pub parent_folder_id: Option<String>,
}

pub fn create_target(input: &CreateFolderInput) -> Endpoint {
    match present(&input.parent_folder_id) {
        Some(parent) => child_folders_endpoint(parent.trim()),
        None => folders_endpoint(),
    }
}

pub fn create_payload(input: &CreateFolderInput) -> AppResult<Value> {
    let name = input.display_name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("folder display_name must be a non-empty string"));
    }
    Ok(json!({ "displayName": name }))
}

pub fn update_payload(input: &UpdateFolderInput) -> AppResult<Value> {
    let mut payload = Map::new();
    if let Some(name) = present(&input.display_name) {
        payload.insert("displayName".into(), json!(name.trim()));
    }
    if let Some(parent) = present(&input.parent_folder_id) {
        payload.insert("parentFolderId".into(), json!(parent.trim()));
    }

    if payload.is_empty() {
        return Err(AppError::invalid("no properties provided to update the folder"));
    }
    Ok(Value::Object(payload))
}

fn batch_request_id(index: usize) -> String {
    format!("request_{index}")
}

/// `$batch` body fetching each folder by id; sub-request ids follow input order.
pub fn batch_payload(folder_ids: &[String]) -> AppResult<Value> {
    if folder_ids.is_empty() {
        return Err(AppError::invalid("at least one folder id is required"));
    }
    if folder_ids.len() > MAX_BATCH_REQUESTS {
        return Err(AppError::invalid(format!(
            "at most {MAX_BATCH_REQUESTS} folder ids can be fetched in one batch"
        )));
    }

    let mut requests = Vec::with_capacity(folder_ids.len());
    for (index, folder_id) in folder_ids.iter().enumerate() {
        let folder_id = crate::error::require_id("folder id", folder_id)?;
        let url = folder_endpoint(folder_id).path()?;
        requests.push(json!({
            "id": batch_request_id(index),
            "method": "GET",
            "url": url,
        }));
    }

    Ok(json!({ "requests": requests }))
}

#[derive(Debug, Clone, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<BatchSubResponse>,
}

#[derive(Debug, Clone, Deserialize)]
struct BatchSubResponse {
    id: String,
    status: u16,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFolderResult {
    /// Folder id the sub-request asked for.
    pub id: String,
    pub status: u16,
    pub body: Option<Value>,
}

/// Maps sub-responses back to the requested folder ids, in request order.
pub fn batch_results(folder_ids: &[String], body: Value) -> AppResult<Vec<BatchFolderResult>> {
    let batch: BatchResponse = serde_json::from_value(body)?;
    let mut by_request: HashMap<String, BatchSubResponse> = batch
        .responses
        .into_iter()
        .map(|response| (response.id.clone(), response))
        .collect();

    let mut results = Vec::with_capacity(folder_ids.len());
    for (index, folder_id) in folder_ids.iter().enumerate() {
        match by_request.remove(&batch_request_id(index)) {
            Some(response) => results.push(BatchFolderResult {
                id: folder_id.trim().to_string(),
                status: response.status,
                body: response.body,
            }),
            None => {
                tracing::warn!(folder_id = %folder_id, "batch response missing sub-response");
            }
        }
    }
    Ok(results)
}
