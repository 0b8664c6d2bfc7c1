//! Uniform result shapes returned by every operation.
//!
//! Failures are data: each wrapper catches its own error and reports it in
//! the `error` channel, so exactly one of the payload or the error is set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Logs the failure under `operation` and folds the outcome into an envelope.
    pub fn finish(operation: &str, outcome: AppResult<T>) -> Self {
        match outcome {
            Ok(result) => Self::ok(result),
            Err(err) => {
                tracing::error!(operation, error = %err, "operation failed");
                Self::err(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

/// Draft operations report a status flag instead of a `result` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<Value>,
    pub error: Option<String>,
}

impl StatusEnvelope {
    pub fn draft_id(operation: &str, draft_id: Option<String>, outcome: AppResult<()>) -> Self {
        match outcome {
            Ok(()) => Self {
                status: Status::Success,
                draft_id,
                draft: None,
                error: None,
            },
            Err(err) => {
                tracing::error!(operation, error = %err, "draft operation failed");
                Self {
                    status: Status::Failed,
                    draft_id,
                    draft: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn created(operation: &str, outcome: AppResult<String>) -> Self {
        match outcome {
            Ok(id) => Self::draft_id(operation, Some(id), Ok(())),
            Err(err) => Self::draft_id(operation, None, Err(err)),
        }
    }

    pub fn draft(operation: &str, outcome: AppResult<Value>) -> Self {
        match outcome {
            Ok(draft) => Self {
                status: Status::Success,
                draft_id: None,
                draft: Some(draft),
                error: None,
            },
            Err(err) => {
                tracing::error!(operation, error = %err, "draft operation failed");
                Self {
                    status: Status::Failed,
                    draft_id: None,
                    draft: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Success
    }
}

/// Outcome of one message inside a batch send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub status: Status,
    pub recipients: Vec<String>,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn from_result(recipients: Vec<String>, outcome: AppResult<()>) -> Self {
        match outcome {
            Ok(()) => Self {
                status: Status::Success,
                recipients,
                error: None,
            },
            Err(err) => Self {
                status: Status::Failed,
                recipients,
                error: Some(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn exactly_one_channel_is_populated() {
        let ok: Envelope<u32> = Envelope::finish("op", Ok(7));
        assert_eq!(ok.result, Some(7));
        assert!(ok.error.is_none());

        let failed: Envelope<u32> =
            Envelope::finish("op", Err(AppError::invalid("name must not be empty")));
        assert!(failed.result.is_none());
        assert_eq!(
            failed.error.as_deref(),
            Some("invalid input: name must not be empty")
        );
    }

    #[test]
    fn envelope_serializes_both_fields() {
        let value = serde_json::to_value(Envelope::ok("done")).expect("serialize");
        assert_eq!(value, serde_json::json!({"result": "done", "error": null}));
    }

    #[test]
    fn failed_draft_keeps_id_and_drops_payload() {
        let envelope = StatusEnvelope::draft_id(
            "delete_draft_email",
            Some("AAMk".to_string()),
            Err(AppError::Auth("token expired".to_string())),
        );

        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["status"], "failed");
        assert_eq!(value["draft_id"], "AAMk");
        assert!(value.get("draft").is_none());
        assert!(value["error"].as_str().is_some());
    }
}
