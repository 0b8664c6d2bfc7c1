use std::io;

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("credential error: {0}")]
    Credentials(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("graph api request failed ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("tool `{0}` reported an error")]
    ToolFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Rejects blank identifiers before they reach a URL template.
pub fn require_id<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{field} is required but was not provided"
        )));
    }
    Ok(trimmed)
}
