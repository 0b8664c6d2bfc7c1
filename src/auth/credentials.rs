use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Connection record returned by the credential broker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionCredentials {
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub provider_config_key: Option<String>,
    #[serde(default)]
    pub credentials: Option<OAuthCredentials>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCredentials {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ConnectionCredentials {
    pub fn parse(body: &str) -> AppResult<Self> {
        serde_json::from_str(body).map_err(|err| {
            AppError::Credentials(format!("malformed credential broker response: {err}"))
        })
    }

    pub fn into_access_token(self) -> AppResult<String> {
        let credentials = self.credentials.ok_or_else(|| {
            AppError::Credentials("missing 'credentials' in the broker response".to_string())
        })?;

        credentials
            .access_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                AppError::Credentials("access token is missing in the credentials".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_access_token() {
        let connection = ConnectionCredentials::parse(
            r#"{"connection_id":"c1","credentials":{"type":"OAUTH2","access_token":"tok","expires_at":"2026-01-01T00:00:00Z"}}"#,
        )
        .expect("valid body");

        assert_eq!(connection.into_access_token().expect("token"), "tok");
    }

    #[test]
    fn missing_credentials_block_is_credential_error() {
        let connection = ConnectionCredentials::parse(r#"{"connection_id":"c1"}"#).expect("valid body");

        match connection.into_access_token() {
            Err(AppError::Credentials(message)) => assert!(message.contains("'credentials'")),
            other => panic!("expected credential error, got {other:?}"),
        }
    }

    #[test]
    fn blank_access_token_is_rejected() {
        let connection =
            ConnectionCredentials::parse(r#"{"credentials":{"access_token":""}}"#).expect("valid body");

        match connection.into_access_token() {
            Err(AppError::Credentials(message)) => assert!(message.contains("access token")),
            other => panic!("expected credential error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_malformed() {
        match ConnectionCredentials::parse("<html>bad gateway</html>") {
            Err(AppError::Credentials(message)) => assert!(message.contains("malformed")),
            other => panic!("expected credential error, got {other:?}"),
        }
    }
}
