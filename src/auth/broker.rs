use std::fmt;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::Settings;
use crate::error::{AppError, AppResult};

use super::credentials::ConnectionCredentials;

/// Resolves connection identifiers to bearer tokens through a Nango-style broker.
///
/// Nothing is cached: every call asks the broker, which refreshes the token
/// when it is close to expiry.
#[derive(Clone)]
pub struct CredentialBroker {
    http: Client,
    base_url: Option<String>,
    secret_key: Option<String>,
    integration_id: String,
}

impl fmt::Debug for CredentialBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBroker")
            .field("base_url", &self.base_url)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("integration_id", &self.integration_id)
            .finish()
    }
}

impl CredentialBroker {
    pub fn new(settings: &Settings, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: settings.broker_base_url.clone(),
            secret_key: settings.broker_secret_key.clone(),
            integration_id: settings.integration_id().to_string(),
        })
    }

    pub async fn access_token(&self, connection_id: &str) -> AppResult<String> {
        self.fetch(connection_id).await?.into_access_token()
    }

    pub async fn fetch(&self, connection_id: &str) -> AppResult<ConnectionCredentials> {
        let connection_id = connection_id.trim();
        if connection_id.is_empty() {
            return Err(AppError::Credentials(
                "connection id is required to resolve credentials".to_string(),
            ));
        }

        let url = self.connection_url(connection_id)?;
        let secret = self.secret_key.as_deref().ok_or_else(|| {
            AppError::Config(
                "missing credential broker secret. set NANGO_SECRET_KEY or broker_secret_key"
                    .to_string(),
            )
        })?;

        tracing::debug!(connection_id, integration = %self.integration_id, "resolving credentials");
        let response = self
            .http
            .get(url)
            .bearer_auth(secret)
            .query(&[
                ("provider_config_key", self.integration_id.as_str()),
                ("refresh_token", "true"),
            ])
            .send()
            .await
            .map_err(|err| AppError::Credentials(format!("credential broker request failed: {err}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            AppError::Credentials(format!("failed to read credential broker response: {err}"))
        })?;

        if !status.is_success() {
            let body = body.trim();
            return Err(AppError::Credentials(format!(
                "credential broker returned {status}: {}",
                if body.is_empty() { "no response body" } else { body }
            )));
        }

        ConnectionCredentials::parse(&body)
    }

    fn connection_url(&self, connection_id: &str) -> AppResult<Url> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::Config(
                "missing credential broker url. set NANGO_BASE_URL or broker_base_url".to_string(),
            )
        })?;

        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("credential broker url cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(["connection", connection_id]);
        Ok(url)
    }
}
