//! Operation wrappers: one public async function per tool.
//!
//! Each wrapper validates its input, resolves a bearer token through the
//! credential broker, performs its Graph call and folds the outcome into an
//! envelope. None of them return `Err`.

pub mod calendars;
pub mod contacts;
pub mod drafts;
pub mod events;
pub mod folders;
pub mod mail;

use crate::api::GraphClient;
use crate::auth::CredentialBroker;
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Shared handle for all operations: broker, Graph client and default connection.
#[derive(Debug, Clone)]
pub struct Outlook {
    broker: CredentialBroker,
    graph: GraphClient,
    default_connection: Option<String>,
}

impl Outlook {
    pub fn new(broker: CredentialBroker, graph: GraphClient, default_connection: Option<String>) -> Self {
        Self {
            broker,
            graph,
            default_connection,
        }
    }

    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let timeout = settings.timeout();
        let broker = CredentialBroker::new(settings, timeout)?;
        let graph = GraphClient::new(settings.graph_base_url(), timeout)?;
        Ok(Self::new(broker, graph, settings.connection_id.clone()))
    }

    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    pub fn default_connection(&self) -> Option<&str> {
        self.default_connection.as_deref()
    }

    /// Resolves a fresh token for `connection_id`, falling back to the configured default.
    pub async fn access_token(&self, connection_id: Option<&str>) -> AppResult<String> {
        let connection_id = connection_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or(self.default_connection())
            .ok_or_else(|| {
                AppError::Credentials(
                    "no connection id given and no default connection configured".to_string(),
                )
            })?;

        self.broker.access_token(connection_id).await
    }
}
