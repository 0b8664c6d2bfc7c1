use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_INTEGRATION_ID: &str = "outlook";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub broker_base_url: Option<String>,
    #[serde(default)]
    pub broker_secret_key: Option<String>,
    #[serde(default)]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub graph_base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Overlays `.env` and process environment variables.
    pub fn apply_env(&mut self) {
        dotenvy::dotenv().ok();
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read("NANGO_BASE_URL") {
            self.broker_base_url = Some(value);
        }
        if let Some(value) = read("NANGO_SECRET_KEY") {
            self.broker_secret_key = Some(value);
        }
        if let Some(value) = read("NANGO_INTEGRATION_ID") {
            self.integration_id = Some(value);
        }
        if let Some(value) = read("NANGO_CONNECTION_ID") {
            self.connection_id = Some(value);
        }
        if let Some(value) = read("OUTLOOK_GRAPH_BASE_URL") {
            self.graph_base_url = Some(value);
        }
        match read("OUTLOOK_TIMEOUT_SECS").map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(secs)) => self.timeout_secs = Some(secs),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "ignoring unparsable OUTLOOK_TIMEOUT_SECS");
            }
            None => {}
        }
    }

    pub fn integration_id(&self) -> &str {
        self.integration_id
            .as_deref()
            .unwrap_or(DEFAULT_INTEGRATION_ID)
    }

    pub fn graph_base_url(&self) -> &str {
        self.graph_base_url
            .as_deref()
            .unwrap_or(DEFAULT_GRAPH_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

pub fn load(path: &Path) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let settings = Settings::default();
        assert_eq!(settings.integration_id(), "outlook");
        assert_eq!(settings.graph_base_url(), DEFAULT_GRAPH_BASE_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn environment_overrides_profile_values() {
        let mut settings = Settings {
            broker_base_url: Some("https://profile.example".to_string()),
            connection_id: Some("from-profile".to_string()),
            ..Settings::default()
        };
        let vars = env(&[
            ("NANGO_BASE_URL", "https://env.example"),
            ("NANGO_SECRET_KEY", "s3cret"),
            ("OUTLOOK_TIMEOUT_SECS", "25"),
            ("NANGO_CONNECTION_ID", "  "),
        ]);

        settings.apply_env_with(|key| vars.get(key).cloned());

        assert_eq!(settings.broker_base_url.as_deref(), Some("https://env.example"));
        assert_eq!(settings.broker_secret_key.as_deref(), Some("s3cret"));
        assert_eq!(settings.connection_id.as_deref(), Some("from-profile"));
        assert_eq!(settings.timeout(), Duration::from_secs(25));
    }

    #[test]
    fn missing_profile_file_yields_defaults() {
        let settings = load(Path::new("/nonexistent/outlook/profiles/none.json"))
            .expect("missing file should load defaults");
        assert!(settings.broker_base_url.is_none());
    }
}
