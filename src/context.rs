use crate::config::{self, AppPaths};
use crate::error::AppResult;
use crate::output::Output;
use crate::server::ToolRegistry;
use crate::tools::Outlook;

#[derive(Debug)]
pub struct AppContext {
    pub outlook: Outlook,
    pub registry: ToolRegistry,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool, connection_id: Option<String>) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile);
        let paths = AppPaths::discover()?;
        let mut settings = config::load_settings(&paths, &profile)?;
        if let Some(connection_id) = connection_id.filter(|id| !id.trim().is_empty()) {
            settings.connection_id = Some(connection_id);
        }
        tracing::debug!(
            profile = %profile,
            settings = %paths.settings_file(&profile).display(),
            "loaded settings"
        );

        let outlook = Outlook::from_settings(&settings)?;
        let registry = ToolRegistry::new();
        let output = Output::new(json);

        Ok(Self {
            outlook,
            registry,
            output,
        })
    }
}
