pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;

use crate::error::AppResult;

const DEFAULT_PROFILE: &str = "default";

pub fn resolve_profile(requested: &str) -> String {
    match requested.trim() {
        "" => DEFAULT_PROFILE.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Profile file first, then `.env` and process environment on top.
pub fn load_settings(paths: &AppPaths, profile: &str) -> AppResult<Settings> {
    let mut settings = settings::load(&paths.settings_file(profile))?;
    settings.apply_env();
    Ok(settings)
}
