use std::path::PathBuf;

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "outlook";

#[derive(Debug, Clone)]
pub struct AppPaths {
    profiles_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        Ok(Self::from_root(config_root))
    }

    pub fn from_root(config_root: impl Into<PathBuf>) -> Self {
        let profiles_dir = config_root.into().join(APP_DIR).join("profiles");
        Self { profiles_dir }
    }

    pub fn settings_file(&self, profile: &str) -> PathBuf {
        self.profiles_dir.join(format!("{profile}.json"))
    }
}
