use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "ses";
pub const CONFIG_FILE_NAME: &str = "ses-tb.json";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    profile_dir: PathBuf,
}

impl AppPaths {
    pub fn discover(profile: &str) -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;

        Self::at(config_root.join(APP_DIR).join(profile))
    }

    pub fn at(profile_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let profile_dir = profile_dir.into();
        fs::create_dir_all(&profile_dir)?;

        Ok(Self { profile_dir })
    }

    /// Well-known location of the submission configuration.
    pub fn config_file(&self) -> PathBuf {
        self.profile_dir.join(CONFIG_FILE_NAME)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.profile_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn profile_dir(&self) -> &Path {
        &self.profile_dir
    }
}
