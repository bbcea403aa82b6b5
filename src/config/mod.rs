pub mod paths;
pub mod picker;
pub mod profile;
pub mod settings;
pub mod store;

pub use paths::AppPaths;
pub use picker::{ChosenPath, ConfigPicker, PromptPicker};
pub use profile::resolve_profile;
pub use settings::{Settings, SmtpSecurity};
pub use store::{ChooseOutcome, ConfigStore, Configuration, LoadOutcome};

use crate::error::AppResult;

pub fn load_settings(paths: &AppPaths) -> AppResult<Settings> {
    settings::load(&paths.settings_file())
}

pub fn save_settings(paths: &AppPaths, settings: &Settings) -> AppResult<()> {
    settings::save(&paths.settings_file(), settings)
}
