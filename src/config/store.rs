use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::paths::AppPaths;
use super::picker::{ConfigPicker, is_json_file};

const REQUIRED_KEYS: [&str; 4] = ["serverUrl", "authToken", "name", "logo"];

/// The active submission configuration. Only ever replaced as a whole.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub server_url: String,
    #[serde(skip_serializing)]
    pub auth_token: String,
    pub name: String,
    pub logo: String,
}

impl Configuration {
    /// Accepts any JSON object carrying the four required keys. Values are
    /// not shape-checked; non-string values keep their JSON rendering.
    pub fn from_json(value: &Value) -> Result<Self, Vec<&'static str>> {
        let Some(object) = value.as_object() else {
            return Err(REQUIRED_KEYS.to_vec());
        };

        let missing = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !object.contains_key(*key))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Self {
            server_url: field_text(object, "serverUrl"),
            auth_token: field_text(object, "authToken"),
            name: field_text(object, "name"),
            logo: field_text(object, "logo"),
        })
    }
}

fn field_text(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    /// Source does not exist or cannot be read.
    Missing,
    /// Source exists but could not be decoded; carries the raw error text.
    Malformed(String),
    /// Parsed, but required keys are absent.
    Incomplete(Vec<&'static str>),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ChooseOutcome {
    Cancelled,
    Adopted {
        outcome: LoadOutcome,
        persisted: Result<PathBuf, String>,
    },
    Rejected {
        chosen: LoadOutcome,
        fallback: LoadOutcome,
    },
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: AppPaths,
    current: Option<Configuration>,
}

impl ConfigStore {
    pub fn new(paths: AppPaths) -> Self {
        Self {
            paths,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Configuration> {
        self.current.as_ref()
    }

    pub fn default_path(&self) -> PathBuf {
        self.paths.config_file()
    }

    pub fn has_default(&self) -> bool {
        self.default_path().is_file()
    }

    /// Loads `source`, or the well-known profile file when `None`. Any
    /// failure leaves the store without a configuration.
    pub fn load(&mut self, source: Option<&Path>) -> LoadOutcome {
        let path = source
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_path());
        debug!(path = %path.display(), "loading configuration");

        let (configuration, outcome) = match read_configuration(&path) {
            Ok(configuration) => (Some(configuration), LoadOutcome::Loaded),
            Err(outcome) => (None, outcome),
        };

        match &outcome {
            LoadOutcome::Loaded => info!(path = %path.display(), "configuration loaded"),
            LoadOutcome::Missing => info!(path = %path.display(), "no configuration found"),
            LoadOutcome::Malformed(err) => {
                warn!(path = %path.display(), error = %err, "configuration unreadable")
            }
            LoadOutcome::Incomplete(missing) => {
                warn!(path = %path.display(), ?missing, "configuration is missing keys")
            }
        }

        self.current = configuration;
        outcome
    }

    /// Asks the picker for a new configuration file and adopts it when it
    /// validates, copying it into the profile directory. An invalid pick
    /// falls back to the well-known file.
    pub fn choose_new<P: ConfigPicker + ?Sized>(&mut self, picker: &P) -> ChooseOutcome {
        let chosen = match picker.pick() {
            Ok(Some(path)) if is_json_file(&path) => path,
            Ok(Some(path)) => {
                warn!(path = %path.display(), "ignoring non-json configuration choice");
                return ChooseOutcome::Cancelled;
            }
            Ok(None) => return ChooseOutcome::Cancelled,
            Err(err) => {
                warn!(error = %err, "configuration picker failed");
                return ChooseOutcome::Cancelled;
            }
        };

        let outcome = self.load(Some(chosen.as_path()));
        if outcome.is_loaded() {
            let persisted = self.persist(&chosen).map_err(|err| err.to_string());
            return ChooseOutcome::Adopted { outcome, persisted };
        }

        let fallback = self.load(None);
        ChooseOutcome::Rejected {
            chosen: outcome,
            fallback,
        }
    }

    fn persist(&self, chosen: &Path) -> io::Result<PathBuf> {
        let target = self.default_path();
        if same_file(chosen, &target) {
            return Ok(target);
        }

        fs::copy(chosen, &target)?;
        info!(from = %chosen.display(), to = %target.display(), "persisted configuration");
        Ok(target)
    }
}

fn read_configuration(path: &Path) -> Result<Configuration, LoadOutcome> {
    if !path.is_file() {
        return Err(LoadOutcome::Missing);
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            return Err(LoadOutcome::Missing);
        }
        Err(err) => return Err(LoadOutcome::Malformed(err.to_string())),
    };

    let text = String::from_utf8(bytes).map_err(|err| LoadOutcome::Malformed(err.to_string()))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|err| LoadOutcome::Malformed(err.to_string()))?;

    Configuration::from_json(&value).map_err(LoadOutcome::Incomplete)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_object_with_all_keys() {
        let value = json!({
            "serverUrl": "https://intel.example.com/submit",
            "authToken": "secret",
            "name": "Acme SOC",
            "logo": "logo.png"
        });

        let config = Configuration::from_json(&value).expect("valid configuration");
        assert_eq!(config.server_url, "https://intel.example.com/submit");
        assert_eq!(config.auth_token, "secret");
    }

    #[test]
    fn reports_each_missing_key() {
        let value = json!({ "serverUrl": "mailto:abuse@example.com", "name": "x" });
        let missing = Configuration::from_json(&value).expect_err("incomplete");
        assert_eq!(missing, vec!["authToken", "logo"]);
    }

    #[test]
    fn presence_is_enough_for_non_string_values() {
        let value = json!({ "serverUrl": 42, "authToken": null, "name": [], "logo": {} });
        let config = Configuration::from_json(&value).expect("keys present");
        assert_eq!(config.server_url, "42");
        assert_eq!(config.auth_token, "null");
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(Configuration::from_json(&json!(["serverUrl"])).is_err());
    }

    #[test]
    fn auth_token_is_not_serialized() {
        let config = Configuration {
            server_url: "mailto:a@example.com".to_string(),
            auth_token: "secret".to_string(),
            name: "n".to_string(),
            logo: "l".to_string(),
        };
        let rendered = serde_json::to_string(&config).expect("serialize");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("serverUrl"));
    }
}
