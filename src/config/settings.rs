use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    #[default]
    Starttls,
    Tls,
    None,
}

/// Per-profile settings for the outgoing mail system and network timeouts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub smtp_security: SmtpSecurity,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn smtp_host(&self) -> AppResult<&str> {
        self.smtp_host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| {
                AppError::Config(
                    "missing smtp_host in profile settings. add it to settings.json".to_string(),
                )
            })
    }

    pub fn sender(&self) -> AppResult<&str> {
        self.sender
            .as_deref()
            .map(str::trim)
            .filter(|sender| !sender.is_empty())
            .ok_or_else(|| {
                AppError::Config(
                    "missing sender in profile settings. add it to settings.json".to_string(),
                )
            })
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

pub fn save(path: &Path, settings: &Settings) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = serde_json::to_string_pretty(settings)?;
    fs::write(path, payload)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_starttls_and_thirty_second_timeout() {
        let settings: Settings = serde_json::from_str("{}").expect("empty settings parse");
        assert_eq!(settings.smtp_security, SmtpSecurity::Starttls);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parses_security_mode() {
        let settings: Settings =
            serde_json::from_str(r#"{"smtp_host":"mx.example.com","smtp_security":"tls"}"#)
                .expect("settings parse");
        assert_eq!(settings.smtp_security, SmtpSecurity::Tls);
        assert_eq!(settings.smtp_host().expect("host"), "mx.example.com");
    }

    #[test]
    fn blank_sender_is_a_config_error() {
        let settings = Settings {
            sender: Some("  ".to_string()),
            ..Settings::default()
        };
        assert!(matches!(settings.sender(), Err(AppError::Config(_))));
    }
}
