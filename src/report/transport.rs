use std::sync::LazyLock;

use lettre::Address;
use regex::Regex;
use url::Url;

use crate::config::Configuration;
use crate::error::{AppError, AppResult};

static MAILTO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^mailto:.*$").expect("mailto pattern is valid"));
static HTTPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://.*$").expect("https pattern is valid"));

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Transport {
    Email {
        recipients: Vec<Address>,
        destination: String,
    },
    Https {
        url: Url,
    },
}

impl Transport {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email { .. } => "email",
            Self::Https { .. } => "https",
        }
    }
}

/// Picks the delivery path from the configured `serverUrl`. Anything that
/// is neither a `mailto:` nor an `https://` URI leaves the installation
/// misconfigured.
pub fn select(config: &Configuration) -> AppResult<Transport> {
    let server_url = config.server_url.as_str();

    if MAILTO.is_match(server_url) {
        let recipients = mailto_recipients(server_url)?;
        let destination = recipients
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Ok(Transport::Email {
            recipients,
            destination,
        });
    }

    if HTTPS.is_match(server_url) {
        return Ok(Transport::Https {
            url: Url::parse(server_url)?,
        });
    }

    Err(AppError::Misconfigured)
}

fn mailto_recipients(server_url: &str) -> AppResult<Vec<Address>> {
    let target = server_url.trim_start_matches("mailto:");
    let target = target.split('?').next().unwrap_or_default();

    let recipients = target
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<Address>)
        .collect::<Result<Vec<_>, _>>()?;

    if recipients.is_empty() {
        return Err(AppError::Config(format!(
            "no recipient address in `{server_url}`"
        )));
    }

    Ok(recipients)
}
