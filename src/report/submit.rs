use lettre::Address;
use tracing::{info, warn};
use url::Url;

use crate::api::{EventEnvelope, MispClient, SubmitResult};
use crate::error::AppResult;
use crate::mail::{MessageHandle, MessageSource, SmtpForwarder};

/// Delivery through the mail system (forward-as-attachment).
#[allow(async_fn_in_trait)]
pub trait MailForwarder {
    /// Called once per report before any message is forwarded.
    fn check(&self) -> AppResult<()>;
    async fn forward(&self, to: &[Address], reporter: &str, raw_message: &[u8]) -> AppResult<()>;
}

/// Delivery to a threat-intelligence server over HTTPS.
#[allow(async_fn_in_trait)]
pub trait EventPoster {
    async fn post(
        &self,
        url: &Url,
        auth_token: &str,
        envelope: &EventEnvelope,
    ) -> AppResult<SubmitResult>;
}

impl MailForwarder for SmtpForwarder {
    fn check(&self) -> AppResult<()> {
        SmtpForwarder::check(self)
    }

    async fn forward(&self, to: &[Address], reporter: &str, raw_message: &[u8]) -> AppResult<()> {
        SmtpForwarder::forward(self, to, reporter, raw_message).await
    }
}

impl EventPoster for MispClient {
    async fn post(
        &self,
        url: &Url,
        auth_token: &str,
        envelope: &EventEnvelope,
    ) -> AppResult<SubmitResult> {
        self.submit(url, auth_token, envelope).await
    }
}

/// Result of submitting a single message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MessageOutcome {
    Forwarded,
    Accepted,
    Rejected { status: u16 },
    Failed(String),
    /// The message could not be read; nothing was sent.
    Unreadable(String),
}

impl MessageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Forwarded | Self::Accepted)
    }
}

pub async fn forward_one<S, F>(
    source: &S,
    forwarder: &F,
    handle: &MessageHandle,
    recipients: &[Address],
    reporter: &str,
) -> MessageOutcome
where
    S: MessageSource,
    F: MailForwarder,
{
    let raw = match source.read_raw(handle).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(%handle, error = %err, "skipping unreadable message");
            return MessageOutcome::Unreadable(err.to_string());
        }
    };

    match forwarder.forward(recipients, reporter, &raw).await {
        Ok(()) => {
            info!(%handle, "message forwarded");
            MessageOutcome::Forwarded
        }
        Err(err) => {
            warn!(%handle, error = %err, "forward failed");
            MessageOutcome::Failed(err.to_string())
        }
    }
}

pub async fn post_one<S, P>(
    source: &S,
    poster: &P,
    handle: &MessageHandle,
    url: &Url,
    auth_token: &str,
) -> MessageOutcome
where
    S: MessageSource,
    P: EventPoster,
{
    let raw = match source.read_raw(handle).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(%handle, error = %err, "skipping unreadable message");
            return MessageOutcome::Unreadable(err.to_string());
        }
    };

    // The event carries text; bytes that are not UTF-8 are replaced.
    let envelope = EventEnvelope::for_raw_email(String::from_utf8_lossy(&raw));
    match poster.post(url, auth_token, &envelope).await {
        Ok(result) if result.accepted => {
            info!(%handle, status = result.status, "event accepted");
            MessageOutcome::Accepted
        }
        Ok(result) => MessageOutcome::Rejected {
            status: result.status,
        },
        Err(err) => {
            warn!(%handle, error = %err, "event submission failed");
            MessageOutcome::Failed(err.to_string())
        }
    }
}
