use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info};

use crate::config::{Settings, SmtpSecurity};
use crate::error::{AppError, AppResult};

use super::mime::{self, ForwardRequest};

/// Forwards reported messages through the profile's outgoing SMTP server.
#[derive(Debug, Clone)]
pub struct SmtpForwarder {
    settings: Settings,
}

impl SmtpForwarder {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Fails when the profile lacks what an SMTP submission needs.
    pub fn check(&self) -> AppResult<()> {
        self.settings.smtp_host()?;
        self.sender()?;
        Ok(())
    }

    pub async fn forward(
        &self,
        to: &[Address],
        reporter: &str,
        raw_message: &[u8],
    ) -> AppResult<()> {
        let sender = self.sender()?;
        let message = mime::build_forward_message(&ForwardRequest {
            from: &sender,
            to,
            reporter,
            raw_message,
        });
        let envelope = Envelope::new(Some(sender), to.to_vec())
            .map_err(|err| AppError::Mail(err.to_string()))?;

        let transport = self.transport()?;
        debug!(recipients = to.len(), bytes = message.len(), "submitting forward");
        let response = transport.send_raw(&envelope, &message).await?;
        info!(code = %response.code(), "forward accepted by smtp server");
        Ok(())
    }

    fn sender(&self) -> AppResult<Address> {
        Ok(self.settings.sender()?.parse()?)
    }

    fn transport(&self) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
        let host = self.settings.smtp_host()?;
        let mut builder = match self.settings.smtp_security {
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        if let Some(port) = self.settings.smtp_port {
            builder = builder.port(port);
        }

        if let (Some(username), Some(password)) = (
            self.settings.smtp_username.as_ref(),
            self.settings.smtp_password.as_ref(),
        ) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(builder.timeout(Some(self.settings.timeout())).build())
    }
}
