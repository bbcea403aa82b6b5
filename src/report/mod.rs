//! Report orchestration: configuration state, transport choice and the
//! per-message submission loop, with every outcome mapped to a notice.

pub mod submit;
pub mod transport;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ChooseOutcome, ConfigPicker, ConfigStore, Configuration, LoadOutcome};
use crate::error::AppError;
use crate::mail::{MessageHandle, MessageSource};
use crate::notify::{Notice, Notifier, TITLE};

pub use submit::{EventPoster, MailForwarder, MessageOutcome};
pub use transport::Transport;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceState {
    Uninitialized,
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportSummary {
    NothingSelected,
    Misconfigured,
    /// The transport could not be used; nothing was sent.
    Aborted { transport: &'static str },
    Completed {
        transport: &'static str,
        submitted: usize,
        failed: usize,
    },
}

pub struct ReportController<N, S, F, P> {
    store: ConfigStore,
    state: InterfaceState,
    notifier: N,
    messages: S,
    forwarder: F,
    poster: P,
}

impl<N, S, F, P> ReportController<N, S, F, P>
where
    N: Notifier,
    S: MessageSource,
    F: MailForwarder,
    P: EventPoster,
{
    pub fn new(store: ConfigStore, notifier: N, messages: S, forwarder: F, poster: P) -> Self {
        Self {
            store,
            state: InterfaceState::Uninitialized,
            notifier,
            messages,
            forwarder,
            poster,
        }
    }

    pub fn state(&self) -> InterfaceState {
        self.state
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.store.current()
    }

    /// Starts disabled, then loads the profile configuration or, when there
    /// is none yet, asks the picker for one.
    pub fn startup<C: ConfigPicker + ?Sized>(&mut self, picker: &C) -> InterfaceState {
        self.disable();

        if self.store.has_default() {
            self.reload(None)
        } else {
            debug!("no profile configuration; asking for one");
            self.choose_new(picker)
        }
    }

    /// Replaces the configuration with the contents of `source` (or the
    /// profile file). A failed load leaves no configuration behind.
    pub fn reload(&mut self, source: Option<&Path>) -> InterfaceState {
        let outcome = self.store.load(source);
        self.apply_load(&outcome);
        self.state
    }

    pub fn choose_new<C: ConfigPicker + ?Sized>(&mut self, picker: &C) -> InterfaceState {
        match self.store.choose_new(picker) {
            ChooseOutcome::Cancelled => debug!("configuration choice cancelled"),
            ChooseOutcome::Adopted { outcome, persisted } => {
                self.apply_load(&outcome);
                if let Err(err) = persisted {
                    self.notify(Notice::error(format!(
                        "unable to save configuration to profile: {err}"
                    )));
                }
            }
            ChooseOutcome::Rejected { chosen, fallback } => {
                self.apply_load(&chosen);
                self.apply_load(&fallback);
            }
        }
        self.state
    }

    /// Submits every selected message, in order, through the transport the
    /// configured destination calls for.
    pub async fn report(&mut self, selection: &[MessageHandle]) -> ReportSummary {
        if selection.is_empty() {
            return ReportSummary::NothingSelected;
        }

        let Some(config) = self.store.current().cloned() else {
            self.misconfigured();
            return ReportSummary::Misconfigured;
        };

        let transport = match transport::select(&config) {
            Ok(transport) => transport,
            Err(AppError::Misconfigured) => {
                warn!(server_url = %config.server_url, "unsupported destination scheme");
                self.misconfigured();
                return ReportSummary::Misconfigured;
            }
            Err(err) => {
                warn!(error = %err, "unusable destination");
                self.notify(Notice::error(err.to_string()));
                self.misconfigured();
                return ReportSummary::Misconfigured;
            }
        };

        info!(transport = transport.kind(), messages = selection.len(), "reporting");
        match transport {
            Transport::Email {
                recipients,
                destination,
            } => {
                self.report_via_email(selection, &config, &recipients, &destination)
                    .await
            }
            Transport::Https { url } => self.report_via_https(selection, &config, &url).await,
        }
    }

    async fn report_via_email(
        &self,
        selection: &[MessageHandle],
        config: &Configuration,
        recipients: &[lettre::Address],
        destination: &str,
    ) -> ReportSummary {
        if let Err(err) = self.forwarder.check() {
            self.notify(Notice::error(err.to_string()));
            return ReportSummary::Aborted { transport: "email" };
        }

        let mut submitted = 0;
        let mut failed = 0;
        for handle in selection {
            let outcome = submit::forward_one(
                &self.messages,
                &self.forwarder,
                handle,
                recipients,
                &config.name,
            )
            .await;

            match outcome {
                MessageOutcome::Unreadable(err) => {
                    failed += 1;
                    self.notify(Notice::error(format!("error: {err}")));
                }
                MessageOutcome::Failed(err) => {
                    failed += 1;
                    self.notify(Notice::error(format!("Error: {err}")).titled(TITLE));
                }
                _ => submitted += 1,
            }
        }

        if submitted > 0 {
            self.notify(Notice::info(sent_summary(submitted, destination)));
        }

        ReportSummary::Completed {
            transport: "email",
            submitted,
            failed,
        }
    }

    async fn report_via_https(
        &self,
        selection: &[MessageHandle],
        config: &Configuration,
        url: &url::Url,
    ) -> ReportSummary {
        let mut submitted = 0;
        let mut failed = 0;
        for handle in selection {
            let outcome =
                submit::post_one(&self.messages, &self.poster, handle, url, &config.auth_token)
                    .await;

            let notice = match &outcome {
                MessageOutcome::Accepted | MessageOutcome::Forwarded => {
                    Notice::info(format!("Submitted an email to {}", config.server_url))
                }
                MessageOutcome::Rejected { status } => {
                    Notice::error(format!("Server returned status {status}"))
                }
                MessageOutcome::Failed(err) => Notice::error(format!("Error: {err}")),
                MessageOutcome::Unreadable(err) => Notice::error(format!("error: {err}")),
            };

            if outcome.is_success() {
                submitted += 1;
            } else {
                failed += 1;
            }
            self.notify(notice);
        }

        ReportSummary::Completed {
            transport: "https",
            submitted,
            failed,
        }
    }

    fn apply_load(&mut self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded => self.enable(),
            LoadOutcome::Malformed(err) => {
                self.notify(Notice::error(err.clone()));
                self.misconfigured();
            }
            LoadOutcome::Missing | LoadOutcome::Incomplete(_) => self.misconfigured(),
        }
    }

    fn misconfigured(&mut self) {
        self.notify(Notice::misconfigured());
        self.disable();
    }

    fn enable(&mut self) {
        self.state = InterfaceState::Enabled;
    }

    fn disable(&mut self) {
        self.state = InterfaceState::Disabled;
    }

    fn notify(&self, notice: Notice) {
        let notice = match self.store.current() {
            Some(config) => notice.branded(&config.name, &config.logo),
            None => notice,
        };
        self.notifier.notify(&notice);
    }
}

fn sent_summary(count: usize, destination: &str) -> String {
    let confirm = format!(" of mail to\n{destination}\nfor inspection");
    if count == 1 {
        format!("Sent one piece{confirm}")
    } else {
        format!("Sent {count} pieces{confirm}")
    }
}
