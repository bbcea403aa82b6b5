pub mod console;
pub mod desktop;

use serde::Serialize;

pub use console::ConsoleNotifier;
pub use desktop::DesktopNotifier;

pub const TITLE: &str = "SES";
pub const ERROR_TITLE: &str = "SES error";
pub const MISCONFIGURED: &str = "SES is misconfigured. Malware reporting will be unavailable.";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A user-facing message, shown once and then discarded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub title: &'static str,
    pub body: String,
    /// Display name from the active configuration, when there is one.
    #[serde(skip)]
    pub app_name: Option<String>,
    #[serde(skip)]
    pub icon: Option<String>,
}

impl Notice {
    pub fn info(body: impl Into<String>) -> Self {
        Self::new(Level::Info, TITLE, body.into())
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new(Level::Error, ERROR_TITLE, body.into())
    }

    pub fn misconfigured() -> Self {
        Self::error(MISCONFIGURED)
    }

    /// Keeps the level but shows the notice under another title.
    pub fn titled(mut self, title: &'static str) -> Self {
        self.title = title;
        self
    }

    pub fn branded(mut self, app_name: &str, icon: &str) -> Self {
        self.app_name = Some(app_name.to_string()).filter(|name| !name.trim().is_empty());
        self.icon = Some(icon.to_string()).filter(|icon| !icon.trim().is_empty());
        self
    }

    fn new(level: Level, title: &'static str, body: String) -> Self {
        Self {
            level,
            title,
            body,
            app_name: None,
            icon: None,
        }
    }
}

/// The surface notices are shown on. Implementations must not fail the
/// caller; delivery problems are logged and swallowed.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice);
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice);
    }
}
