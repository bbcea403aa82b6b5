use notify_rust::Notification;
use tracing::warn;

use super::{Notice, Notifier, TITLE};

/// Shows notices through the desktop notification service.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: &Notice) {
        let mut notification = Notification::new();
        notification
            .appname(notice.app_name.as_deref().unwrap_or(TITLE))
            .summary(notice.title)
            .body(&notice.body);
        if let Some(icon) = notice.icon.as_deref() {
            notification.icon(icon);
        }

        if let Err(err) = notification.show() {
            warn!(error = %err, title = notice.title, body = %notice.body, "desktop notification failed");
            eprintln!("{}: {}", notice.title, notice.body);
        }
    }
}
