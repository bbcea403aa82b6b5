use tracing::warn;

use crate::output::{Channel, Output};

use super::{Level, Notice, Notifier};

/// Info notices go to stdout and errors to stderr; `--json` puts both on
/// stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    output: Output,
}

impl ConsoleNotifier {
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let channel = match notice.level {
            Level::Info => Channel::Stdout,
            Level::Error => Channel::Stderr,
        };
        let text = format_notice(notice);
        if let Err(err) = self.output.emit_on(channel, &text, notice) {
            warn!(error = %err, "failed to print notice");
        }
    }
}

fn format_notice(notice: &Notice) -> String {
    let body = notice.body.lines().collect::<Vec<_>>().join(" ");
    format!("{}: {body}", notice.title)
}
