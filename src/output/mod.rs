pub mod json;
pub mod text;

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    /// One JSON document per line on stdout.
    Json,
}

/// Where a text line goes. JSON documents always go to stdout so a
/// consumer sees one ordered stream.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Channel {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn emit<T: Serialize>(&self, text_line: &str, json_value: &T) -> AppResult<()> {
        self.emit_on(Channel::Stdout, text_line, json_value)
    }

    pub fn emit_on<T: Serialize>(
        &self,
        channel: Channel,
        text_line: &str,
        json_value: &T,
    ) -> AppResult<()> {
        match (self.mode, channel) {
            (OutputMode::Json, _) => json::print_line(json_value),
            (OutputMode::Text, Channel::Stdout) => text::print_line(text_line),
            (OutputMode::Text, Channel::Stderr) => text::eprint_line(text_line),
        }
    }
}
