use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::error::AppResult;

/// Source of a user-chosen configuration file. `None` means cancelled.
pub trait ConfigPicker {
    fn pick(&self) -> AppResult<Option<PathBuf>>;
}

/// A choice made up front, e.g. a path given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ChosenPath(pub Option<PathBuf>);

impl ConfigPicker for ChosenPath {
    fn pick(&self) -> AppResult<Option<PathBuf>> {
        Ok(self.0.clone())
    }
}

/// Asks for a path on the terminal. Non-interactive stdin or an empty
/// answer cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptPicker;

impl ConfigPicker for PromptPicker {
    fn pick(&self) -> AppResult<Option<PathBuf>> {
        if !io::stdin().is_terminal() {
            return Ok(None);
        }

        loop {
            let answer = prompt_line("Choose SES config file (*.json, empty to cancel): ")?;
            if answer.is_empty() {
                return Ok(None);
            }

            let path = PathBuf::from(answer);
            if is_json_file(&path) {
                return Ok(Some(path));
            }
            eprintln!("only JSON files can be chosen");
        }
    }
}

pub fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn prompt_line(prompt: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}
