use std::io::{self, Write};

use serde::Serialize;

use crate::error::AppResult;

pub fn print_line<T: Serialize>(value: &T) -> AppResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
