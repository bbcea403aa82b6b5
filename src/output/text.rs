use std::io::{self, Write};

use crate::error::AppResult;

pub fn print_line(line: &str) -> AppResult<()> {
    writeln!(io::stdout().lock(), "{line}")?;
    Ok(())
}

pub fn eprint_line(line: &str) -> AppResult<()> {
    writeln!(io::stderr().lock(), "{line}")?;
    Ok(())
}
