use std::io::Write;

use crate::error::Result;

pub const USAGE: &str = "usage: kvtool -db <database> [get|set|help] [keys|key] [value]";

pub fn run(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", USAGE)?;
    Ok(())
}
