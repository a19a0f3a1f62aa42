//! Rendering of lookup results as text or JSON lines.

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::codec::{self, Format};
use crate::error::Result;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}. Use 'text' or 'json'.", s)),
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    value: &'a str,
}

/// Writes values and entries, one per line, in the chosen encoding
pub struct Printer<'a> {
    out: &'a mut dyn Write,
    output: OutputFormat,
    format: Format,
}

impl<'a> Printer<'a> {
    pub fn new(out: &'a mut dyn Write, output: OutputFormat, format: Format) -> Self {
        Self { out, output, format }
    }

    /// A value found by exact key
    pub fn value(&mut self, value: &[u8]) -> Result<()> {
        let value = codec::encode(value, self.format);
        match self.output {
            OutputFormat::Text => writeln!(self.out, "{}", value)?,
            OutputFormat::Json => self.json(&Record {
                key: None,
                value: &value,
            })?,
        }
        Ok(())
    }

    /// A key/value pair found by scanning
    pub fn entry(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let key = codec::encode(key, self.format);
        let value = codec::encode(value, self.format);
        match self.output {
            OutputFormat::Text => writeln!(self.out, "{} {}", key, value)?,
            OutputFormat::Json => self.json(&Record {
                key: Some(&key),
                value: &value,
            })?,
        }
        Ok(())
    }

    fn json(&mut self, record: &Record<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }
}
