//! Conversion between user-facing key/value strings and raw bytes.
//!
//! Three display formats are supported:
//! - `quoted` (default): a double-quoted string literal with backslash escapes
//! - `hex`: lowercase hex digits, two per byte
//! - `escaped`: printable bytes as-is, everything else as `\xNN`
//!
//! For every format `decode(&encode(b, f), f) == b`.

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Display format for keys and values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Quoted,
    Hex,
    Escaped,
}

impl Format {
    pub const NAMES: [&'static str; 3] = ["quoted", "hex", "escaped"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Quoted => "quoted",
            Format::Hex => "hex",
            Format::Escaped => "escaped",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quoted" => Ok(Format::Quoted),
            "hex" => Ok(Format::Hex),
            "escaped" => Ok(Format::Escaped),
            _ => Err(format!(
                "Invalid encoding format: {}. Use 'quoted', 'hex' or 'escaped'.",
                s
            )),
        }
    }
}

/// Decode a user-supplied string into raw bytes
pub fn decode(input: &str, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Quoted => unquote(input),
        Format::Hex => {
            hex::decode(input).map_err(|e| Error::invalid_encoding(input, format, e.to_string()))
        }
        Format::Escaped => unescape(input),
    }
}

/// Render raw bytes in the given display format
pub fn encode(data: &[u8], format: Format) -> String {
    match format {
        Format::Quoted => quote(data),
        Format::Hex => hex::encode(data),
        Format::Escaped => escape(data),
    }
}

fn quote(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() + 2);
    out.push('"');
    for &b in data {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x07 => out.push_str("\\a"),
            0x08 => out.push_str("\\b"),
            0x0c => out.push_str("\\f"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x0b => out.push_str("\\v"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\x{:02x}", b);
            }
        }
    }
    out.push('"');
    out
}

fn escape(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for &b in data {
        if (0x21..=0x7e).contains(&b) && b != b'\\' {
            out.push(b as char);
        } else {
            let _ = write!(out, "\\x{:02x}", b);
        }
    }
    out
}

/// Strip one pair of enclosing double quotes, if present
fn literal_body(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        &input[1..input.len() - 1]
    } else {
        input
    }
}

/// Read `len` hex digits starting at `pos`
fn hex_value(bytes: &[u8], pos: usize, len: usize) -> Option<u32> {
    let digits = bytes.get(pos..pos + len)?;
    digits.iter().try_fold(0u32, |acc, &d| {
        (d as char).to_digit(16).map(|v| (acc << 4) | v)
    })
}

fn unquote(input: &str) -> Result<Vec<u8>> {
    let fail = |reason: &str| Error::invalid_encoding(input, Format::Quoted, reason);
    let bytes = literal_body(input).as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Err(fail("unescaped double quote")),
            b'\n' => return Err(fail("raw newline in literal")),
            b'\\' => {
                let Some(&esc) = bytes.get(i + 1) else {
                    return Err(fail("trailing backslash"));
                };
                i += 2;
                match esc {
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'v' => out.push(0x0b),
                    b'\\' => out.push(b'\\'),
                    b'"' => out.push(b'"'),
                    b'x' => {
                        let v = hex_value(bytes, i, 2)
                            .ok_or_else(|| fail("\\x needs two hex digits"))?;
                        out.push(v as u8);
                        i += 2;
                    }
                    b'0'..=b'7' => {
                        let digits = bytes
                            .get(i - 1..i + 2)
                            .filter(|d| d.iter().all(|c| (b'0'..=b'7').contains(c)))
                            .ok_or_else(|| fail("octal escape needs three digits"))?;
                        let v = digits
                            .iter()
                            .fold(0u32, |acc, &d| (acc << 3) | u32::from(d - b'0'));
                        if v > 0xff {
                            return Err(fail("octal escape out of range"));
                        }
                        out.push(v as u8);
                        i += 2;
                    }
                    b'u' | b'U' => {
                        let len = if esc == b'u' { 4 } else { 8 };
                        let ch = hex_value(bytes, i, len)
                            .and_then(char::from_u32)
                            .ok_or_else(|| fail("invalid unicode escape"))?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        i += len;
                    }
                    _ => return Err(fail("unknown escape sequence")),
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(out)
}

fn unescape(input: &str) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        if bytes.get(i + 1) != Some(&b'x') {
            return Err(Error::invalid_encoding(
                input,
                Format::Escaped,
                "only \\xNN escapes are allowed",
            ));
        }
        let v = hex_value(bytes, i + 2, 2).ok_or_else(|| {
            Error::invalid_encoding(input, Format::Escaped, "\\x needs two hex digits")
        })?;
        out.push(v as u8);
        i += 4;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_printable_ascii() {
        assert_eq!(encode(b"apple", Format::Quoted), "\"apple\"");
        assert_eq!(encode(b"a b", Format::Quoted), "\"a b\"");
        assert_eq!(encode(b"", Format::Quoted), "\"\"");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(encode(b"a\"b\\c", Format::Quoted), r#""a\"b\\c""#);
        assert_eq!(encode(b"\n\t\r", Format::Quoted), r#""\n\t\r""#);
        assert_eq!(encode(&[0x00, 0x7f, 0xff], Format::Quoted), r#""\x00\x7f\xff""#);
        assert_eq!(encode("é".as_bytes(), Format::Quoted), r#""\xc3\xa9""#);
    }

    #[test]
    fn test_unquote_with_and_without_quotes() {
        assert_eq!(decode("apple", Format::Quoted).unwrap(), b"apple");
        assert_eq!(decode("\"apple\"", Format::Quoted).unwrap(), b"apple");
        assert_eq!(decode("\"\"", Format::Quoted).unwrap(), b"");
        assert_eq!(decode("", Format::Quoted).unwrap(), b"");
    }

    #[test]
    fn test_unquote_escapes() {
        assert_eq!(decode(r"a\nb", Format::Quoted).unwrap(), b"a\nb");
        assert_eq!(decode(r"\x00\xFF", Format::Quoted).unwrap(), vec![0x00, 0xff]);
        assert_eq!(decode(r"\101\000", Format::Quoted).unwrap(), b"A\0");
        assert_eq!(decode(r"é", Format::Quoted).unwrap(), "é".as_bytes());
        assert_eq!(decode(r"\U0001F600", Format::Quoted).unwrap(), "😀".as_bytes());
        assert_eq!(decode(r#"\"\\"#, Format::Quoted).unwrap(), b"\"\\");
        assert_eq!(decode("é", Format::Quoted).unwrap(), "é".as_bytes());
    }

    #[test]
    fn test_unquote_malformed() {
        for bad in [r"abc\", r"\q", r"\x4", r"\xzz", r"\400", r"\12", r"\ud800", "a\"b", "a\nb"] {
            let err = decode(bad, Format::Quoted).unwrap_err();
            assert!(
                matches!(err, Error::InvalidEncoding { format: Format::Quoted, .. }),
                "expected InvalidEncoding for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef], Format::Hex), "deadbeef");
        assert_eq!(decode("DEADbeef", Format::Hex).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode("", Format::Hex).unwrap(), b"");
        assert!(decode("abc", Format::Hex).is_err());
        assert!(decode("zz", Format::Hex).is_err());
    }

    #[test]
    fn test_escaped() {
        assert_eq!(encode(b"key 1\\", Format::Escaped), r"key\x201\x5c");
        assert_eq!(decode(r"key\x201\x5c", Format::Escaped).unwrap(), b"key 1\\");
        assert!(decode(r"a\n", Format::Escaped).is_err());
        assert!(decode(r"a\x4", Format::Escaped).is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("HEX".parse::<Format>().unwrap(), Format::Hex);
        assert_eq!("quoted".parse::<Format>().unwrap(), Format::Quoted);
        assert_eq!("escaped".parse::<Format>().unwrap(), Format::Escaped);
        assert!("base64".parse::<Format>().is_err());
        assert_eq!(Format::default(), Format::Quoted);
    }
}
