use std::io::Write;

use tracing::debug;

use crate::codec::{self, Format};
use crate::error::Result;
use crate::matcher;
use crate::output::{OutputFormat, Printer};
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetArgs {
    /// Encoded keys; decoded with `format`
    pub keys: Vec<String>,
    pub format: Format,
}

/// Look up keys, returning how many results were printed.
///
/// A single key is tried as an exact lookup first and, if absent, used as
/// the only filter term of a full scan. Any other number of keys goes
/// straight to the scan, printing entries whose key contains every term.
/// Everything happens inside one read snapshot.
pub fn run(
    store: &Store,
    args: &GetArgs,
    output: OutputFormat,
    out: &mut dyn Write,
) -> Result<usize> {
    let terms = args
        .keys
        .iter()
        .map(|key| codec::decode(key, args.format))
        .collect::<Result<Vec<_>>>()?;

    let mut printer = Printer::new(out, output, args.format);

    store.view(|snapshot| {
        if let [key] = terms.as_slice() {
            if let Some(value) = snapshot.get(key)? {
                printer.value(&value)?;
                return Ok(1);
            }
            debug!(
                key = %codec::encode(key, Format::Quoted),
                "exact key absent, scanning for it as a substring"
            );
        }

        let mut printed = 0;
        snapshot.scan(|key, value| {
            if matcher::matches(key, terms.as_slice()) {
                printer.entry(key, value)?;
                printed += 1;
            }
            Ok(())
        })?;
        Ok(printed)
    })
}
