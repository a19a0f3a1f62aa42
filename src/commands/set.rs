use std::io::Write;

use tracing::{info, warn};

use crate::codec::{self, Format};
use crate::confirm::Confirm;
use crate::error::Result;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetArgs {
    /// Quoted-literal key
    pub key: String,
    /// Quoted-literal value
    pub value: String,
    /// Overwrite without asking
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Written,
    /// The user declined to overwrite; the store is unchanged
    Cancelled,
}

/// Write one key, asking before replacing an existing value unless forced.
pub fn run(
    store: &Store,
    args: &SetArgs,
    out: &mut dyn Write,
    confirm: &mut dyn Confirm,
) -> Result<SetOutcome> {
    let key = codec::decode(&args.key, Format::Quoted)?;
    let value = codec::decode(&args.value, Format::Quoted)?;
    let shown_key = codec::encode(&key, Format::Quoted);

    let txn = store.begin_write()?;
    if let Some(existing) = txn.get(&key)? {
        writeln!(
            out,
            "key already exists: {} {}",
            shown_key,
            codec::encode(&existing, Format::Quoted)
        )?;
        if !args.force {
            write!(out, "continue set? (y/n) ")?;
            out.flush()?;
            if !confirm.confirm()? {
                writeln!(out, "canceled")?;
                txn.abort()?;
                info!(key = %shown_key, "overwrite canceled");
                return Ok(SetOutcome::Cancelled);
            }
        }
        warn!(key = %shown_key, forced = args.force, "overwriting existing value");
    }

    writeln!(
        out,
        "write {} {}",
        shown_key,
        codec::encode(&value, Format::Quoted)
    )?;
    txn.set(&key, &value)?;
    txn.commit()?;
    info!(key = %shown_key, bytes = value.len(), "value written");
    Ok(SetOutcome::Written)
}
