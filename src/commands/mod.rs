//! Command handlers and the dispatch that runs them against an open store.
//!
//! - get: exact lookup with substring-scan fallback
//! - set: guarded overwrite with confirmation
//! - help: usage line

pub mod get;
pub mod help;
pub mod set;

use std::io::Write;

use tracing::debug;

pub use get::GetArgs;
pub use set::{SetArgs, SetOutcome};

use crate::config::{AccessMode, GlobalOptions};
use crate::confirm::Confirm;
use crate::error::Result;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(GetArgs),
    Set(SetArgs),
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get(_) => "get",
            Command::Set(_) => "set",
            Command::Help => "help",
        }
    }

    /// How the store must be opened, `None` when it is not needed at all
    pub fn access(&self) -> Option<AccessMode> {
        match self {
            Command::Get(_) => Some(AccessMode::ReadOnly),
            Command::Set(_) => Some(AccessMode::ReadWrite),
            Command::Help => None,
        }
    }
}

/// A fully parsed command line
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub globals: GlobalOptions,
    /// `None` when no command was given
    pub command: Option<Command>,
}

/// Run an invocation to completion.
///
/// The store is opened only for commands that need it and is closed before
/// returning, whether the handler succeeded or not.
pub fn execute(
    invocation: &Invocation,
    out: &mut dyn Write,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    let Some(command) = &invocation.command else {
        return help::run(out);
    };
    let Some(access) = command.access() else {
        return help::run(out);
    };

    let config = invocation.globals.store_config(access)?;
    let store = Store::open(&config)?;
    let result = run_command(command, &store, &invocation.globals, out, confirm);
    store.close();
    result
}

fn run_command(
    command: &Command,
    store: &Store,
    globals: &GlobalOptions,
    out: &mut dyn Write,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    debug!(command = command.name(), "executing");
    match command {
        Command::Get(args) => {
            let printed = get::run(store, args, globals.output, out)?;
            debug!(printed, "get finished");
        }
        Command::Set(args) => {
            let outcome = set::run(store, args, out, confirm)?;
            debug!(?outcome, "set finished");
        }
        Command::Help => help::run(out)?,
    }
    out.flush()?;
    Ok(())
}
