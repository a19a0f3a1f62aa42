//! kvtool - inspect and edit an embedded ordered key-value store.
//!
//! The library holds everything the `kvtool` binary does so that it can be
//! driven from tests: argument parsing ([`cli`]), the command handlers
//! ([`commands`]), the display codec ([`codec`]), the key filter
//! ([`matcher`]) and the redb-backed store session ([`store`]).

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod store;

pub use codec::Format;
pub use commands::{execute, Command, GetArgs, Invocation, SetArgs, SetOutcome};
pub use config::{AccessMode, GlobalOptions, LogLevel, StoreConfig};
pub use confirm::{Confirm, LineConfirm};
pub use error::{Error, Result};
pub use output::OutputFormat;
pub use store::{Snapshot, Store, WriteTxn};
