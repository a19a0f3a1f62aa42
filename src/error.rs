use std::path::PathBuf;

use thiserror::Error;

use crate::codec::Format;

pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes, one per error category
pub mod exit_codes {
    /// Success, including a cancelled overwrite
    pub const SUCCESS: i32 = 0;
    /// Invalid command line usage
    pub const USAGE_ERROR: i32 = 2;
    /// Store could not be opened
    pub const STORE_OPEN: i32 = 3;
    /// Key or value failed to decode
    pub const VALIDATION_ERROR: i32 = 5;
    /// IO error
    pub const IO_ERROR: i32 = 7;
    /// Store operation error
    pub const DATABASE_ERROR: i32 = 8;
    /// Write transaction did not commit
    pub const TRANSACTION_ERROR: i32 = 9;
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid {format} input {input:?}: {reason}")]
    InvalidEncoding {
        input: String,
        format: Format,
        reason: String,
    },

    #[error("failed to open store at {}: {source}", .path.display())]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: redb::Error,
    },

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("commit failed: {0}")]
    Commit(#[source] redb::CommitError),

    #[error("invalid log level {0:?} (expected trace, debug, info, warn, error, fatal, panic or off)")]
    InvalidLogLevel(String),

    #[error("missing database path, pass -db <path>")]
    MissingDatabasePath,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store is opened read-only")]
    ReadOnly,

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl Error {
    pub(crate) fn invalid_encoding(input: &str, format: Format, reason: impl Into<String>) -> Self {
        Error::InvalidEncoding {
            input: input.to_string(),
            format,
            reason: reason.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidEncoding { .. } => exit_codes::VALIDATION_ERROR,
            Error::StoreOpen { .. } => exit_codes::STORE_OPEN,
            Error::UnknownCommand(_)
            | Error::InvalidLogLevel(_)
            | Error::MissingDatabasePath
            | Error::Config(_) => exit_codes::USAGE_ERROR,
            Error::Cli(e) => e.exit_code(),
            Error::Commit(_) => exit_codes::TRANSACTION_ERROR,
            Error::ReadOnly | Error::Storage(_) | Error::Transaction(_) | Error::Table(_) => {
                exit_codes::DATABASE_ERROR
            }
            Error::Io(_) | Error::Json(_) => exit_codes::IO_ERROR,
        }
    }

    /// Short category name for the fatal log line
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidEncoding { .. } => "INVALID_ENCODING",
            Error::StoreOpen { .. } => "STORE_OPEN",
            Error::UnknownCommand(_) => "UNKNOWN_COMMAND",
            Error::Commit(_) => "COMMIT",
            Error::InvalidLogLevel(_)
            | Error::MissingDatabasePath
            | Error::Config(_)
            | Error::Cli(_) => "USAGE",
            Error::ReadOnly | Error::Storage(_) | Error::Transaction(_) | Error::Table(_) => {
                "DATABASE"
            }
            Error::Io(_) | Error::Json(_) => "IO",
        }
    }

    /// Whether the usage line should accompany the diagnostic
    pub fn wants_usage(&self) -> bool {
        matches!(
            self,
            Error::UnknownCommand(_) | Error::MissingDatabasePath
        )
    }
}
