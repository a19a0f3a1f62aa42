//! Invocation-wide settings: where the store lives, how it is opened and
//! how chatty the diagnostics are.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};
use crate::output::OutputFormat;

/// Store file created inside the `-db` directory
pub const DATA_FILE: &str = "data.redb";

/// Validation limits for configuration values
pub mod limits {
    /// Minimum cache size in MiB
    pub const MIN_CACHE_SIZE_MB: u64 = 1;
    /// Maximum cache size in MiB (100 GiB)
    pub const MAX_CACHE_SIZE_MB: u64 = 100 * 1024;
}

/// How a command needs the store opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Open an existing store and never start a write transaction
    ReadOnly,
    /// Create the store if missing and allow write transactions
    ReadWrite,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub access: AccessMode,
    /// Page cache size in bytes; `None` keeps the store's default
    pub cache_size: Option<usize>,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>, access: AccessMode) -> Self {
        Self {
            path: path.into(),
            access,
            cache_size: None,
        }
    }

    pub fn with_cache_size_mb(mut self, size_mb: u64) -> Result<Self> {
        let bytes = validate_cache_size(size_mb)?;
        self.cache_size = Some(usize::try_from(bytes).map_err(|_| {
            Error::Config(format!("cache-size {} MB does not fit in memory", size_mb))
        })?);
        Ok(self)
    }

    /// The store file: `path` itself when it is a regular file, otherwise
    /// `path/data.redb`.
    pub fn data_file(&self) -> PathBuf {
        if self.path.is_file() {
            self.path.clone()
        } else {
            self.path.join(DATA_FILE)
        }
    }

    pub fn dir(&self) -> &Path {
        &self.path
    }
}

/// Validate cache size in MiB, returning bytes
pub fn validate_cache_size(size_mb: u64) -> Result<u64> {
    if size_mb < limits::MIN_CACHE_SIZE_MB {
        return Err(Error::Config(format!(
            "cache-size must be at least {} MB",
            limits::MIN_CACHE_SIZE_MB
        )));
    }
    if size_mb > limits::MAX_CACHE_SIZE_MB {
        return Err(Error::Config(format!(
            "cache-size cannot exceed {} GB",
            limits::MAX_CACHE_SIZE_MB / 1024
        )));
    }
    Ok(size_mb.saturating_mul(1024 * 1024))
}

/// Diagnostic verbosity selected with `-l`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // fatal and panic have no tracing counterpart; both still report errors
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "fatal" | "panic" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            _ => Err(Error::InvalidLogLevel(s.to_string())),
        }
    }
}

/// Options given before the command name
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub db: Option<PathBuf>,
    pub log_level: LogLevel,
    pub output: OutputFormat,
    pub cache_size_mb: Option<u64>,
}

impl GlobalOptions {
    /// Build the store configuration for a command needing `access`
    pub fn store_config(&self, access: AccessMode) -> Result<StoreConfig> {
        let path = self.db.as_ref().ok_or(Error::MissingDatabasePath)?;
        if path.as_os_str().is_empty() {
            return Err(Error::MissingDatabasePath);
        }
        let config = StoreConfig::new(path, access);
        match self.cache_size_mb {
            Some(size_mb) => config.with_cache_size_mb(size_mb),
            None => Ok(config),
        }
    }
}
