//! Error types for netsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Only request-level
//! validation errors reach callers of a scan; per-host probe failures are
//! absorbed by the coordinator.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use crate::types::{AddressError, PortError};

/// Failure of a single probe invocation against one host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe of {host} timed out after {}ms", .timeout.as_millis())]
    Timeout { host: Ipv4Addr, timeout: Duration },

    #[error("probe of {host} failed: {reason}")]
    Execution { host: Ipv4Addr, reason: String },
}

impl ProbeError {
    /// Check if this failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Request-level scan errors.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    #[error("invalid port list: {0}")]
    InvalidPorts(#[from] PortError),

    #[error("unknown scan mode '{0}' (expected all, specified or quick)")]
    UnknownMode(String),

    #[error("{hosts} hosts exceeds the configured limit of {limit}")]
    TooManyHosts { hosts: u64, limit: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("invalid setting: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by CLI command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Already reported to the caller as an error response.
    #[error("request rejected: {0}")]
    Rejected(ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Check if the error body has already been written out.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
