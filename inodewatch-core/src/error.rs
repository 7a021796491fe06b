//! Error types for `inodewatch`
//!
//! Configuration-time failures ([`ThresholdError`], [`ConfigError`]) are
//! returned to the caller. Probe-time failures ([`ProbeError`]) never leave
//! the polling boundary: the monitor folds them into a
//! [`MeasuredValue`](crate::threshold::MeasuredValue) sentinel.

use std::path::PathBuf;

use thiserror::Error;

/// Threshold text did not match `\d?\d%`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThresholdError {
    /// Rejected configuration text
    #[error("Invalid threshold '{0}': expected 1-2 digits followed by '%' (e.g. \"95%\")")]
    InvalidThreshold(String),
}

/// Failures while probing a target
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The command could not be launched, closed early, or timed out
    #[error("Probe command failed: {0}")]
    ProbeExecutionFailed(String),

    /// Expected header lines, data row or column were missing
    #[error("Truncated probe output: {0}")]
    TruncatedOutput(String),

    /// The extracted token is not a percentage in 0-100
    #[error("Invalid measurement '{0}'")]
    InvalidMeasurement(String),

    /// No usable probe for this platform
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

/// Errors related to configuration loading and saving
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write a configuration file
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File that could not be accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has invalid values
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// The platform has no configuration directory
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// Two targets share the same identifier
    #[error("Duplicate target id '{0}'")]
    DuplicateTarget(String),

    /// `[monitor.probe]` cannot be run or parsed
    #[error("Invalid probe override: {0}")]
    InvalidProbe(String),

    /// Threshold rejected while validating settings
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Top-level error for the library
#[derive(Debug, Error)]
pub enum InodeWatchError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Threshold error
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    /// Probe error
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Tracing setup error
    #[error(transparent)]
    Tracing(#[from] crate::tracing::TracingError),
}
