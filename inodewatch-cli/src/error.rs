//! CLI error types and exit codes.

use inodewatch_core::{ConfigError, ThresholdError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or other failures
    pub const GENERAL_ERROR: i32 = 1;
    /// A target is offline or could not be probed (`check --strict`)
    pub const TARGET_UNHEALTHY: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid threshold text
    #[error("{0}")]
    Threshold(#[from] ThresholdError),

    /// Unknown target id
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    /// Strict check found offline or unmeasurable targets
    #[error("Unhealthy targets: {0}")]
    Unhealthy(String),

    /// Async runtime or logging setup failed
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Threshold(e) => Self::Threshold(e),
            other => Self::Config(other.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// - 1: General error (configuration, validation, IO)
    /// - 2: Strict check failed
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Unhealthy(_) => exit_codes::TARGET_UNHEALTHY,
            Self::Config(_)
            | Self::Threshold(_)
            | Self::TargetNotFound(_)
            | Self::Runtime(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
