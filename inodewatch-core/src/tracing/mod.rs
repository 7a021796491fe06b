//! Log output setup
//!
//! [`init_tracing`] installs a stderr subscriber filtered to the inodewatch
//! crates. [`trace_operation!`](crate::trace_operation) and
//! [`span_names`] give polls, probe runs and config I/O consistent spans.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Subscriber installation failures
#[derive(Debug, Error)]
pub enum TracingError {
    /// Filter rejected or global subscriber already set by someone else
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// `init_tracing` was already called in this process
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,
}

/// Result alias for [`init_tracing`]
pub type TracingResult<T> = Result<T, TracingError>;

/// Minimum level written to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Adds warnings, e.g. unmeasurable targets
    #[default]
    Warn,
    /// Adds state transitions and monitor start/stop
    Info,
    /// Adds per-poll detail
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Level for a `-v` count; `quiet` wins over any count
    #[must_use]
    pub const fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`init_tracing`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingConfig {
    /// Minimum level for the inodewatch crates
    pub level: TracingLevel,
    /// Prefix lines with the thread id
    pub thread_ids: bool,
    /// Colorize level names
    pub ansi: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: TracingLevel::default(),
            thread_ids: false,
            ansi: true,
        }
    }
}

impl TracingConfig {
    /// Warn level, no thread ids, colors on
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Toggles thread ids
    #[must_use]
    pub const fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Toggles colors
    #[must_use]
    pub const fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// `EnvFilter` directive; events from other crates are dropped
    #[must_use]
    pub fn filter_directive(&self) -> String {
        format!("inodewatch_core={0},inodewatch={0}", self.level)
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` is ignored; the level comes from `config` alone.
///
/// # Errors
///
/// [`TracingError::AlreadyInitialized`] on a second call, or
/// [`TracingError::InitializationFailed`] if another global subscriber is
/// already installed.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let filter = EnvFilter::try_new(config.filter_directive())
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(config.thread_ids)
                .with_ansi(config.ansi)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;

    tracing::debug!(level = %config.level, "Logging ready");
    Ok(())
}

/// Info-level span named by one of [`span_names`]
///
/// ```ignore
/// let span = inodewatch_core::trace_operation!(span_names::MONITOR_POLL, target_id = %id);
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Debug-level [`trace_operation!`]
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Span names
pub mod span_names {
    /// Probe, evaluate and update for one target
    pub const MONITOR_POLL: &str = "monitor.poll";
    /// One run of the probe command
    pub const PROBE_EXECUTE: &str = "probe.execute";
    /// Reading the config file
    pub const CONFIG_LOAD: &str = "config.load";
    /// Writing the config file
    pub const CONFIG_SAVE: &str = "config.save";
}
