//! `inodewatch` Core Library
//!
//! Watches inode usage on the filesystems behind a set of directories and
//! marks each one offline once usage reaches a configured threshold.
//!
//! # Crate Structure
//!
//! - [`platform`] - Host detection and per-platform probe commands
//! - [`probe`] - Running a probe and extracting the usage column
//! - [`threshold`] - Threshold parsing and verdicts
//! - [`health`] - Per-target online/offline state with hysteresis
//! - [`monitor`] - One-shot polls and the background polling loop
//! - [`config`] - `config.toml` settings and persistence
//! - [`tracing`] - Logging setup and standard span names

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod health;
pub mod monitor;
pub mod platform;
pub mod probe;
pub mod threshold;
pub mod tracing;

pub use config::{ConfigManager, MonitorSettings, ProbeOverride, Settings, TargetConfig};
pub use error::{ConfigError, ConfigResult, InodeWatchError, ProbeError, ProbeResult, ThresholdError};
pub use health::{
    HealthState, HealthStateMachine, HealthStore, OfflineCause, TargetHealthState,
    TransitionEvent, TriggerId,
};
pub use monitor::{HealthVerdictEvent, InodeMonitor, MonitorEvent, MonitorHandle, start_monitor};
pub use platform::{PlatformFamily, ProbeSpec, detect_family, host_probe_spec, select_probe};
pub use probe::{CommandExecutor, ProbeExecutor, ProbeOutcome, RawProbeResult, TabularParser};
pub use threshold::{
    DEFAULT_THRESHOLD, MeasuredValue, Threshold, Verdict, evaluate, parse_measured,
    parse_threshold,
};
