//! Monitor settings (stored in `config.toml`)
//!
//! `[monitor]` holds the global defaults; each `[[targets]]` entry names a
//! directory whose filesystem is probed.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::health::{BUILT_IN_TARGET_NAME, TriggerId, display_name};
use crate::platform::ProbeSpec;
use crate::probe::{DEFAULT_MAX_LINES, DEFAULT_PROBE_TIMEOUT_SECS};
use crate::threshold::Threshold;

/// Default number of targets probed at once
pub const DEFAULT_CONCURRENCY: usize = 10;

const fn default_interval_secs() -> u32 {
    60
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

const fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

const fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

const fn default_header_lines() -> usize {
    1
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Global monitor settings
    #[serde(default)]
    pub monitor: MonitorSettings,
    /// Monitored targets
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl Settings {
    /// Checks invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateTarget`] if two targets share an id,
    /// or [`ConfigError::InvalidProbe`] for an unusable probe override.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(probe) = &self.monitor.probe {
            probe.validate()?;
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            let name = display_name(&target.id);
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateTarget(name.to_string()));
            }
        }
        Ok(())
    }

    /// Configured targets, or the current directory as `built-in` if none
    #[must_use]
    pub fn effective_targets(&self) -> Vec<TargetConfig> {
        if self.targets.is_empty() {
            vec![TargetConfig::new(BUILT_IN_TARGET_NAME, ".")]
        } else {
            self.targets.clone()
        }
    }
}

/// Global monitor settings (`[monitor]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Offline threshold, e.g. `"95%"`
    #[serde(default)]
    pub threshold: Threshold,
    /// Identity recorded on offline causes set by this monitor
    #[serde(default)]
    pub trigger_id: TriggerId,
    /// Seconds between polls in watch mode (1-3600, default: 60)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u32,
    /// Probe command timeout in seconds (1-300, default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum stdout lines read from a probe
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    /// Targets probed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Replaces the platform's probe when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeOverride>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            trigger_id: TriggerId::default(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            max_lines: default_max_lines(),
            concurrency: default_concurrency(),
            probe: None,
        }
    }
}

impl MonitorSettings {
    /// Returns the poll interval clamped to 1-3600 seconds
    #[must_use]
    pub fn effective_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs.clamp(1, 3600)))
    }

    /// Returns the probe timeout clamped to 1-300 seconds
    #[must_use]
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, 300))
    }

    /// Returns the concurrency, at least 1
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Probe to use: the override if configured, else the host's
    #[must_use]
    pub fn probe_spec(&self) -> ProbeSpec {
        self.probe.as_ref().map_or_else(
            || crate::platform::host_probe_spec().clone(),
            ProbeOverride::to_spec,
        )
    }
}

/// Custom probe command (`[monitor.probe]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOverride {
    /// Program and arguments
    pub command: Vec<String>,
    /// Header lines before the data row (default: 1)
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
    /// 1-indexed column with the percentage
    pub value_column: usize,
}

impl ProbeOverride {
    /// Rejects an empty command and column 0
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProbe`] naming the bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.command.first().is_none_or(String::is_empty) {
            return Err(ConfigError::InvalidProbe("command is empty".into()));
        }
        if self.value_column == 0 {
            return Err(ConfigError::InvalidProbe(
                "value_column is 1-indexed and must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Converts to a [`ProbeSpec`]
    #[must_use]
    pub fn to_spec(&self) -> ProbeSpec {
        ProbeSpec::custom(self.command.clone(), self.header_lines, self.value_column)
    }
}

/// One monitored target (`[[targets]]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Unique target id
    pub id: String,
    /// Directory the probe runs in; `~` and `$VAR` are expanded
    pub path: PathBuf,
}

impl TargetConfig {
    /// Creates a target
    #[must_use]
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Path with `~` and environment variables expanded. Unknown variables
    /// are left as written.
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        let raw = self.path.to_string_lossy();
        match shellexpand::full(&raw) {
            Ok(expanded) => PathBuf::from(expanded.into_owned()),
            Err(e) => {
                tracing::debug!(path = %raw, error = %e, "Path expansion failed");
                PathBuf::from(shellexpand::tilde(&raw).into_owned())
            }
        }
    }
}
