//! Per-target health state and the transition rules applied to it

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::threshold::{MeasuredValue, Threshold, Verdict, evaluate};

/// Display name used for targets without an id (the local controller)
pub const BUILT_IN_TARGET_NAME: &str = "built-in";

/// Default trigger id for inode monitors
pub const DEFAULT_TRIGGER_ID: &str = "inodes";

/// Identifies the monitor that put a target offline
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(String);

impl TriggerId {
    /// Creates a trigger id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TriggerId {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_ID)
    }
}

impl From<&str> for TriggerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a target is offline, and who decided it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineCause {
    /// Monitor that owns this cause
    pub triggered_by: TriggerId,
    /// Most recent usage seen by the owning monitor
    pub usage: MeasuredValue,
    /// Threshold that was crossed
    pub threshold: Threshold,
    /// When the target went offline
    pub since: DateTime<Utc>,
}

impl fmt::Display for OfflineCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Free inodes too low: {} used, threshold {} ({})",
            self.usage, self.threshold, self.triggered_by
        )
    }
}

/// Online/offline state of a target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HealthState {
    /// Accepting work
    #[default]
    Online,
    /// Taken offline
    Offline(OfflineCause),
}

impl HealthState {
    /// True when offline for any reason
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self, Self::Offline(_))
    }

    /// Returns the offline cause, if any
    #[must_use]
    pub const fn offline_cause(&self) -> Option<&OfflineCause> {
        match self {
            Self::Online => None,
            Self::Offline(cause) => Some(cause),
        }
    }

    /// Short label for tables and logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline(_) => "offline",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline(cause) => write!(f, "offline ({cause})"),
        }
    }
}

/// Health bookkeeping for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetHealthState {
    /// Target identifier
    pub target_id: String,
    /// Current state
    pub state: HealthState,
    /// Last measurement applied, sentinel included
    pub last_known_value: MeasuredValue,
    /// When the last measurement was applied
    pub last_checked: Option<DateTime<Utc>>,
}

impl TargetHealthState {
    /// A target that has not been polled yet: online, no data
    #[must_use]
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            state: HealthState::Online,
            last_known_value: MeasuredValue::Unavailable,
            last_checked: None,
        }
    }

    /// Name for messages; the unnamed target is the built-in one
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.target_id)
    }
}

/// Maps an empty target id to [`BUILT_IN_TARGET_NAME`]
#[must_use]
pub fn display_name(target_id: &str) -> &str {
    if target_id.is_empty() {
        BUILT_IN_TARGET_NAME
    } else {
        target_id
    }
}

/// Record of one state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Target that changed
    pub target_id: String,
    /// State before
    pub old_state: HealthState,
    /// State after
    pub new_state: HealthState,
    /// Measurement that caused it
    pub measured: MeasuredValue,
    /// Threshold in force
    pub threshold: Threshold,
    /// When it happened
    pub at: DateTime<Utc>,
}

impl TransitionEvent {
    /// True for online -> offline
    #[must_use]
    pub const fn went_offline(&self) -> bool {
        self.new_state.is_offline()
    }
}

/// Applies verdicts for one monitor.
///
/// - `Online` + `Exceeded` goes offline with a cause owned by this monitor.
/// - Already offline + `Exceeded` changes nothing and emits nothing.
/// - `Offline` + `WithinLimit` comes back online only if this monitor owns the cause.
/// - Sentinel measurements never change state.
#[derive(Debug, Clone, Default)]
pub struct HealthStateMachine {
    trigger: TriggerId,
}

impl HealthStateMachine {
    /// Creates a state machine acting as `trigger`
    #[must_use]
    pub const fn new(trigger: TriggerId) -> Self {
        Self { trigger }
    }

    /// Trigger this machine acts as
    #[must_use]
    pub const fn trigger(&self) -> &TriggerId {
        &self.trigger
    }

    /// Applies a measurement to `target` and returns the transition, if any
    pub fn apply(
        &self,
        target: &mut TargetHealthState,
        measured: MeasuredValue,
        threshold: Threshold,
    ) -> Option<TransitionEvent> {
        let now = Utc::now();
        target.last_known_value = measured;
        target.last_checked = Some(now);

        let Some(verdict) = evaluate(measured, threshold) else {
            tracing::debug!(
                target_id = %target.display_name(),
                usage = %measured,
                "No measurement, holding state"
            );
            return None;
        };

        let new_state = match (&mut target.state, verdict) {
            (HealthState::Online, Verdict::Exceeded) => HealthState::Offline(OfflineCause {
                triggered_by: self.trigger.clone(),
                usage: measured,
                threshold,
                since: now,
            }),
            (HealthState::Offline(cause), Verdict::Exceeded) => {
                if cause.triggered_by == self.trigger {
                    cause.usage = measured;
                }
                return None;
            }
            (HealthState::Offline(cause), Verdict::WithinLimit) => {
                if cause.triggered_by != self.trigger {
                    tracing::debug!(
                        target_id = %display_name(&target.target_id),
                        owner = %cause.triggered_by,
                        trigger = %self.trigger,
                        "Offline cause owned by another monitor, not clearing"
                    );
                    return None;
                }
                HealthState::Online
            }
            (HealthState::Online, Verdict::WithinLimit) => return None,
        };

        let old_state = std::mem::replace(&mut target.state, new_state.clone());
        let current_state = format!("current={measured},threshold={threshold}");
        if new_state.is_offline() {
            tracing::warn!(
                target_id = %target.display_name(),
                trigger = %self.trigger,
                "Target marked offline: {current_state}"
            );
        } else {
            tracing::info!(
                target_id = %target.display_name(),
                trigger = %self.trigger,
                "Target marked online: {current_state}"
            );
        }

        Some(TransitionEvent {
            target_id: target.target_id.clone(),
            old_state,
            new_state,
            measured,
            threshold,
            at: now,
        })
    }
}
