//! Single-shot polling of targets

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::Instrument;

use crate::config::{Settings, TargetConfig};
use crate::health::{
    HealthState, HealthStateMachine, HealthStore, TransitionEvent, TriggerId, display_name,
};
use crate::platform::ProbeSpec;
use crate::probe::{self, CommandExecutor, ProbeExecutor};
use crate::threshold::{MeasuredValue, Threshold, Verdict, evaluate};
use crate::tracing::span_names;

/// Result of polling one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthVerdictEvent {
    /// Target that was polled
    pub target_id: String,
    /// Measured usage or sentinel
    pub measured: MeasuredValue,
    /// Threshold in force
    pub threshold: Threshold,
    /// Verdict, absent for sentinel measurements
    pub verdict: Option<Verdict>,
    /// State after the poll
    pub state: HealthState,
    /// State change caused by this poll
    pub transition: Option<TransitionEvent>,
    /// Why the measurement is a sentinel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the poll finished
    pub checked_at: DateTime<Utc>,
}

impl HealthVerdictEvent {
    /// True if the target is offline after this poll
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        self.state.is_offline()
    }

    /// True if the probe yielded no percentage
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.measured.is_sentinel()
    }
}

/// Polls targets: probe, evaluate, update health state
pub struct InodeMonitor {
    targets: Vec<TargetConfig>,
    spec: ProbeSpec,
    threshold: Threshold,
    machine: HealthStateMachine,
    executor: Arc<dyn ProbeExecutor>,
    store: Arc<HealthStore>,
    concurrency: usize,
}

impl InodeMonitor {
    /// Builds a monitor from settings with a process-backed executor and a
    /// fresh store
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let monitor = &settings.monitor;
        let executor = CommandExecutor::new()
            .with_timeout(monitor.effective_timeout())
            .with_max_lines(monitor.max_lines);

        Self {
            targets: settings.effective_targets(),
            spec: monitor.probe_spec(),
            threshold: monitor.threshold,
            machine: HealthStateMachine::new(monitor.trigger_id.clone()),
            executor: Arc::new(executor),
            store: Arc::new(HealthStore::new()),
            concurrency: monitor.effective_concurrency(),
        }
    }

    /// Replaces the executor
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn ProbeExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Shares a store with other monitors
    #[must_use]
    pub fn with_store(mut self, store: Arc<HealthStore>) -> Self {
        self.store = store;
        self
    }

    /// Replaces the probe
    #[must_use]
    pub fn with_probe_spec(mut self, spec: ProbeSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Replaces the threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Acts as a different trigger
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerId) -> Self {
        self.machine = HealthStateMachine::new(trigger);
        self
    }

    /// Threshold in force
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Trigger id recorded on offline causes
    #[must_use]
    pub const fn trigger(&self) -> &TriggerId {
        self.machine.trigger()
    }

    /// Probe in use
    #[must_use]
    pub const fn probe_spec(&self) -> &ProbeSpec {
        &self.spec
    }

    /// Monitored targets
    #[must_use]
    pub fn targets(&self) -> &[TargetConfig] {
        &self.targets
    }

    /// Health store
    #[must_use]
    pub fn store(&self) -> &Arc<HealthStore> {
        &self.store
    }

    /// True if `target_id` names a configured target, by id or display name
    #[must_use]
    pub fn has_target(&self, target_id: &str) -> bool {
        self.find_target(target_id).is_some()
    }

    fn find_target(&self, target_id: &str) -> Option<&TargetConfig> {
        self.targets
            .iter()
            .find(|t| t.id == target_id || display_name(&t.id) == target_id)
    }

    /// Polls one target.
    ///
    /// Polls of the same target are serialized; the later one waits. An
    /// unknown id yields an `Unavailable` event without touching the store.
    pub async fn poll(&self, target_id: &str) -> HealthVerdictEvent {
        let Some(target) = self.find_target(target_id) else {
            tracing::warn!(target_id, "Poll requested for unknown target");
            return HealthVerdictEvent {
                target_id: target_id.to_string(),
                measured: MeasuredValue::Unavailable,
                threshold: self.threshold,
                verdict: None,
                state: HealthState::Online,
                transition: None,
                error: Some(format!("Unknown target '{target_id}'")),
                checked_at: Utc::now(),
            };
        };

        let span = crate::trace_operation!(
            span_names::MONITOR_POLL,
            target_id = %display_name(&target.id),
            trigger = %self.machine.trigger()
        );
        self.poll_target(target, target.resolved_path())
            .instrument(span)
            .await
    }

    async fn poll_target(&self, target: &TargetConfig, dir: PathBuf) -> HealthVerdictEvent {
        let slot = self.store.slot(&target.id);
        let mut state = slot.lock().await;

        let outcome = probe::measure(self.executor.as_ref(), &self.spec, &dir).await;
        let transition = self.machine.apply(&mut state, outcome.value, self.threshold);

        HealthVerdictEvent {
            target_id: target.id.clone(),
            measured: outcome.value,
            threshold: self.threshold,
            verdict: evaluate(outcome.value, self.threshold),
            state: state.state.clone(),
            transition,
            error: outcome.error.map(|e| e.to_string()),
            checked_at: state.last_checked.unwrap_or_else(Utc::now),
        }
    }

    /// Polls every target, at most `concurrency` at a time. Results are
    /// sorted by target id.
    pub async fn poll_all(&self) -> Vec<HealthVerdictEvent> {
        let ids: Vec<String> = self.targets.iter().map(|t| t.id.clone()).collect();
        let mut events: Vec<HealthVerdictEvent> = stream::iter(ids)
            .map(|id| async move { self.poll(&id).await })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        events.sort_by(|a, b| a.target_id.cmp(&b.target_id));
        events
    }
}
