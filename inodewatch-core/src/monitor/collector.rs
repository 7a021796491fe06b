//! Background polling loop
//!
//! [`start_monitor`] polls every target on a fixed interval and streams
//! the results. Runtime failures never stop the loop; they surface as
//! sentinel measurements and warnings in the log.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::health::TransitionEvent;

use super::poller::{HealthVerdictEvent, InodeMonitor};

/// Consecutive sentinel readings after which a target is reported in the log
const FAILURE_WARN_THRESHOLD: u32 = 3;

/// Events emitted by the monitor loop
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A target was polled
    Polled(HealthVerdictEvent),
    /// A target changed state
    Transition(TransitionEvent),
    /// Loop stopped
    Stopped,
}

/// Handle to control a running monitor loop
#[derive(Debug)]
pub struct MonitorHandle {
    stop_tx: mpsc::Sender<()>,
}

impl MonitorHandle {
    /// Signals the loop to stop. It finishes the poll in progress first.
    pub async fn stop(&self) {
        let _ = self.stop_tx.send(()).await;
    }
}

/// Tracks consecutive sentinel readings per target
#[derive(Debug, Default)]
struct FailureTracker {
    counts: HashMap<String, u32>,
}

impl FailureTracker {
    /// Records a poll; returns the streak if it just reached the warn level
    fn record(&mut self, event: &HealthVerdictEvent) -> Option<u32> {
        if !event.is_sentinel() {
            self.counts.remove(&event.target_id);
            return None;
        }
        let count = self.counts.entry(event.target_id.clone()).or_insert(0);
        *count += 1;
        (*count == FAILURE_WARN_THRESHOLD).then_some(*count)
    }
}

/// Starts polling all targets of `monitor` every `interval`.
///
/// The first poll happens immediately. Returns a handle to stop the loop
/// and a receiver for events. The loop also ends when the receiver is
/// dropped.
pub fn start_monitor(
    monitor: Arc<InodeMonitor>,
    interval: Duration,
) -> (MonitorHandle, mpsc::Receiver<MonitorEvent>) {
    let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
    let (event_tx, event_rx) = mpsc::channel::<MonitorEvent>(32);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut failures = FailureTracker::default();

        tracing::info!(
            targets = monitor.targets().len(),
            interval_secs = interval.as_secs(),
            threshold = %monitor.threshold(),
            "Monitor started"
        );

        'outer: loop {
            tokio::select! {
                _ = stop_rx.recv() => break,
                _ = ticker.tick() => {
                    for event in monitor.poll_all().await {
                        if let Some(streak) = failures.record(&event) {
                            tracing::warn!(
                                target_id = %event.target_id,
                                streak,
                                error = event.error.as_deref().unwrap_or("unknown"),
                                "Target repeatedly unmeasurable"
                            );
                        }

                        let transition = event.transition.clone();
                        if event_tx.send(MonitorEvent::Polled(event)).await.is_err() {
                            break 'outer;
                        }
                        if let Some(transition) = transition
                            && event_tx.send(MonitorEvent::Transition(transition)).await.is_err()
                        {
                            break 'outer;
                        }
                    }
                }
            }
        }

        tracing::info!("Monitor stopped");
        let _ = event_tx.send(MonitorEvent::Stopped).await;
    });

    (MonitorHandle { stop_tx }, event_rx)
}
