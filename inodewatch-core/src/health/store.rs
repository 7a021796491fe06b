//! In-memory store of per-target health state
//!
//! Each target gets its own async lock. A poll holds that lock from probe to
//! state update, so polls of one target run one at a time and in order,
//! while different targets never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;

use super::state::{HealthState, OfflineCause, TargetHealthState};

/// Shared handle to one target's state
pub type TargetSlot = Arc<AsyncMutex<TargetHealthState>>;

/// Health state of every known target. Not persisted.
#[derive(Debug, Default)]
pub struct HealthStore {
    slots: Mutex<HashMap<String, TargetSlot>>,
}

impl HealthStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `target_id`, creating an online one if needed
    pub fn slot(&self, target_id: &str) -> TargetSlot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            slots
                .entry(target_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(TargetHealthState::new(target_id)))),
        )
    }

    /// Returns the slot for `target_id` if the target is known
    pub fn get(&self, target_id: &str) -> Option<TargetSlot> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target_id)
            .cloned()
    }

    /// Copy of one target's state. Waits for an in-flight poll to finish.
    pub async fn snapshot(&self, target_id: &str) -> Option<TargetHealthState> {
        let slot = self.get(target_id)?;
        let state = slot.lock().await;
        Some(state.clone())
    }

    /// Copies of every target's state, sorted by id
    pub async fn snapshots(&self) -> Vec<TargetHealthState> {
        let slots: Vec<TargetSlot> = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut states = Vec::with_capacity(slots.len());
        for slot in slots {
            states.push(slot.lock().await.clone());
        }
        states.sort_by(|a, b| a.target_id.cmp(&b.target_id));
        states
    }

    /// Marks a target offline on behalf of `cause.triggered_by`.
    ///
    /// An existing offline cause is kept. Returns true if the target was
    /// online and is now offline.
    pub async fn mark_offline(&self, target_id: &str, cause: OfflineCause) -> bool {
        let slot = self.slot(target_id);
        let mut target = slot.lock().await;
        if target.state.is_offline() {
            return false;
        }
        tracing::info!(
            target_id = %target.display_name(),
            trigger = %cause.triggered_by,
            "Target marked offline externally"
        );
        target.state = HealthState::Offline(cause);
        true
    }

    /// Forgets a target; its next poll starts online again
    pub fn remove(&self, target_id: &str) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(target_id)
            .is_some()
    }

    /// Number of known targets
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when no target has been seen
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
