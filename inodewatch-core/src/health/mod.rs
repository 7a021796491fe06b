//! Target health tracking with hysteresis
//!
//! A target goes offline when usage reaches the threshold and only comes
//! back after an explicit below-threshold reading from the same monitor.
//! Missing data never moves a target either way.

mod state;
mod store;

pub use state::{
    BUILT_IN_TARGET_NAME, DEFAULT_TRIGGER_ID, HealthState, HealthStateMachine, OfflineCause,
    TargetHealthState, TransitionEvent, TriggerId, display_name,
};
pub use store::{HealthStore, TargetSlot};
