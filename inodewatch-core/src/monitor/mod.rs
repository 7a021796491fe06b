//! Inode usage monitoring
//!
//! [`InodeMonitor`] runs one probe-evaluate-update cycle per target on
//! request; [`start_monitor`] repeats it on an interval in the background.

mod collector;
mod poller;

pub use collector::{MonitorEvent, MonitorHandle, start_monitor};
pub use poller::{HealthVerdictEvent, InodeMonitor};
