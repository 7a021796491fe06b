//! Periodic polling command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use inodewatch_core::health::display_name;
use inodewatch_core::{InodeMonitor, MonitorEvent, TransitionEvent, start_monitor};

use crate::error::CliError;
use crate::util::{BOLD, GREEN, RED, RESET, color, load_settings, runtime};

/// Watch command handler. Runs until Ctrl-C.
pub fn cmd_watch(
    config_path: Option<&Path>,
    threshold: Option<&str>,
    interval: Option<u32>,
    enabled: bool,
) -> Result<(), CliError> {
    let mut settings = load_settings(config_path, threshold)?;
    if let Some(secs) = interval {
        settings.monitor.interval_secs = secs;
    }
    let period = settings.monitor.effective_interval();
    let monitor = Arc::new(InodeMonitor::new(&settings));

    println!(
        "Watching {} target(s) every {}s, threshold {} (Ctrl-C to stop)",
        monitor.targets().len(),
        period.as_secs(),
        monitor.threshold()
    );

    runtime()?.block_on(run(monitor, period, enabled))
}

async fn run(monitor: Arc<InodeMonitor>, period: Duration, enabled: bool) -> Result<(), CliError> {
    let (handle, mut events) = start_monitor(monitor, period);
    let mut stopping = false;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c(), if !stopping => {
                signal?;
                stopping = true;
                handle.stop().await;
            }
            event = events.recv() => match event {
                Some(MonitorEvent::Transition(transition)) => print_transition(&transition, enabled),
                Some(MonitorEvent::Polled(event)) => {
                    tracing::debug!(
                        target_id = %display_name(&event.target_id),
                        usage = %event.measured,
                        state = event.state.label(),
                        "Polled"
                    );
                }
                Some(MonitorEvent::Stopped) | None => break,
            },
        }
    }

    println!("Stopped.");
    Ok(())
}

fn print_transition(transition: &TransitionEvent, enabled: bool) {
    let (tint, bold, reset) = if transition.went_offline() {
        (color(RED, enabled), color(BOLD, enabled), color(RESET, enabled))
    } else {
        (color(GREEN, enabled), color(BOLD, enabled), color(RESET, enabled))
    };
    println!(
        "{} {tint}{bold}{:<16}{reset} {} -> {}  current={},threshold={}",
        transition.at.format("%Y-%m-%d %H:%M:%S"),
        display_name(&transition.target_id),
        transition.old_state.label(),
        transition.new_state.label(),
        transition.measured,
        transition.threshold
    );
}
