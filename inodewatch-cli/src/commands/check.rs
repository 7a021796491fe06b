//! One-shot poll command.

use std::path::Path;

use inodewatch_core::health::display_name;
use inodewatch_core::{HealthVerdictEvent, InodeMonitor, MeasuredValue};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{BOLD, CYAN, GREEN, RED, RESET, YELLOW, color, load_settings, runtime};

/// Parameters for the `check` command
pub struct CheckParams<'a> {
    pub target: Option<&'a str>,
    pub threshold: Option<&'a str>,
    pub format: OutputFormat,
    pub strict: bool,
    pub color: bool,
}

/// Counts of poll outcomes
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub unmeasured: usize,
}

impl CheckSummary {
    fn from_events(events: &[HealthVerdictEvent]) -> Self {
        let mut summary = Self {
            total: events.len(),
            ..Self::default()
        };
        for event in events {
            if event.is_offline() {
                summary.offline += 1;
            } else {
                summary.online += 1;
            }
            if event.measured == MeasuredValue::Unavailable {
                summary.unmeasured += 1;
            }
        }
        summary
    }

    /// True if any target is offline or failed to probe
    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        self.offline > 0 || self.unmeasured > 0
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a CheckSummary,
    targets: &'a [HealthVerdictEvent],
}

/// Check command handler
pub fn cmd_check(config_path: Option<&Path>, params: CheckParams<'_>) -> Result<(), CliError> {
    let settings = load_settings(config_path, params.threshold)?;
    let monitor = InodeMonitor::new(&settings);

    if let Some(target) = params.target
        && !monitor.has_target(target)
    {
        return Err(CliError::TargetNotFound(target.to_string()));
    }

    let runtime = runtime()?;
    let events = match params.target {
        Some(target) => vec![runtime.block_on(monitor.poll(target))],
        None => runtime.block_on(monitor.poll_all()),
    };
    let summary = CheckSummary::from_events(&events);

    match params.format {
        OutputFormat::Table => {
            for event in &events {
                print_event(event, params.color);
            }
            println!();
            print_summary(&summary, params.color);
        }
        OutputFormat::Json => {
            let report = JsonReport {
                summary: &summary,
                targets: &events,
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::Runtime(format!("Failed to serialize report: {e}")))?;
            println!("{json}");
        }
    }

    if params.strict && summary.is_unhealthy() {
        return Err(CliError::Unhealthy(format!(
            "{} offline, {} unmeasured of {}",
            summary.offline, summary.unmeasured, summary.total
        )));
    }
    Ok(())
}

/// Print a single verdict with colors
fn print_event(event: &HealthVerdictEvent, enabled: bool) {
    let (green, red, yellow, cyan, bold, reset) = (
        color(GREEN, enabled),
        color(RED, enabled),
        color(YELLOW, enabled),
        color(CYAN, enabled),
        color(BOLD, enabled),
        color(RESET, enabled),
    );

    if event.is_offline() {
        print!("{red}{bold}✗{reset} ");
    } else {
        print!("{green}{bold}✓{reset} ");
    }
    print!(
        "{:<16} {cyan}{:>18}{reset}  threshold {}",
        display_name(&event.target_id),
        event.measured.to_string(),
        event.threshold
    );
    if let Some(ref transition) = event.transition {
        print!(
            "  {bold}[{} -> {}]{reset}",
            transition.old_state.label(),
            transition.new_state.label()
        );
    }
    println!();

    if let Some(cause) = event.state.offline_cause() {
        println!("    {red}{cause}{reset}");
    }
    if let Some(ref error) = event.error {
        println!("    {yellow}{error}{reset}");
    }
}

/// Print the summary with colors
fn print_summary(summary: &CheckSummary, enabled: bool) {
    let (green, red, yellow, bold, reset) = (
        color(GREEN, enabled),
        color(RED, enabled),
        color(YELLOW, enabled),
        color(BOLD, enabled),
        color(RESET, enabled),
    );

    println!("{bold}Summary:{reset}");
    println!("  Total:      {}", summary.total);
    println!("  {green}Online:     {}{reset}", summary.online);
    if summary.offline > 0 {
        println!("  {red}Offline:    {}{reset}", summary.offline);
    } else {
        println!("  Offline:    {}", summary.offline);
    }
    if summary.unmeasured > 0 {
        println!("  {yellow}Unmeasured: {}{reset}", summary.unmeasured);
    }
}
