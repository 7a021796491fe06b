//! Integration tests for polling and state transitions

use async_trait::async_trait;
use inodewatch_core::{
    HealthState, HealthStore, InodeMonitor, MeasuredValue, MonitorEvent, ProbeExecutor, ProbeSpec,
    RawProbeResult, Settings, TargetConfig, TriggerId, Verdict, parse_threshold, select_probe,
    start_monitor,
};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Linux `df -P -i .` output with the given usage
fn df_linux(usage: &str) -> String {
    format!(
        "Filesystem     Inodes  IUsed   IFree IUse% Mounted on\n\
         /dev/sda1     6553600 123456 6430144 {usage} /\n"
    )
}

/// Replays queued outputs in order, then repeats the last one
struct Script {
    outputs: Mutex<VecDeque<RawProbeResult>>,
    last: Mutex<RawProbeResult>,
}

impl Script {
    fn new(outputs: impl IntoIterator<Item = RawProbeResult>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().collect()),
            last: Mutex::new(RawProbeResult::failure("script exhausted")),
        }
    }
}

#[async_trait]
impl ProbeExecutor for Script {
    async fn execute(&self, _spec: &ProbeSpec, _dir: &Path) -> RawProbeResult {
        let next = self.outputs.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = next {
            *last = next;
        }
        last.clone()
    }
}

/// Sleeps inside the probe and records the peak number of concurrent runs
struct Slow {
    running: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl ProbeExecutor for Slow {
    async fn execute(&self, _spec: &ProbeSpec, _dir: &Path) -> RawProbeResult {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
        RawProbeResult::success(df_linux("50%"))
    }
}

fn settings(targets: &[&str]) -> Settings {
    Settings {
        targets: targets.iter().map(|id| TargetConfig::new(*id, "/")).collect(),
        ..Default::default()
    }
}

fn monitor(targets: &[&str], threshold: &str, executor: Arc<dyn ProbeExecutor>) -> InodeMonitor {
    InodeMonitor::new(&settings(targets))
        .with_probe_spec(select_probe("Linux"))
        .with_threshold(parse_threshold(threshold).unwrap())
        .with_executor(executor)
}

#[tokio::test]
async fn exceeded_exceeded_within_emits_two_transitions() {
    let script = Script::new([
        RawProbeResult::success(df_linux("96%")),
        RawProbeResult::success(df_linux("97%")),
        RawProbeResult::success(df_linux("40%")),
    ]);
    let m = monitor(&["agent"], "95%", Arc::new(script));

    let first = m.poll("agent").await;
    let second = m.poll("agent").await;
    let third = m.poll("agent").await;

    assert_eq!(first.verdict, Some(Verdict::Exceeded));
    assert!(first.transition.as_ref().is_some_and(|t| t.went_offline()));
    assert_eq!(second.verdict, Some(Verdict::Exceeded));
    assert!(second.transition.is_none());
    assert!(second.is_offline());
    assert_eq!(third.verdict, Some(Verdict::WithinLimit));
    assert!(third.transition.as_ref().is_some_and(|t| !t.went_offline()));
    assert_eq!(third.state, HealthState::Online);
}

#[tokio::test]
async fn offline_cause_tracks_latest_usage() {
    let script = Script::new([
        RawProbeResult::success(df_linux("96%")),
        RawProbeResult::success(df_linux("99%")),
    ]);
    let m = monitor(&["agent"], "95%", Arc::new(script));
    m.poll("agent").await;
    let event = m.poll("agent").await;

    let cause = event.state.offline_cause().unwrap();
    assert_eq!(cause.usage, MeasuredValue::Percentage(99));
    assert_eq!(cause.triggered_by, TriggerId::default());
}

#[tokio::test]
async fn threshold_boundary_is_exceeded() {
    let m = monitor(
        &["agent"],
        "95%",
        Arc::new(Script::new([RawProbeResult::success(df_linux("95%"))])),
    );
    let event = m.poll("agent").await;
    assert_eq!(event.verdict, Some(Verdict::Exceeded));
    assert!(event.is_offline());
}

#[tokio::test]
async fn probe_failure_holds_offline_state() {
    let script = Script::new([
        RawProbeResult::success(df_linux("99%")),
        RawProbeResult::failure("df: not found"),
        RawProbeResult::success("Filesystem Inodes\n"),
    ]);
    let m = monitor(&["agent"], "90%", Arc::new(script));

    assert!(m.poll("agent").await.is_offline());

    let failed = m.poll("agent").await;
    assert_eq!(failed.measured, MeasuredValue::Unavailable);
    assert!(failed.error.is_some());
    assert!(failed.is_offline());
    assert!(failed.transition.is_none());

    let truncated = m.poll("agent").await;
    assert_eq!(truncated.measured, MeasuredValue::Unavailable);
    assert!(truncated.is_offline());
}

#[tokio::test]
async fn other_trigger_cannot_clear_offline() {
    let store = Arc::new(HealthStore::new());
    let a = monitor(
        &["agent"],
        "80%",
        Arc::new(Script::new([RawProbeResult::success(df_linux("90%"))])),
    )
    .with_store(Arc::clone(&store))
    .with_trigger(TriggerId::new("a"));
    let b = monitor(
        &["agent"],
        "80%",
        Arc::new(Script::new([RawProbeResult::success(df_linux("10%"))])),
    )
    .with_store(Arc::clone(&store))
    .with_trigger(TriggerId::new("b"));

    assert!(a.poll("agent").await.is_offline());

    let event = b.poll("agent").await;
    assert_eq!(event.verdict, Some(Verdict::WithinLimit));
    assert!(event.transition.is_none());
    let cause = event.state.offline_cause().unwrap();
    assert_eq!(cause.triggered_by.as_str(), "a");

    let snapshot = store.snapshot("agent").await.unwrap();
    assert!(snapshot.state.is_offline());
    assert_eq!(snapshot.last_known_value, MeasuredValue::Percentage(10));
}

#[tokio::test]
async fn windows_is_not_applicable() {
    let executor = Arc::new(Slow {
        running: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let m = InodeMonitor::new(&settings(&["win"]))
        .with_probe_spec(select_probe("Windows 11"))
        .with_executor(executor.clone());

    let event = m.poll("win").await;
    assert_eq!(event.measured, MeasuredValue::NotApplicable);
    assert!(event.verdict.is_none());
    assert!(!event.is_offline());
    assert_eq!(executor.peak.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn same_target_polls_are_serialized() {
    let executor = Arc::new(Slow {
        running: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let m = Arc::new(monitor(&["agent"], "95%", executor.clone()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = Arc::clone(&m);
            tokio::spawn(async move { m.poll("agent").await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().measured, MeasuredValue::Percentage(50));
    }

    assert_eq!(executor.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn different_targets_poll_concurrently() {
    let executor = Arc::new(Slow {
        running: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let m = monitor(&["a", "b", "c"], "95%", executor.clone());

    let events = m.poll_all().await;
    assert_eq!(events.len(), 3);
    assert!(executor.peak.load(Ordering::SeqCst) > 1);
    assert_eq!(m.store().len(), 3);
}

#[tokio::test]
async fn background_loop_reports_transitions() {
    let script = Script::new([
        RawProbeResult::success(df_linux("99%")),
        RawProbeResult::success(df_linux("99%")),
        RawProbeResult::success(df_linux("10%")),
    ]);
    let m = Arc::new(monitor(&["agent"], "95%", Arc::new(script)));
    let (handle, mut rx) = start_monitor(m, Duration::from_millis(5));

    let mut polled = 0;
    let mut transitions = Vec::new();
    while transitions.len() < 2 {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Some(MonitorEvent::Polled(_))) => polled += 1,
            Ok(Some(MonitorEvent::Transition(t))) => transitions.push(t),
            other => panic!("unexpected: {other:?}"),
        }
    }
    handle.stop().await;

    assert!(polled >= 3);
    assert!(transitions[0].went_offline());
    assert!(!transitions[1].went_offline());
}

#[cfg(unix)]
#[tokio::test]
async fn host_df_reports_percentage() {
    use inodewatch_core::probe::interpret;
    use inodewatch_core::{CommandExecutor, TabularParser, host_probe_spec};

    let spec = host_probe_spec();
    assert!(spec.is_applicable());

    let raw = CommandExecutor::new().execute(spec, Path::new("/")).await;
    assert!(raw.succeeded, "{:?}", raw.error_detail);

    // Filesystems without inode accounting print "-" in the usage column
    let token = TabularParser::extract_for(&raw.stdout_text, spec).unwrap();
    if token.trim() == "-" {
        return;
    }

    let outcome = interpret(&raw, spec);
    assert!(
        matches!(outcome.value, MeasuredValue::Percentage(p) if p <= 100),
        "{token:?} gave {:?}",
        outcome.value
    );

    let settings = Settings {
        targets: vec![TargetConfig::new("root", "/")],
        ..Default::default()
    };
    let event = InodeMonitor::new(&settings).poll("root").await;
    assert!(matches!(event.measured, MeasuredValue::Percentage(_)));
    assert!(event.verdict.is_some());
}
