//! Local command execution for probes
//!
//! Runs the probe command in the target directory and captures only as much
//! of stdout as the probe needs. Output is decoded one byte per character
//! (ISO-8859-1) so column splitting never depends on the host locale.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::Instrument;

use crate::platform::ProbeSpec;
use crate::tracing::span_names;

/// Default timeout for a probe command (seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Default cap on stdout lines consumed from a probe
pub const DEFAULT_MAX_LINES: usize = 64;

/// Upper bound on bytes read per line
const MAX_LINE_BYTES: u64 = 4096;

/// Captured output of one probe run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawProbeResult {
    /// Decoded stdout, at most the requested number of lines
    pub stdout_text: String,
    /// Whether the command produced usable output
    pub succeeded: bool,
    /// Why the run failed
    pub error_detail: Option<String>,
}

impl RawProbeResult {
    /// Creates a successful result
    #[must_use]
    pub fn success(stdout_text: impl Into<String>) -> Self {
        Self {
            stdout_text: stdout_text.into(),
            succeeded: true,
            error_detail: None,
        }
    }

    /// Creates a failed result
    #[must_use]
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            stdout_text: String::new(),
            succeeded: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Runs a probe and returns its raw output.
///
/// Implementations never fail: every problem is reported through
/// [`RawProbeResult::succeeded`].
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    /// Executes `spec` with `working_dir` as the current directory
    async fn execute(&self, spec: &ProbeSpec, working_dir: &Path) -> RawProbeResult;
}

/// Process-backed [`ProbeExecutor`]
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    timeout: Duration,
    max_lines: usize,
}

impl CommandExecutor {
    /// Creates an executor with default limits
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Sets the wall-clock limit for spawn plus read
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of stdout lines consumed
    #[must_use]
    pub const fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Gets the timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Gets the line cap
    #[must_use]
    pub const fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Spawns the command and reads up to `line_limit` lines
    async fn read_output(
        mut cmd: Command,
        program: &str,
        line_limit: usize,
        header_lines: usize,
    ) -> Result<String, String> {
        let mut child = cmd
            .spawn()
            .map_err(|e| format!("Failed to launch '{program}': {e}"))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| format!("stdout of '{program}' was not captured"))?;

        let byte_cap = MAX_LINE_BYTES * line_limit as u64;
        let mut reader = BufReader::new(stdout.take(byte_cap));
        let mut text = String::new();
        let mut buf = Vec::with_capacity(256);
        let mut lines_read = 0;

        while lines_read < line_limit {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| format!("Failed to read output of '{program}': {e}"))?;
            if n == 0 {
                break;
            }
            text.extend(buf.iter().copied().map(char::from));
            lines_read += 1;
        }

        // Everything needed has been read; the rest of the output is ignored
        let _ = child.start_kill();
        match child.wait().await {
            Ok(status) => tracing::trace!(program, %status, "Probe process finished"),
            Err(e) => tracing::debug!(program, error = %e, "Failed to reap probe process"),
        }

        if lines_read < header_lines {
            return Err(format!(
                "Output of '{program}' ended after {lines_read} lines, \
                 expected {header_lines} header lines"
            ));
        }

        Ok(text)
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbeExecutor for CommandExecutor {
    async fn execute(&self, spec: &ProbeSpec, working_dir: &Path) -> RawProbeResult {
        let Some((program, args)) = spec.command_line.split_first() else {
            return RawProbeResult::failure(format!("No probe command for {}", spec.family));
        };

        let line_limit = spec.lines_needed();
        if line_limit > self.max_lines {
            return RawProbeResult::failure(format!(
                "Probe needs {line_limit} lines but at most {} may be read",
                self.max_lines
            ));
        }

        tracing::debug!(
            command = %spec.command_display(),
            dir = %working_dir.display(),
            "Running probe command"
        );

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let span = crate::trace_operation_debug!(span_names::PROBE_EXECUTE, program = %program);
        let read = Self::read_output(cmd, program, line_limit, spec.header_lines_to_skip);
        match tokio::time::timeout(self.timeout, read).instrument(span).await {
            Ok(Ok(text)) => RawProbeResult::success(text),
            Ok(Err(detail)) => RawProbeResult::failure(detail),
            Err(_) => RawProbeResult::failure(format!(
                "'{}' timed out after {}ms",
                spec.command_display(),
                self.timeout.as_millis()
            )),
        }
    }
}
