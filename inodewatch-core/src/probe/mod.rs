//! Inode usage probing
//!
//! Combines command execution and output parsing into a single measurement.
//! Probe failures never escape this module as errors: they become a
//! [`MeasuredValue`] sentinel plus the [`ProbeError`] that explains it.

pub mod exec;
mod parser;

use std::path::Path;

use serde::Serialize;

pub use exec::{
    CommandExecutor, DEFAULT_MAX_LINES, DEFAULT_PROBE_TIMEOUT_SECS, ProbeExecutor, RawProbeResult,
};
pub use parser::TabularParser;

use crate::error::ProbeError;
use crate::platform::ProbeSpec;
use crate::threshold::{MeasuredValue, parse_measured};

/// A measurement together with the reason it is a sentinel, if it is one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    /// Measured usage or sentinel
    pub value: MeasuredValue,
    /// Why no percentage was obtained
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_error")]
    pub error: Option<ProbeError>,
}

#[allow(clippy::ref_option)]
fn serialize_error<S>(error: &Option<ProbeError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(e) => serializer.serialize_str(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl ProbeOutcome {
    /// A successful measurement
    #[must_use]
    pub const fn measured(value: MeasuredValue) -> Self {
        Self { value, error: None }
    }

    /// A transient failure
    #[must_use]
    pub const fn unavailable(error: ProbeError) -> Self {
        Self {
            value: MeasuredValue::Unavailable,
            error: Some(error),
        }
    }

    /// A platform that cannot be probed
    #[must_use]
    pub const fn not_applicable(error: ProbeError) -> Self {
        Self {
            value: MeasuredValue::NotApplicable,
            error: Some(error),
        }
    }
}

/// Turns raw probe output into a measurement
#[must_use]
pub fn interpret(raw: &RawProbeResult, spec: &ProbeSpec) -> ProbeOutcome {
    if !raw.succeeded {
        let detail = raw
            .error_detail
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        return ProbeOutcome::unavailable(ProbeError::ProbeExecutionFailed(detail));
    }

    match TabularParser::extract_for(&raw.stdout_text, spec).and_then(|token| parse_measured(&token))
    {
        Ok(value) => ProbeOutcome::measured(value),
        Err(e) => ProbeOutcome::unavailable(e),
    }
}

/// Runs `spec` in `working_dir` and measures inode usage
pub async fn measure(
    executor: &dyn ProbeExecutor,
    spec: &ProbeSpec,
    working_dir: &Path,
) -> ProbeOutcome {
    if !spec.is_applicable() {
        return ProbeOutcome::not_applicable(ProbeError::UnsupportedPlatform(
            spec.family.to_string(),
        ));
    }

    let raw = executor.execute(spec, working_dir).await;
    let outcome = interpret(&raw, spec);

    if let Some(ref error) = outcome.error {
        tracing::warn!(
            dir = %working_dir.display(),
            error = %error,
            "Inode probe failed"
        );
    } else {
        tracing::debug!(
            dir = %working_dir.display(),
            usage = %outcome.value,
            "Inode probe succeeded"
        );
    }

    outcome
}
