//! Threshold parsing and evaluation
//!
//! A threshold is configured as text like `"95%"`: one or two digits and a
//! mandatory percent sign, so the largest accepted value is 99%. Measured
//! values use the same notation but may read `100%`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, ThresholdError};

/// Offline threshold used when none is configured
pub const DEFAULT_THRESHOLD: &str = "95%";

/// `[0-9]` rather than `\d`, which would admit non-ASCII digits
static THRESHOLD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]?[0-9]%$").expect("THRESHOLD_REGEX is a valid regex pattern")
});

static MEASURED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}%$").expect("MEASURED_REGEX is a valid regex pattern")
});

/// Configured offline threshold (0-99%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Threshold {
    percentage: u8,
}

impl Threshold {
    /// Returns the threshold as an integer percentage
    #[must_use]
    pub const fn percentage(self) -> u8 {
        self.percentage
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self { percentage: 95 }
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_threshold(s)
    }
}

impl TryFrom<String> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_threshold(&value)
    }
}

impl From<Threshold> for String {
    fn from(value: Threshold) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage)
    }
}

/// Result of one probe, as a percentage or a sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MeasuredValue {
    /// Usage percentage, 0-100
    Percentage(u8),
    /// The platform cannot be probed (permanent)
    NotApplicable,
    /// The probe failed this time (transient)
    Unavailable,
}

impl MeasuredValue {
    /// Returns the percentage if one was measured
    #[must_use]
    pub const fn percentage(self) -> Option<u8> {
        match self {
            Self::Percentage(p) => Some(p),
            Self::NotApplicable | Self::Unavailable => None,
        }
    }

    /// True for either sentinel
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        !matches!(self, Self::Percentage(_))
    }
}

impl fmt::Display for MeasuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(p) => write!(f, "{p}%"),
            Self::NotApplicable => f.write_str("N/A"),
            Self::Unavailable => f.write_str("N/A (probe error)"),
        }
    }
}

/// Outcome of comparing a measurement to a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Usage is at or above the threshold
    Exceeded,
    /// Usage is below the threshold
    WithinLimit,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exceeded => f.write_str("exceeded"),
            Self::WithinLimit => f.write_str("within limit"),
        }
    }
}

/// Parses configuration text like `"95%"`.
///
/// # Errors
///
/// Returns [`ThresholdError::InvalidThreshold`] unless the text is exactly
/// one or two ASCII digits followed by `%`.
pub fn parse_threshold(text: &str) -> Result<Threshold, ThresholdError> {
    if !THRESHOLD_REGEX.is_match(text) {
        return Err(ThresholdError::InvalidThreshold(text.to_string()));
    }
    let percentage = text[..text.len() - 1]
        .parse::<u8>()
        .map_err(|_| ThresholdError::InvalidThreshold(text.to_string()))?;
    Ok(Threshold { percentage })
}

/// Parses a token extracted from probe output, such as `"8%"`.
///
/// # Errors
///
/// Returns [`ProbeError::InvalidMeasurement`] if the token is not a
/// percentage between 0 and 100.
pub fn parse_measured(token: &str) -> Result<MeasuredValue, ProbeError> {
    let token = token.trim();
    if !MEASURED_REGEX.is_match(token) {
        return Err(ProbeError::InvalidMeasurement(token.to_string()));
    }
    match token[..token.len() - 1].parse::<u8>() {
        Ok(p) if p <= 100 => Ok(MeasuredValue::Percentage(p)),
        _ => Err(ProbeError::InvalidMeasurement(token.to_string())),
    }
}

/// Compares a measurement to the threshold. The threshold itself is the
/// first unacceptable value, so equality counts as exceeded.
///
/// Returns `None` for sentinel measurements: no data is no verdict.
#[must_use]
pub const fn evaluate(measured: MeasuredValue, threshold: Threshold) -> Option<Verdict> {
    match measured {
        MeasuredValue::Percentage(p) if p >= threshold.percentage => Some(Verdict::Exceeded),
        MeasuredValue::Percentage(_) => Some(Verdict::WithinLimit),
        MeasuredValue::NotApplicable | MeasuredValue::Unavailable => None,
    }
}
