//! Parser for `df`-style tabular output
//!
//! Extracts one column from the first data row after a fixed number of
//! header lines. Long device names can make `df` wrap a row onto two lines,
//! which silently shifts columns; a row that is too short is reported as
//! [`ProbeError::TruncatedOutput`] instead of being guessed at.

use crate::error::{ProbeError, ProbeResult};
use crate::platform::ProbeSpec;

/// Stateless parser for tabular probe output
pub struct TabularParser;

impl TabularParser {
    /// Returns the raw token at `value_column` (1-indexed) of the first row
    /// after `header_lines_to_skip` lines.
    ///
    /// Columns are separated by runs of one or more spaces.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::TruncatedOutput`] if there are fewer header
    /// lines than expected, no data row, or too few columns.
    pub fn extract(
        output: &str,
        header_lines_to_skip: usize,
        value_column: usize,
    ) -> ProbeResult<String> {
        if value_column == 0 {
            return Err(ProbeError::TruncatedOutput(
                "Column index is 1-based, got 0".into(),
            ));
        }

        let mut lines = output.lines();

        for skipped in 0..header_lines_to_skip {
            if lines.next().is_none() {
                return Err(ProbeError::TruncatedOutput(format!(
                    "Expected {header_lines_to_skip} header lines, got {skipped}"
                )));
            }
        }

        let row = lines
            .next()
            .ok_or_else(|| ProbeError::TruncatedOutput("Missing data row".into()))?;

        let columns = Self::split_columns(row);
        columns
            .get(value_column - 1)
            .map(|token| (*token).to_string())
            .ok_or_else(|| {
                ProbeError::TruncatedOutput(format!(
                    "Data row has {} columns, need column {value_column}: '{}'",
                    columns.len(),
                    row.trim_end()
                ))
            })
    }

    /// Same as [`Self::extract`] with the layout taken from a [`ProbeSpec`]
    ///
    /// # Errors
    ///
    /// See [`Self::extract`].
    pub fn extract_for(output: &str, spec: &ProbeSpec) -> ProbeResult<String> {
        Self::extract(output, spec.header_lines_to_skip, spec.value_column)
    }

    /// Splits a row on runs of spaces. Tabs and other whitespace stay inside
    /// tokens; `df` pads with spaces only.
    fn split_columns(row: &str) -> Vec<&str> {
        row.trim_end_matches(['\r', '\n'])
            .split(' ')
            .filter(|token| !token.is_empty())
            .collect()
    }
}
