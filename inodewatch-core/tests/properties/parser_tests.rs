//! Property tests for tabular probe output parsing

use inodewatch_core::{ProbeError, TabularParser};
use proptest::prelude::*;

/// Builds `headers` header lines followed by a row with `value` at `column`
fn table(headers: usize, column: usize, width: usize, value: &str) -> String {
    let mut out = String::new();
    for i in 0..headers {
        out.push_str(&format!("Header{i} Col  Other\n"));
    }
    let row: Vec<String> = (1..=width)
        .map(|c| if c == column { value.to_string() } else { format!("f{c}") })
        .collect();
    out.push_str(&row.join("   "));
    out.push('\n');
    out
}

proptest! {
    /// Property: The token at the configured column is returned
    #[test]
    fn extracts_configured_column(
        headers in 0usize..4,
        column in 1usize..10,
        extra in 0usize..4,
        p in 0u8..=100,
    ) {
        let value = format!("{p}%");
        let output = table(headers, column, column + extra, &value);
        let token = TabularParser::extract(&output, headers, column).unwrap();
        prop_assert_eq!(token, value);
    }

    /// Property: Runs of spaces never create empty columns
    #[test]
    fn space_runs_collapse(spaces in 1usize..8, p in 0u8..=100) {
        let gap = " ".repeat(spaces);
        let output = format!("h\n{gap}a{gap}b{gap}{p}%{gap}\n");
        let token = TabularParser::extract(&output, 1, 3).unwrap();
        prop_assert_eq!(token, format!("{p}%"));
    }

    /// Property: Asking for a column past the row end is a truncation error
    #[test]
    fn short_row_is_truncated(width in 1usize..6, beyond in 1usize..4) {
        let output = table(1, 1, width, "x");
        let result = TabularParser::extract(&output, 1, width + beyond);
        prop_assert!(matches!(result, Err(ProbeError::TruncatedOutput(_))));
    }

    /// Property: Output with only header lines is a truncation error
    #[test]
    fn headers_only_is_truncated(headers in 1usize..5) {
        let output = "Filesystem Inodes IUsed\n".repeat(headers);
        let result = TabularParser::extract(&output, headers, 1);
        prop_assert!(matches!(result, Err(ProbeError::TruncatedOutput(_))));
    }

    /// Property: CRLF line endings parse like LF
    #[test]
    fn crlf_matches_lf(column in 1usize..6, p in 0u8..=100) {
        let value = format!("{p}%");
        let lf = table(1, column, column + 1, &value);
        let crlf = lf.replace('\n', "\r\n");
        prop_assert_eq!(
            TabularParser::extract(&lf, 1, column).unwrap(),
            TabularParser::extract(&crlf, 1, column).unwrap()
        );
    }
}
