//! Property tests for threshold parsing and evaluation

use inodewatch_core::{MeasuredValue, Threshold, Verdict, evaluate, parse_measured, parse_threshold};
use proptest::prelude::*;

proptest! {
    /// Property: Every value 0-99 with a percent sign is a valid threshold
    #[test]
    fn valid_thresholds_parse(p in 0u8..100) {
        let threshold = parse_threshold(&format!("{p}%")).unwrap();
        prop_assert_eq!(threshold.percentage(), p);
    }

    /// Property: A single leading zero is accepted and ignored
    #[test]
    fn leading_zero_accepted(p in 0u8..10) {
        let threshold = parse_threshold(&format!("0{p}%")).unwrap();
        prop_assert_eq!(threshold.percentage(), p);
    }

    /// Property: Three-digit thresholds are rejected
    #[test]
    fn three_digit_thresholds_rejected(p in 100u16..1000) {
        let text = format!("{p}%");
        prop_assert!(parse_threshold(&text).is_err());
    }

    /// Property: Thresholds without a percent sign are rejected
    #[test]
    fn missing_percent_rejected(p in 0u8..100) {
        let text = p.to_string();
        prop_assert!(parse_threshold(&text).is_err());
    }

    /// Property: Surrounding text is rejected
    #[test]
    fn surrounding_text_rejected(p in 0u8..100, junk in "[a-z ]{1,4}") {
        let prefixed = format!("{junk}{p}%");
        let suffixed = format!("{p}%{junk}");
        prop_assert!(parse_threshold(&prefixed).is_err());
        prop_assert!(parse_threshold(&suffixed).is_err());
    }

    /// Property: Display output parses back to the same threshold
    #[test]
    fn display_is_parseable(p in 0u8..100) {
        let threshold = parse_threshold(&format!("{p}%")).unwrap();
        let again: Threshold = threshold.to_string().parse().unwrap();
        prop_assert_eq!(threshold, again);
    }

    /// Property: Measurements 0-100 parse, with surrounding whitespace
    #[test]
    fn measurements_parse(p in 0u8..=100, pad in " {0,3}") {
        let value = parse_measured(&format!("{pad}{p}%{pad}")).unwrap();
        prop_assert_eq!(value, MeasuredValue::Percentage(p));
    }

    /// Property: Measurements above 100 are rejected
    #[test]
    fn measurements_above_100_rejected(p in 101u16..1000) {
        let text = format!("{p}%");
        prop_assert!(parse_measured(&text).is_err());
    }

    /// Property: Exceeded exactly when usage is at or above the threshold
    #[test]
    fn evaluate_is_greater_or_equal(usage in 0u8..=100, limit in 0u8..100) {
        let threshold = parse_threshold(&format!("{limit}%")).unwrap();
        let verdict = evaluate(MeasuredValue::Percentage(usage), threshold);
        let expected = if usage >= limit { Verdict::Exceeded } else { Verdict::WithinLimit };
        prop_assert_eq!(verdict, Some(expected));
    }

    /// Property: Sentinels never produce a verdict
    #[test]
    fn sentinels_have_no_verdict(limit in 0u8..100) {
        let threshold = parse_threshold(&format!("{limit}%")).unwrap();
        prop_assert_eq!(evaluate(MeasuredValue::NotApplicable, threshold), None);
        prop_assert_eq!(evaluate(MeasuredValue::Unavailable, threshold), None);
    }
}
