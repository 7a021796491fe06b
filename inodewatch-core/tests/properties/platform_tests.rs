//! Property tests for platform probe selection

use inodewatch_core::{PlatformFamily, detect_family, select_probe};
use proptest::prelude::*;

fn any_case(s: &str, mask: &[bool]) -> String {
    s.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
        .collect()
}

proptest! {
    /// Property: Family detection ignores case and trailing version text
    #[test]
    fn detection_is_case_insensitive(
        mask in prop::collection::vec(any::<bool>(), 1..12),
        suffix in "[ 0-9.a-zA-Z]{0,12}",
    ) {
        let cases = [
            ("windows", PlatformFamily::Windows),
            ("linux", PlatformFamily::Linux),
            ("mac os", PlatformFamily::MacOs),
            ("freebsd", PlatformFamily::FreeBsd),
            ("aix", PlatformFamily::Aix),
        ];
        for (prefix, family) in cases {
            let name = format!("{}{suffix}", any_case(prefix, &mask));
            prop_assert_eq!(detect_family(&name), family);
        }
    }

    /// Property: Unknown names get the generic probe
    #[test]
    fn unknown_names_get_default(name in "(sunos|hp-ux|qnx|plan9)[ 0-9.]{0,6}") {
        let spec = select_probe(&name);
        prop_assert_eq!(spec.family, PlatformFamily::Default);
        prop_assert_eq!(spec.command_line.clone(), vec!["df", "-i", "."]);
        prop_assert_eq!(spec.value_column, 5);
    }

    /// Property: Every applicable probe reads one row after its headers
    #[test]
    fn applicable_probes_need_one_row(name in "(Linux|Mac OS X|FreeBSD|AIX|SunOS)") {
        let spec = select_probe(&name);
        prop_assert!(spec.is_applicable());
        prop_assert_eq!(spec.lines_needed(), spec.header_lines_to_skip + 1);
        prop_assert!(spec.value_column >= 1);
    }
}
