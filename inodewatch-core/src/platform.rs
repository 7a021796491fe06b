//! Platform detection and probe selection
//!
//! Every supported platform family runs the same `df` tool with different
//! flags and reports inode usage in a different column, so selection is a
//! flat table lookup rather than per-platform behaviour.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Probe selected for the current host, resolved once per process
static HOST_PROBE: OnceLock<ProbeSpec> = OnceLock::new();

/// Platform families with a dedicated probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    /// Windows (no inode concept)
    Windows,
    /// Linux
    Linux,
    /// macOS
    MacOs,
    /// FreeBSD
    FreeBsd,
    /// IBM AIX
    Aix,
    /// Anything else; Linux-style best effort
    Default,
}

impl PlatformFamily {
    /// Lowercase prefix matched against the platform name, `None` for the fallback
    #[must_use]
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Windows => Some("windows"),
            Self::Linux => Some("linux"),
            Self::MacOs => Some("mac os"),
            Self::FreeBsd => Some("freebsd"),
            Self::Aix => Some("aix"),
            Self::Default => None,
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "mac os",
            Self::FreeBsd => "freebsd",
            Self::Aix => "aix",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// Matching order for [`select_probe`]. First prefix hit wins.
pub const PRIORITY: [PlatformFamily; 5] = [
    PlatformFamily::Windows,
    PlatformFamily::Linux,
    PlatformFamily::MacOs,
    PlatformFamily::FreeBsd,
    PlatformFamily::Aix,
];

/// Platform-specific recipe for measuring inode usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSpec {
    /// Family this spec was built for
    pub family: PlatformFamily,
    /// Program and arguments; empty when the platform cannot be probed
    pub command_line: Vec<String>,
    /// Lines to discard before the data row
    pub header_lines_to_skip: usize,
    /// 1-indexed column holding the usage percentage
    pub value_column: usize,
}

impl ProbeSpec {
    fn new(family: PlatformFamily, command: &[&str], header_lines: usize, column: usize) -> Self {
        Self {
            family,
            command_line: command.iter().map(|s| (*s).to_string()).collect(),
            header_lines_to_skip: header_lines,
            value_column: column.max(1),
        }
    }

    /// Builds the spec for a platform family
    #[must_use]
    pub fn for_family(family: PlatformFamily) -> Self {
        match family {
            PlatformFamily::Windows => Self::new(family, &[], 0, 1),
            // -P keeps long device names from wrapping onto a second line.
            // Other platforms either ignore -i with -P or reject it.
            PlatformFamily::Linux => Self::new(family, &["df", "-P", "-i", "."], 1, 5),
            PlatformFamily::MacOs | PlatformFamily::FreeBsd => {
                Self::new(family, &["df", "-i", "."], 1, 8)
            }
            PlatformFamily::Aix => Self::new(family, &["df", "-i", "."], 1, 6),
            PlatformFamily::Default => Self::new(family, &["df", "-i", "."], 1, 5),
        }
    }

    /// Builds a spec from explicit parameters, e.g. a configured override
    #[must_use]
    pub fn custom(command_line: Vec<String>, header_lines_to_skip: usize, value_column: usize) -> Self {
        Self {
            family: PlatformFamily::Default,
            command_line,
            header_lines_to_skip,
            value_column: value_column.max(1),
        }
    }

    /// Returns false when probing this platform is never meaningful
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        !self.command_line.is_empty()
    }

    /// Number of stdout lines the probe needs (headers plus the data row)
    #[must_use]
    pub const fn lines_needed(&self) -> usize {
        self.header_lines_to_skip + 1
    }

    /// Command rendered for logs and display
    #[must_use]
    pub fn command_display(&self) -> String {
        if self.command_line.is_empty() {
            "(none)".to_string()
        } else {
            self.command_line.join(" ")
        }
    }
}

/// Selects the probe for a platform name such as `"Linux"` or `"Mac OS X"`.
///
/// Unknown names fall back to [`PlatformFamily::Default`].
#[must_use]
pub fn select_probe(platform_name: &str) -> ProbeSpec {
    ProbeSpec::for_family(detect_family(platform_name))
}

/// Resolves a platform name to its family using [`PRIORITY`]
#[must_use]
pub fn detect_family(platform_name: &str) -> PlatformFamily {
    let normalized = platform_name.trim().to_lowercase();
    PRIORITY
        .into_iter()
        .find(|family| {
            family
                .prefix()
                .is_some_and(|prefix| normalized.starts_with(prefix))
        })
        .unwrap_or(PlatformFamily::Default)
}

/// Platform name of the running host, in the conventional spelling
/// (`"Linux"`, `"Mac OS X"`, `"Windows"`, ...)
#[must_use]
pub fn host_platform_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Mac OS X",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "aix" => "AIX",
        other => other,
    }
}

/// Probe for the running host, selected on first use
pub fn host_probe_spec() -> &'static ProbeSpec {
    HOST_PROBE.get_or_init(|| {
        let name = host_platform_name();
        let spec = select_probe(name);
        tracing::info!(
            platform = name,
            family = %spec.family,
            command = %spec.command_display(),
            "Probe implementation selected"
        );
        spec
    })
}
