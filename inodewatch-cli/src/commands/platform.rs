//! Probe selection command.

use inodewatch_core::platform::{ProbeSpec, host_platform_name, select_probe};

use crate::error::CliError;

/// Show platform probe command handler
pub fn cmd_platform(name: Option<&str>) -> Result<(), CliError> {
    let name = name.unwrap_or_else(|| host_platform_name());
    let spec = select_probe(name);
    print!("{}", describe(name, &spec));
    Ok(())
}

fn describe(name: &str, spec: &ProbeSpec) -> String {
    if !spec.is_applicable() {
        return format!("Platform: {name}\nFamily:   {}\nProbe:    not applicable\n", spec.family);
    }
    format!(
        "Platform: {name}\nFamily:   {}\nCommand:  {}\nHeaders:  {}\nColumn:   {}\n",
        spec.family,
        spec.command_display(),
        spec.header_lines_to_skip,
        spec.value_column
    )
}
