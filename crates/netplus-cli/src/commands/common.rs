//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use netplus_config::{RunConfig, find_run_config};

/// Load the run configuration.
///
/// Uses `explicit` if given, otherwise the first file [`find_run_config`]
/// turns up, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<RunConfig> {
    match find_run_config(explicit) {
        Some(path) => RunConfig::load(&path)
            .with_context(|| format!("loading run configuration {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

/// Format a duration in seconds with an SI prefix.
pub fn format_seconds(secs: f64) -> String {
    let abs = secs.abs();
    if abs == 0.0 {
        "0 s".to_string()
    } else if abs < 1e-9 {
        format!("{:.3} ps", secs * 1e12)
    } else if abs < 1e-6 {
        format!("{:.3} ns", secs * 1e9)
    } else if abs < 1e-3 {
        format!("{:.3} us", secs * 1e6)
    } else if abs < 1.0 {
        format!("{:.3} ms", secs * 1e3)
    } else {
        format!("{secs:.3} s")
    }
}
