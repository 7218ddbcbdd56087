//! Output formatting for human and JSON modes
//!
//! Human mode is the classic lint report: one colored line per issue on
//! stdout. JSON mode serializes the issue list instead, for machine
//! consumption. Neither mode reorders or filters issues.

use std::io;

use crate::issues::{Issue, Reporter};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Render the issue list to stdout in the selected mode.
pub fn render(issues: &[Issue], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Human => {
            let stdout = io::stdout();
            let mut reporter = Reporter::new(stdout.lock(), "\n");
            reporter.print(issues)?;
        }
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(issues)?);
        }
    }
    Ok(())
}
