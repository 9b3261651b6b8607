//! Staleness check for generated files.

use std::path::Path;

use anyhow::{Context, Result};
use kapwa_exports::Generator;

/// Run the check command.
pub fn run(root: &Path) -> Result<()> {
    let generator = Generator::from_root(root).context("Failed to load configuration")?;
    let report = generator.check().context("Failed to check exports")?;

    if !report.is_clean() {
        let stale: Vec<String> = report
            .stale
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        anyhow::bail!(
            "Generated files are out of date: {}. Run 'kapwa generate'.",
            stale.join(", ")
        );
    }

    tracing::info!(
        "Exports are up to date ({} exports, {} components)",
        report.summary.exports,
        report.summary.components
    );

    Ok(())
}
