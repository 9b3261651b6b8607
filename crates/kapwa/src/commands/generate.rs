//! Export generation command.

use std::path::Path;

use anyhow::{Context, Result};
use kapwa_exports::Generator;

/// Run the generate command.
pub fn run(root: &Path) -> Result<()> {
    tracing::info!("Generating component exports in {}", root.display());

    let generator = Generator::from_root(root).context("Failed to load configuration")?;
    let result = generator.run().context("Failed to generate exports")?;

    tracing::info!(
        "Done: {} exports ({} components, {} sub-entries, {} skipped) in {}ms",
        result.summary.exports,
        result.summary.components,
        result.summary.sub_entries,
        result.summary.skipped,
        result.duration_ms
    );

    Ok(())
}
