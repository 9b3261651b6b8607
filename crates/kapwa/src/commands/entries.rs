//! Build entry point listing.

use std::path::Path;

use anyhow::{Context, Result};
use kapwa_exports::Generator;

/// Print the library build entry map to stdout.
pub fn run(root: &Path) -> Result<()> {
    let generator = Generator::from_root(root).context("Failed to load configuration")?;
    let entries = generator.entry_points();

    let json = serde_json::to_string_pretty(&entries).context("Failed to serialize entries")?;
    println!("{}", json);

    tracing::debug!("Listed {} build entries", entries.len());

    Ok(())
}
