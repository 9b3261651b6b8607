//! Watch command.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use kapwa_exports::Generator;

/// Run the watch command until interrupted.
pub async fn run(root: &Path, debounce: Option<u64>) -> Result<()> {
    let generator = Generator::from_root(root).context("Failed to load configuration")?;
    let debounce_ms = debounce.unwrap_or(generator.config().watch.debounce_ms);

    let runs = kapwa_watch::watch(&generator, Duration::from_millis(debounce_ms)).await?;

    tracing::info!("Watcher stopped after {} runs", runs);

    Ok(())
}
