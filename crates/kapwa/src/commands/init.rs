//! Initialize export generation config in a package.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use kapwa_exports::CONFIG_FILE;

/// Run the init command.
pub fn run(root: &Path, yes: bool) -> Result<()> {
    let config_path = root.join(CONFIG_FILE);

    if config_path.exists() && !yes {
        tracing::warn!("{} already exists. Use --yes to overwrite.", CONFIG_FILE);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'kapwa generate' to update package.json.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Kapwa export generation

[paths]
# Package manifest to update
manifest = "package.json"

# One folder per component, each with an index.tsx or index.ts
components = "src/kapwa"

# Generated re-export index
index = "src/index.ts"

# Shared utilities (build entry and index re-export)
utils_source = "src/lib/utils.ts"
utils_module = "./lib/utils"

# Build output directory referenced by package.json exports
out_dir = "dist"

[entries]
# Component subdirectories published as their own subpath
allowed_subdirectories = ["hooks", "types", "utils"]

[watch]
debounce_ms = 200
"#;
