//! Export generation pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{ExportsConfig, ResolvedPaths};
use crate::entries::{entry_points, EntryPoints};
use crate::error::GenerateError;
use crate::exports::ExportMaps;
use crate::index::render_index;
use crate::manifest::Manifest;
use crate::scan::scan_components;
use crate::writer::{ensure_parent_dir, write_all, OutputFile};

/// Counts describing one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Keys in the export map, seeds included
    pub exports: usize,

    /// Components re-exported from the index
    pub components: usize,

    /// Sub-entry exports
    pub sub_entries: usize,

    /// Candidate directories left out
    pub skipped: usize,
}

/// Rendered outputs of a generation pass, not yet written.
#[derive(Debug, Clone)]
pub struct GeneratedOutputs {
    pub manifest: OutputFile,
    pub index: OutputFile,
    pub maps: ExportMaps,
    pub summary: GenerateSummary,
}

/// Result of a generate run.
#[derive(Debug)]
pub struct GenerateResult {
    pub summary: GenerateSummary,
    pub manifest_path: PathBuf,
    pub index_path: PathBuf,
    pub duration_ms: u64,
}

/// Result of comparing generated outputs with the files on disk.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Outputs whose on-disk contents differ or are missing
    pub stale: Vec<PathBuf>,
    pub summary: GenerateSummary,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Export map generator bound to one package root.
#[derive(Debug, Clone)]
pub struct Generator {
    config: ExportsConfig,
    paths: ResolvedPaths,
}

impl Generator {
    /// Create a generator for `root` with an explicit configuration.
    pub fn new(root: &Path, config: ExportsConfig) -> Result<Self, GenerateError> {
        let paths = config.resolve(root)?;
        Ok(Self { config, paths })
    }

    /// Create a generator for `root`, reading `kapwa.toml` if present.
    pub fn from_root(root: &Path) -> Result<Self, GenerateError> {
        let config = ExportsConfig::load(root)?;
        Self::new(root, config)
    }

    pub fn config(&self) -> &ExportsConfig {
        &self.config
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// Scan the tree and render both outputs without touching the disk.
    pub fn plan(&self) -> Result<GeneratedOutputs, GenerateError> {
        let mut manifest = Manifest::load(&self.paths.manifest)?;

        tracing::info!("Scanning components in {}", self.paths.components_rel);
        let scan = scan_components(
            &self.paths.components,
            &self.config.entries.allowed_subdirectories,
        )?;

        let maps = ExportMaps::build(&self.config.paths.out_dir, &scan.components);
        manifest.apply(&maps);

        let index = render_index(
            &self.config.paths.utils_module,
            &self.paths.component_import_prefix,
            &scan.components,
        );

        let summary = GenerateSummary {
            exports: maps.len(),
            components: scan.components.len(),
            sub_entries: scan.sub_entry_count(),
            skipped: scan.skipped.len(),
        };

        Ok(GeneratedOutputs {
            manifest: OutputFile::new(manifest.path(), manifest.render()?),
            index: OutputFile::new(&self.paths.index, index),
            maps,
            summary,
        })
    }

    /// Regenerate the manifest and the index.
    pub fn run(&self) -> Result<GenerateResult, GenerateError> {
        let start = Instant::now();

        let outputs = self.plan()?;

        ensure_parent_dir(&outputs.index.path)?;
        write_all(&[outputs.manifest.clone(), outputs.index.clone()])?;

        tracing::info!(
            "Updated {} ({} exports)",
            self.config.paths.manifest,
            outputs.summary.exports
        );
        tracing::info!(
            "Generated {} with {} component exports",
            self.paths.index_rel,
            outputs.summary.components
        );

        Ok(GenerateResult {
            summary: outputs.summary,
            manifest_path: outputs.manifest.path,
            index_path: outputs.index.path,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Report which outputs would change if generation ran now.
    pub fn check(&self) -> Result<CheckReport, GenerateError> {
        let outputs = self.plan()?;

        let mut report = CheckReport {
            stale: Vec::new(),
            summary: outputs.summary,
        };

        for output in [&outputs.manifest, &outputs.index] {
            if !matches_on_disk(output)? {
                tracing::info!("{} is out of date", output.path.display());
                report.stale.push(output.path.clone());
            }
        }

        Ok(report)
    }

    /// Library build entry points for the current tree.
    pub fn entry_points(&self) -> EntryPoints {
        entry_points(&self.paths, &self.config.entries.allowed_subdirectories)
    }
}

fn matches_on_disk(output: &OutputFile) -> Result<bool, GenerateError> {
    match fs::read_to_string(&output.path) {
        Ok(current) => Ok(current == output.contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(GenerateError::io(&output.path, e)),
    }
}
