//! Component tree scanning.
//!
//! Lists the immediate subdirectories of the component root, keeps those
//! with an entry file, and probes each for allowed sub-entry directories.

use std::fs;
use std::path::Path;

use crate::entry::{detect_entry, is_valid_segment, EntryVariant};
use crate::error::GenerateError;

/// A component directory that qualified as an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Directory name, used as the subpath
    pub name: String,

    /// Variant of the component's own entry file
    pub variant: EntryVariant,

    /// Allowed subdirectories with their own entry file, in configured order
    pub sub_entries: Vec<SubEntry>,
}

/// An allowed subdirectory of a component with its own entry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntry {
    pub name: String,
    pub variant: EntryVariant,
}

/// Why a candidate directory was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither `index.tsx` nor `index.ts` exists
    NoEntry,
    /// Name is not usable as a package subpath
    InvalidName,
}

/// A candidate directory that contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// Outcome of scanning the component root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Qualifying components, sorted by name
    pub components: Vec<Component>,
    pub skipped: Vec<SkippedEntry>,
}

impl ScanResult {
    /// Total number of sub-entries across all components.
    pub fn sub_entry_count(&self) -> usize {
        self.components.iter().map(|c| c.sub_entries.len()).sum()
    }
}

/// Scan `components_dir` for publishable components.
///
/// A missing or unreadable root yields an empty result. Failures while
/// iterating an opened listing are fatal.
pub fn scan_components(
    components_dir: &Path,
    allowed_subdirectories: &[String],
) -> Result<ScanResult, GenerateError> {
    let listing = match fs::read_dir(components_dir) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!(
                "No components found: cannot read {}: {}",
                components_dir.display(),
                e
            );
            return Ok(ScanResult::default());
        }
    };

    let mut result = ScanResult::default();
    let mut names = Vec::new();

    for entry in listing {
        let entry = entry.map_err(|e| GenerateError::io(components_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                let name = raw.to_string_lossy().into_owned();
                tracing::warn!("Skipping {} (name is not valid UTF-8)", name);
                result.skipped.push(SkippedEntry {
                    name,
                    reason: SkipReason::InvalidName,
                });
            }
        }
    }

    // Directory listing order is platform dependent
    names.sort();

    for name in names {
        if !is_valid_segment(&name) {
            tracing::warn!("Skipping {} (not a valid subpath name)", name);
            result.skipped.push(SkippedEntry {
                name,
                reason: SkipReason::InvalidName,
            });
            continue;
        }

        let component_path = components_dir.join(&name);
        let Some(variant) = detect_entry(&component_path) else {
            tracing::info!("Skipping {} (no index file)", name);
            result.skipped.push(SkippedEntry {
                name,
                reason: SkipReason::NoEntry,
            });
            continue;
        };

        tracing::info!("Found {}", name);

        let sub_entries: Vec<SubEntry> = allowed_subdirectories
            .iter()
            .filter_map(|sub| {
                let variant = detect_entry(&component_path.join(sub))?;
                tracing::info!("Found {}/{}", name, sub);
                Some(SubEntry {
                    name: sub.clone(),
                    variant,
                })
            })
            .collect();

        result.components.push(Component {
            name,
            variant,
            sub_entries,
        });
    }

    Ok(result)
}
