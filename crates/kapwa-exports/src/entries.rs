//! Library build entry points.
//!
//! Mirrors the entry selection the bundler uses: every component entry file,
//! every entry file inside an allowed subdirectory of a component, plus the
//! aggregated index and the shared utilities.

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::{to_forward_slashes, ResolvedPaths};
use crate::entry::{is_valid_segment, EntryVariant};

/// Build entry name (output path without extension) to source file.
pub type EntryPoints = BTreeMap<String, String>;

/// Collect build entry points for the component tree.
pub fn entry_points(paths: &ResolvedPaths, allowed_subdirectories: &[String]) -> EntryPoints {
    let mut entries = EntryPoints::new();

    for entry in WalkDir::new(&paths.components)
        .min_depth(2)
        .max_depth(3)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if EntryVariant::from_file_name(&file_name).is_none() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&paths.components) else {
            continue;
        };
        if !is_build_entry(relative, allowed_subdirectories) {
            continue;
        }

        let key = to_forward_slashes(relative);
        let source = format!("{}/{}", paths.components_rel, key);
        entries.insert(key, source);
    }

    entries.insert("index".to_string(), paths.index_rel.clone());
    entries.insert("utils".to_string(), paths.utils_source_rel.clone());
    entries
}

/// `component/index.ts` or `component/<allowed>/index.ts`.
fn is_build_entry(relative: &Path, allowed_subdirectories: &[String]) -> bool {
    let dirs: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    match dirs.as_slice() {
        [component] => is_valid_segment(component),
        [component, sub] => {
            is_valid_segment(component) && allowed_subdirectories.iter().any(|a| a == sub)
        }
        _ => false,
    }
}
