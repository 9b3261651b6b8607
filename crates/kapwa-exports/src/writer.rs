//! Paired output writes.
//!
//! Every output is first written to a sibling temporary file. Targets are
//! only replaced once all temporaries are complete, so a failure while
//! writing leaves every target untouched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;

/// A file to be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Temporary path next to `target`.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{}.kapwa-tmp", name))
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> Result<(), GenerateError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Replace all `outputs` as one step: stage everything, then rename.
pub fn write_all(outputs: &[OutputFile]) -> Result<(), GenerateError> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(outputs.len());

    for output in outputs {
        let tmp = staging_path(&output.path);
        if let Err(e) = fs::write(&tmp, &output.contents) {
            // The failed write may have left a partial file behind
            staged.push(tmp.clone());
            discard(&staged);
            return Err(GenerateError::io(&tmp, e));
        }
        staged.push(tmp);
    }

    for (i, output) in outputs.iter().enumerate() {
        if let Err(e) = fs::rename(&staged[i], &output.path) {
            discard(&staged[i..]);
            return Err(GenerateError::io(&output.path, e));
        }
        tracing::debug!("Wrote {}", output.path.display());
    }

    Ok(())
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
