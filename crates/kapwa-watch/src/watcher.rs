//! File watching for the component tree.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Changes that can alter the set of published entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// File or directory was created
    Created(PathBuf),

    /// File or directory was removed
    Removed(PathBuf),

    /// File or directory was renamed (either side of the rename)
    Renamed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Created(p) | WatchEvent::Removed(p) | WatchEvent::Renamed(p) => p,
        }
    }
}

/// Recursive watcher over one or more directories.
pub struct TreeWatcher {
    _watcher: RecommendedWatcher,
}

impl TreeWatcher {
    /// Create a new watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive events. Paths that do
    /// not exist yet are skipped.
    pub fn new(paths: &[PathBuf]) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), WatchError> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(|e| WatchError::Setup(e.to_string()))?;

        let mut watched = 0;
        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(|e| WatchError::Setup(format!("{}: {}", path.display(), e)))?;
                watched += 1;
            } else {
                tracing::warn!("Not watching {} (does not exist)", path.display());
            }
        }
        if watched == 0 {
            return Err(WatchError::NothingToWatch);
        }

        // Forward notify events into the async channel
        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                for path in event.paths {
                    if let Some(e) = classify_event(&path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event. Content edits are ignored since they cannot
/// change which entries exist.
fn classify_event(path: &Path, kind: &EventKind) -> Option<WatchEvent> {
    if is_staging_file(path) {
        return None;
    }

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        EventKind::Modify(ModifyKind::Name(_)) => Some(WatchEvent::Renamed(path.to_path_buf())),
        _ => None,
    }
}

fn is_staging_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".kapwa-tmp"))
}

/// Errors that can occur while watching.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to set up file watcher: {0}")]
    Setup(String),

    #[error("None of the watched paths exist")]
    NothingToWatch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind, RenameMode};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn classifies_structural_changes() {
        let path = Path::new("/pkg/src/kapwa/chip");

        assert_eq!(
            classify_event(path, &EventKind::Create(CreateKind::Folder)),
            Some(WatchEvent::Created(path.to_path_buf()))
        );
        assert_eq!(
            classify_event(path, &EventKind::Remove(RemoveKind::Folder)),
            Some(WatchEvent::Removed(path.to_path_buf()))
        );
        assert_eq!(
            classify_event(path, &EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            Some(WatchEvent::Renamed(path.to_path_buf()))
        );
    }

    #[test]
    fn ignores_content_edits_and_staging_files() {
        let index = Path::new("/pkg/src/kapwa/chip/index.tsx");
        let staged = Path::new("/pkg/src/.index.ts.kapwa-tmp");

        assert_eq!(
            classify_event(index, &EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            None
        );
        assert_eq!(
            classify_event(staged, &EventKind::Create(CreateKind::File)),
            None
        );
    }

    #[test]
    fn rejects_missing_paths() {
        let temp = tempdir().unwrap();

        let result = TreeWatcher::new(&[temp.path().join("absent")]);

        assert!(matches!(result, Err(WatchError::NothingToWatch)));
    }

    #[tokio::test]
    async fn reports_new_component_directories() {
        let temp = tempdir().unwrap();

        let (watcher, mut rx) = TreeWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::create_dir(temp.path().join("chip")).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }
}
