//! Watch mode for the Kapwa export generator.
//!
//! Watches the component tree and regenerates the package manifest and
//! aggregated index whenever components are added, removed or renamed.

pub mod regenerate;
pub mod watcher;

pub use regenerate::{watch, watch_until};
pub use watcher::{TreeWatcher, WatchError, WatchEvent};
