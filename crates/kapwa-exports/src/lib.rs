//! Package export map generation for the Kapwa component library.
//!
//! Scans the component tree, rewrites the `exports` and `typesVersions`
//! fields of the package manifest, and regenerates the aggregated
//! re-export index. Every run is a pure function of the tree on disk and
//! the existing manifest.

pub mod config;
pub mod entries;
pub mod entry;
pub mod error;
pub mod exports;
pub mod generator;
pub mod index;
pub mod manifest;
pub mod scan;
pub mod writer;

pub use config::{ConfigError, ExportsConfig, ResolvedPaths, ALLOWED_SUBDIRECTORIES, CONFIG_FILE};
pub use entries::EntryPoints;
pub use entry::EntryVariant;
pub use error::GenerateError;
pub use exports::{ExportMaps, ExportTarget};
pub use generator::{CheckReport, GenerateResult, GenerateSummary, GeneratedOutputs, Generator};
pub use manifest::Manifest;
pub use scan::{Component, ScanResult, SkipReason, SkippedEntry, SubEntry};
