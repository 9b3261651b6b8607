//! Entry file detection for component directories.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Script variant of a directory's `index` entry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryVariant {
    /// `index.tsx`
    Tsx,
    /// `index.ts`
    Ts,
}

impl EntryVariant {
    /// Probe order: the first variant whose file exists wins.
    pub const PRIORITY: [EntryVariant; 2] = [EntryVariant::Tsx, EntryVariant::Ts];

    /// Entry file name inside the directory.
    pub fn file_name(self) -> &'static str {
        match self {
            EntryVariant::Tsx => "index.tsx",
            EntryVariant::Ts => "index.ts",
        }
    }

    /// Source extension including the dot, as embedded in build output names.
    pub fn suffix(self) -> &'static str {
        match self {
            EntryVariant::Tsx => ".tsx",
            EntryVariant::Ts => ".ts",
        }
    }

    /// Variant for an entry file name, if it is one.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|v| v.file_name() == name)
    }
}

/// Find the entry variant of a directory, if it has one.
pub fn detect_entry(dir: &Path) -> Option<EntryVariant> {
    EntryVariant::PRIORITY
        .into_iter()
        .find(|variant| dir.join(variant.file_name()).is_file())
}

/// Whether a directory name can be used as a path segment and package subpath.
///
/// Rejects separators, the export-map wildcard `*`, the quote that delimits
/// index specifiers, and names starting with `.` (which covers `.`, `..`
/// and hidden directories the bundler's glob skips).
pub fn is_valid_segment(name: &str) -> bool {
    static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[^./\\*'][^/\\*']*$").expect("Invalid segment regex")
    });
    SEGMENT_RE.is_match(name)
}
