//! Generator configuration (`kapwa.toml`).

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Name of the optional configuration file at the package root.
pub const CONFIG_FILE: &str = "kapwa.toml";

/// Subdirectory names that become their own subpath exports when they
/// contain an entry file.
pub const ALLOWED_SUBDIRECTORIES: &[&str] = &["hooks", "types", "utils"];

/// Configuration file structure (kapwa.toml).
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ExportsConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub entries: EntriesConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// File locations, all relative to the package root.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Package manifest to rewrite
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Directory holding one folder per component
    #[serde(default = "default_components")]
    pub components: String,

    /// Generated re-export index
    #[serde(default = "default_index")]
    pub index: String,

    /// Source of the shared utilities build entry
    #[serde(default = "default_utils_source")]
    pub utils_source: String,

    /// Module specifier the index uses to re-export the utilities
    #[serde(default = "default_utils_module")]
    pub utils_module: String,

    /// Build output directory referenced by the export map
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EntriesConfig {
    /// Ordered list of sub-entry directory names
    #[serde(default = "default_allowed_subdirectories")]
    pub allowed_subdirectories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            components: default_components(),
            index: default_index(),
            utils_source: default_utils_source(),
            utils_module: default_utils_module(),
            out_dir: default_out_dir(),
        }
    }
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            allowed_subdirectories: default_allowed_subdirectories(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_manifest() -> String {
    "package.json".to_string()
}
fn default_components() -> String {
    "src/kapwa".to_string()
}
fn default_index() -> String {
    "src/index.ts".to_string()
}
fn default_utils_source() -> String {
    "src/lib/utils.ts".to_string()
}
fn default_utils_module() -> String {
    "./lib/utils".to_string()
}
fn default_out_dir() -> String {
    "dist".to_string()
}
fn default_allowed_subdirectories() -> Vec<String> {
    ALLOWED_SUBDIRECTORIES.iter().map(|s| s.to_string()).collect()
}
fn default_debounce_ms() -> u64 {
    200
}

impl ExportsConfig {
    /// Load `kapwa.toml` from the package root if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Read {
            path: config_path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: config_path.display().to_string(),
                message,
            },
            other => other,
        })?;
        tracing::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: CONFIG_FILE.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for name in &self.entries.allowed_subdirectories {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(ConfigError::Invalid(format!(
                    "allowed subdirectory '{}' must be a single path segment",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Resolve configured paths against an explicit package root.
    pub fn resolve(&self, root: &Path) -> Result<ResolvedPaths, ConfigError> {
        let components_rel = without_cur_dir(Path::new(&self.paths.components));
        let index_rel = without_cur_dir(Path::new(&self.paths.index));
        let manifest_rel = without_cur_dir(Path::new(&self.paths.manifest));

        let index_parent = index_rel.parent().unwrap_or_else(|| Path::new(""));
        let component_import_prefix = components_rel
            .strip_prefix(index_parent)
            .map(|rel| format!("./{}", to_forward_slashes(rel)))
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "component directory '{}' must live under the index directory '{}'",
                    components_rel.display(),
                    index_parent.display()
                ))
            })?;

        Ok(ResolvedPaths {
            root: root.to_path_buf(),
            manifest: root.join(&manifest_rel),
            manifest_rel: to_forward_slashes(&manifest_rel),
            components: root.join(&components_rel),
            components_rel: to_forward_slashes(&components_rel),
            index: root.join(&index_rel),
            index_rel: to_forward_slashes(&index_rel),
            utils_source_rel: self.paths.utils_source.clone(),
            component_import_prefix,
        })
    }
}

/// Configured locations resolved against a package root.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub root: PathBuf,
    pub manifest: PathBuf,
    pub manifest_rel: String,
    pub components: PathBuf,
    /// Component root relative to the package root, `/`-separated
    pub components_rel: String,
    pub index: PathBuf,
    pub index_rel: String,
    pub utils_source_rel: String,
    /// Specifier prefix from the index file to the component root (`./kapwa`)
    pub component_import_prefix: String,
}

/// Drop `.` components so `./src/kapwa` and `src/kapwa` compare equal.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Join path components with `/` regardless of platform.
pub(crate) fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
