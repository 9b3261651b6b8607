//! Error types for export generation.

use crate::config::ConfigError;

/// Errors that abort a generator run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Failed to read manifest {path}: {message}")]
    ManifestRead { path: String, message: String },

    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: String, message: String },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(String),

    #[error("Filesystem error at {path}: {message}")]
    Io { path: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GenerateError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
