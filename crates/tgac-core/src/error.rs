//! Error types for tgac-core

use std::path::PathBuf;

/// Result type for tgac-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving project metadata
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An `extra_atlantis_dependencies` element is not a string (0-based position)
    #[error("extra_atlantis_dependencies contains non-string value at position {position}")]
    NonStringDependency { position: usize },

    /// A recognised local has the wrong type
    #[error("local {key} must be {expected}")]
    LocalType { key: String, expected: &'static str },

    /// A settings file could not be parsed
    #[error("Invalid settings in {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An explicitly requested settings file does not exist
    #[error("Settings file not found at {path}")]
    SettingsNotFound { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// HCL error from tgac-hcl
    #[error(transparent)]
    Hcl(#[from] tgac_hcl::Error),

    /// Filesystem error from tgac-fs
    #[error(transparent)]
    Fs(#[from] tgac_fs::Error),

    /// Directory traversal error
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
