//! Error types for tgac-hcl

use tgac_fs::NormalizedPath;

/// Result type for tgac-hcl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or decoding a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {path}: {message}")]
    Parse { path: NormalizedPath, message: String },

    #[error("Panic while parsing {path}: {payload}")]
    ParsePanic {
        path: NormalizedPath,
        payload: String,
    },

    #[error("{path} declares more than one include block without a label")]
    MultipleBareIncludeBlocks { path: NormalizedPath },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: NormalizedPath, message: String },

    #[error("{path} declares include {label:?} more than once")]
    DuplicateIncludeLabel {
        path: NormalizedPath,
        label: String,
    },

    #[error(transparent)]
    Fs(#[from] tgac_fs::Error),
}

impl Error {
    pub fn parse(path: &NormalizedPath, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.clone(),
            message: message.into(),
        }
    }

    pub fn decode(path: &NormalizedPath, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.clone(),
            message: message.into(),
        }
    }
}
