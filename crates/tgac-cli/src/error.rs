//! Error types for tgac-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from tgac-core
    #[error(transparent)]
    Core(#[from] tgac_core::Error),

    /// Error from tgac-hcl
    #[error(transparent)]
    Hcl(#[from] tgac_hcl::Error),

    /// Error from tgac-fs
    #[error(transparent)]
    Fs(#[from] tgac_fs::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
