//! Error types for bundle-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from bundle-registry
    #[error(transparent)]
    Registry(#[from] bundle_registry::Error),

    /// Error from bundle-manifest
    #[error(transparent)]
    Manifest(#[from] bundle_manifest::Error),

    /// Error from bundle-fs
    #[error(transparent)]
    Fs(#[from] bundle_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

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
