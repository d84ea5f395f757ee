//! Error types for bundle-registry

use std::path::PathBuf;

/// Result type for bundle-registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bundle-registry operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file exists but cannot be read yet, usually because a writer
    /// still holds it. Drives the retry wait.
    #[error("{path} is locked by another writer")]
    TransientLock { path: PathBuf },

    /// The catalog could not be written. The in-memory registry keeps the
    /// mutation regardless.
    #[error("Failed to write catalog to {path}: {source}")]
    PersistenceWriteFailure {
        path: PathBuf,
        #[source]
        source: bundle_fs::Error,
    },

    /// The notify backend could not watch a directory
    #[error("Failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The directory to scan or watch is missing or not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from bundle-fs
    #[error(transparent)]
    Fs(#[from] bundle_fs::Error),

    /// Manifest error from bundle-manifest
    #[error(transparent)]
    Manifest(#[from] bundle_manifest::Error),
}
