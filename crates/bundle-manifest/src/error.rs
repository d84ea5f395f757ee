use std::path::PathBuf;

/// Errors raised while inspecting archives and parsing their manifests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A version segment is not up to three dot-separated integers.
    #[error("malformed version '{version}': {reason}")]
    MalformedVersion { version: String, reason: String },

    /// A package declaration has no usable name or version attribute.
    #[error("malformed package declaration '{declaration}': {reason}")]
    MalformedDeclaration { declaration: String, reason: String },

    /// The file is a directory, unreadable, or lacks the container signature.
    #[error("not a container archive: {path}")]
    NotAContainer { path: PathBuf },

    /// The container opened but holds no manifest entry.
    #[error("no manifest entry '{entry}' in {path}")]
    NoManifestEntry { path: PathBuf, entry: String },

    /// I/O error reading the archive.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed_version(version: &str, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
