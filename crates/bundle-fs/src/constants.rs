//! Names the other crates agree on without passing them around.
//!
//! Each default can be overridden in the service configuration; these are
//! only the values used when nothing else is said.

use std::fmt;

/// A file, entry or directory name with a fixed default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownPath {
    /// Zip entry the archive inspector reads package headers from.
    ManifestEntry,
    /// File name of the catalog inside the data directory.
    CatalogFile,
    /// Configuration file the CLI picks up from the working directory
    /// when `--config` is not given.
    ConfigFile,
    /// Subdirectory of the platform data-local directory holding the
    /// catalog.
    DataDir,
    /// Archive directory used when neither the configuration nor `--dir`
    /// names one. Relative to the working directory.
    WatchDir,
}

impl WellKnownPath {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManifestEntry => "META-INF/MANIFEST.MF",
            Self::CatalogFile => "catalog.toml",
            Self::ConfigFile => "bundle-registry.toml",
            Self::DataDir => "bundle-registry",
            Self::WatchDir => "bundles",
        }
    }
}

impl fmt::Display for WellKnownPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
