//! Service configuration
//!
//! Every key is optional; a missing key takes its default. The file format
//! follows the extension (`.toml`, `.json`, `.yaml`).
//!
//! ```toml
//! watch_dir = "/srv/bundles"
//! catalog_path = "/var/lib/bundle-registry/catalog.toml"
//! retry_delay_ms = 5000
//! manifest_entry = "META-INF/MANIFEST.MF"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use bundle_fs::{ConfigStore, NormalizedPath, WellKnownPath};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default retry-wait interval for files still being written
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory of archives, not recursed
    pub watch_dir: PathBuf,
    /// Catalog file written after every registry change
    pub catalog_path: PathBuf,
    /// Delay before re-checking a locked file
    pub retry_delay_ms: u64,
    /// Manifest entry name inside each container
    pub manifest_entry: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from(WellKnownPath::WatchDir.as_str()),
            catalog_path: default_catalog_path(),
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            manifest_entry: WellKnownPath::ManifestEntry.as_str().to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load a configuration file.
    ///
    /// Fails with [`Error::ConfigNotFound`] when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let config: Self = ConfigStore::new().load(&NormalizedPath::new(path))?;
        tracing::debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// `<data-local-dir>/bundle-registry/catalog.toml`, or `./catalog.toml`
/// when the platform has no data directory.
pub fn default_catalog_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir
            .join(WellKnownPath::DataDir.as_str())
            .join(WellKnownPath::CatalogFile.as_str()),
        None => PathBuf::from(WellKnownPath::CatalogFile.as_str()),
    }
}
