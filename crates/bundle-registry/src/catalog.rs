//! Persisted catalog of registered bundles
//!
//! The catalog is derived from the registry and written in full after every
//! mutation. It is never read back into a registry: on restart the registry
//! is rebuilt from a directory scan.

use std::sync::Arc;

use bundle_fs::{ConfigStore, NormalizedPath, StoreFormat};
use bundle_manifest::{BundleDescriptor, PackageDeclaration};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Catalog format version
pub const CATALOG_VERSION: &str = "1.0";

/// One package line of a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPackage {
    pub name: String,
    pub version: String,
}

impl From<&PackageDeclaration> for CatalogPackage {
    fn from(declaration: &PackageDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            version: declaration.constraint.to_string(),
        }
    }
}

/// One bundle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    #[serde(default)]
    pub exports: Vec<CatalogPackage>,
    #[serde(default)]
    pub imports: Vec<CatalogPackage>,
}

impl From<&BundleDescriptor> for CatalogEntry {
    fn from(descriptor: &BundleDescriptor) -> Self {
        Self {
            path: descriptor.path().to_string(),
            exports: descriptor.exports().map(CatalogPackage::from).collect(),
            imports: descriptor.imports().map(CatalogPackage::from).collect(),
        }
    }
}

/// The serialized form of a registry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    #[serde(default)]
    pub bundles: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from a snapshot, keeping the snapshot's order.
    pub fn from_snapshot(snapshot: &[Arc<BundleDescriptor>]) -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            bundles: snapshot.iter().map(|b| CatalogEntry::from(b.as_ref())).collect(),
        }
    }
}

/// Writes registry snapshots to a fixed catalog file.
///
/// The format follows the file extension (`.toml`, `.json`, `.yaml`).
/// Writes are atomic: readers see the previous or the new catalog.
#[derive(Debug, Clone)]
pub struct CatalogExporter {
    target: NormalizedPath,
    store: ConfigStore,
}

impl CatalogExporter {
    pub fn new(target: impl Into<NormalizedPath>) -> Self {
        Self {
            target: target.into(),
            store: ConfigStore::new(),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.target
    }

    /// Render a snapshot in the target's format without writing it.
    pub fn render(&self, snapshot: &[Arc<BundleDescriptor>]) -> Result<String> {
        let format = StoreFormat::from_path(&self.target).map_err(|e| self.write_failure(e))?;
        self.store
            .render(&self.target, format, &Catalog::from_snapshot(snapshot))
            .map_err(|e| self.write_failure(e))
    }

    /// Replace the catalog file with the given snapshot.
    pub fn save(&self, snapshot: &[Arc<BundleDescriptor>]) -> Result<()> {
        self.store
            .save(&self.target, &Catalog::from_snapshot(snapshot))
            .map_err(|e| self.write_failure(e))?;
        tracing::info!(path = %self.target, bundles = snapshot.len(), "catalog written");
        Ok(())
    }

    fn write_failure(&self, source: bundle_fs::Error) -> Error {
        Error::PersistenceWriteFailure {
            path: self.target.to_native(),
            source,
        }
    }
}
