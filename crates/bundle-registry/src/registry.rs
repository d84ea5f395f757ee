//! In-memory registry of bundle descriptors
//!
//! One writer (the event processor) mutates the registry while any number
//! of callers query it. Descriptors are stored behind [`Arc`] and swapped
//! whole, so a reader always sees either the previous or the new
//! descriptor for a path and never a partially built one.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bundle_fs::NormalizedPath;
use bundle_manifest::{BundleDescriptor, VersionConstraint};

/// The outcome of resolving one import of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResolution {
    /// Imported package name
    pub package: String,
    /// Constraint the import was declared with
    pub constraint: VersionConstraint,
    /// Archive exporting a compatible version, if any
    pub provider: Option<NormalizedPath>,
}

/// Registered bundles keyed by archive path, in insertion order.
///
/// Constructed once by the process entry point and shared by reference
/// (typically through an `Arc`) with the watcher and query callers.
#[derive(Debug, Default)]
pub struct Registry {
    bundles: RwLock<Vec<Arc<BundleDescriptor>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are only ever replaced whole, so a poisoned lock still
    // guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<BundleDescriptor>>> {
        self.bundles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<BundleDescriptor>>> {
        self.bundles.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a descriptor, replacing any prior one for the same path.
    ///
    /// A replaced entry keeps its position. Returns the previous descriptor.
    pub fn upsert(&self, descriptor: BundleDescriptor) -> Option<Arc<BundleDescriptor>> {
        let descriptor = Arc::new(descriptor);
        let mut bundles = self.write();
        match bundles.iter_mut().find(|b| b.path() == descriptor.path()) {
            Some(slot) => Some(std::mem::replace(slot, descriptor)),
            None => {
                bundles.push(descriptor);
                None
            }
        }
    }

    /// Remove the descriptor for `path`. No-op when absent.
    pub fn remove(&self, path: &NormalizedPath) -> Option<Arc<BundleDescriptor>> {
        let mut bundles = self.write();
        let pos = bundles.iter().position(|b| b.path() == path)?;
        Some(bundles.remove(pos))
    }

    /// Find an archive exporting `package` at a version compatible with
    /// `constraint`.
    ///
    /// Returns the first match in registration order. When several
    /// bundles qualify, which one wins depends on the order they were
    /// registered in.
    pub fn find_provider(
        &self,
        package: &str,
        constraint: &VersionConstraint,
    ) -> Option<NormalizedPath> {
        self.read()
            .iter()
            .find(|bundle| {
                bundle
                    .export(package)
                    .is_some_and(|export| constraint.is_compatible(&export.constraint))
            })
            .map(|bundle| bundle.path().clone())
    }

    /// Every bundle exporting `package`, at any version.
    pub fn providers_of(&self, package: &str) -> Vec<Arc<BundleDescriptor>> {
        self.read()
            .iter()
            .filter(|bundle| bundle.export(package).is_some())
            .cloned()
            .collect()
    }

    /// Resolve each import of a registered bundle independently.
    ///
    /// Returns `None` when `path` is not registered.
    pub fn resolve_imports(&self, path: &NormalizedPath) -> Option<Vec<ImportResolution>> {
        let bundle = self.get(path)?;
        let rows = bundle
            .imports()
            .map(|import| ImportResolution {
                package: import.name.clone(),
                constraint: import.constraint.clone(),
                provider: self.find_provider(&import.name, &import.constraint),
            })
            .collect();
        Some(rows)
    }

    pub fn get(&self, path: &NormalizedPath) -> Option<Arc<BundleDescriptor>> {
        self.read().iter().find(|b| b.path() == path).cloned()
    }

    /// Point-in-time copy of all descriptors, in insertion order.
    pub fn snapshot(&self) -> Vec<Arc<BundleDescriptor>> {
        self.read().clone()
    }

    pub fn paths(&self) -> Vec<NormalizedPath> {
        self.read().iter().map(|b| b.path().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
