//! Parsed identity of one archive.

use std::collections::BTreeMap;
use std::path::Path;

use bundle_fs::NormalizedPath;

use crate::archive::ArchiveInspector;
use crate::declaration::PackageDeclaration;
use crate::error::Result;
use crate::manifest::{EXPORT_PACKAGE, IMPORT_PACKAGE, header_entries};

/// What one archive exports and imports.
///
/// Identity is the archive path. Packages are keyed by name; when a header
/// names a package twice the later declaration wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDescriptor {
    path: NormalizedPath,
    exports: BTreeMap<String, PackageDeclaration>,
    imports: BTreeMap<String, PackageDeclaration>,
}

impl BundleDescriptor {
    /// A descriptor with no declarations.
    pub fn empty(path: impl Into<NormalizedPath>) -> Self {
        Self {
            path: path.into(),
            exports: BTreeMap::new(),
            imports: BTreeMap::new(),
        }
    }

    /// Read the archive's manifest and parse both package headers.
    ///
    /// Fails when the archive has no readable manifest. A manifest without
    /// either header yields an empty, still valid, descriptor.
    pub fn build(path: &Path, inspector: &ArchiveInspector) -> Result<Self> {
        let manifest = inspector.manifest_text(path)?;
        Ok(Self::from_manifest(path, &manifest))
    }

    /// Parse both package headers out of manifest text.
    ///
    /// Declarations with a malformed version are skipped; the rest of the
    /// header still counts.
    pub fn from_manifest(path: impl Into<NormalizedPath>, manifest: &str) -> Self {
        let mut descriptor = Self::empty(path);
        descriptor.exports = parse_header(&descriptor.path, manifest, EXPORT_PACKAGE);
        descriptor.imports = parse_header(&descriptor.path, manifest, IMPORT_PACKAGE);
        descriptor
    }

    /// Add or replace an export declaration.
    pub fn with_export(mut self, declaration: PackageDeclaration) -> Self {
        self.exports.insert(declaration.name.clone(), declaration);
        self
    }

    /// Add or replace an import declaration.
    pub fn with_import(mut self, declaration: PackageDeclaration) -> Self {
        self.imports.insert(declaration.name.clone(), declaration);
        self
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Export declarations, ordered by package name.
    pub fn exports(&self) -> impl Iterator<Item = &PackageDeclaration> {
        self.exports.values()
    }

    /// Import declarations, ordered by package name.
    pub fn imports(&self) -> impl Iterator<Item = &PackageDeclaration> {
        self.imports.values()
    }

    /// Look up the export declaration for a package.
    pub fn export(&self, package: &str) -> Option<&PackageDeclaration> {
        self.exports.get(package)
    }

    /// Look up the import declaration for a package.
    pub fn import(&self, package: &str) -> Option<&PackageDeclaration> {
        self.imports.get(package)
    }

    pub fn export_count(&self) -> usize {
        self.exports.len()
    }

    pub fn import_count(&self) -> usize {
        self.imports.len()
    }

    /// True when the bundle neither exports nor imports anything.
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty() && self.imports.is_empty()
    }
}

fn parse_header(
    path: &NormalizedPath,
    manifest: &str,
    header: &str,
) -> BTreeMap<String, PackageDeclaration> {
    let mut declarations = BTreeMap::new();
    for entry in header_entries(manifest, header) {
        match PackageDeclaration::parse(&entry) {
            Ok(declaration) => {
                declarations.insert(declaration.name.clone(), declaration);
            }
            Err(e) => {
                tracing::warn!(path = %path, header, entry = %entry, error = %e, "skipping declaration");
            }
        }
    }
    declarations
}
