//! Bundle identity extraction.
//!
//! This crate reads the manifest embedded in a container archive, parses
//! its `Export-Package` / `Import-Package` headers and models the package
//! versions and version ranges they declare.

pub mod archive;
pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod version;

pub use archive::{ArchiveInspector, CONTAINER_MAGIC};
pub use declaration::PackageDeclaration;
pub use descriptor::BundleDescriptor;
pub use error::{Error, Result};
pub use manifest::{EXPORT_PACKAGE, IMPORT_PACKAGE, header_entries};
pub use version::{ConstraintKind, LowerBound, UpperBound, Version, VersionConstraint, VersionRange};
