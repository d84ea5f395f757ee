//! Bundle registry service
//!
//! Keeps an in-memory [`Registry`] of the archives in a directory and
//! answers "which archive provides package P at a compatible version".
//!
//! # Architecture
//!
//! ```text
//!   notify events ──> DirectoryWatcher ──> EventProcessor ──> Registry
//!                     (retry timers)              │              ▲
//!                                                 ▼              │
//!                                         CatalogExporter   find_provider
//! ```
//!
//! The processor is the only writer; queries may run concurrently from
//! any number of threads.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bundle_manifest::{BundleDescriptor, VersionConstraint};
//! use bundle_registry::Registry;
//!
//! let registry = Arc::new(Registry::new());
//! registry.upsert(BundleDescriptor::from_manifest(
//!     "/bundles/a.jar",
//!     "Export-Package: util.io;version=\"1.0.0\"\n",
//! ));
//!
//! let wanted = VersionConstraint::parse("[1.0.0,2.0.0)").unwrap();
//! let provider = registry.find_provider("util.io", &wanted);
//! assert_eq!(provider.unwrap().as_str(), "/bundles/a.jar");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod processor;
pub mod registry;
pub mod watcher;

pub use catalog::{CATALOG_VERSION, Catalog, CatalogEntry, CatalogExporter, CatalogPackage};
pub use config::{DEFAULT_RETRY_DELAY_MS, ServiceConfig, default_catalog_path};
pub use error::{Error, Result};
pub use processor::{EventOutcome, EventProcessor, EventState, ScanReport};
pub use registry::{ImportResolution, Registry};
pub use watcher::{ChangeKind, DirectoryWatcher, WatcherHandle};
