//! Scan command implementation

use std::sync::Arc;

use bundle_registry::{CatalogExporter, ServiceConfig};

use crate::error::Result;

/// Scan the bundle directory once, write the catalog and print one line
/// per registered bundle.
pub fn run_scan(config: &ServiceConfig) -> Result<()> {
    let dir = super::bundle_dir(config)?;
    let exporter = CatalogExporter::new(config.catalog_path.as_path());
    let processor = super::processor(config).with_catalog(exporter.clone());

    let report = processor.scan(&dir)?;
    for path in &report.pending {
        tracing::warn!(path = %path.display(), "archive is locked, left out");
    }

    let registry = Arc::clone(processor.registry());
    let snapshot = registry.snapshot();
    exporter.save(&snapshot)?;

    for bundle in &snapshot {
        println!(
            "{} ({} exports, {} imports)",
            bundle.path(),
            bundle.export_count(),
            bundle.import_count()
        );
    }
    Ok(())
}
