//! Watch command implementation

use std::sync::Arc;

use bundle_registry::{CatalogExporter, DirectoryWatcher, ServiceConfig};
use colored::Colorize;

use crate::error::{CliError, Result};

/// Run the watcher until Ctrl+C.
pub fn run_watch(config: &ServiceConfig) -> Result<()> {
    let dir = super::bundle_dir(config)?;
    let exporter = CatalogExporter::new(config.catalog_path.as_path());
    let processor = Arc::new(super::processor(config).with_catalog(exporter));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let handle =
            DirectoryWatcher::new(&dir, Arc::clone(&processor), config.retry_delay()).spawn()?;
        eprintln!(
            "{} {} (catalog: {})",
            "Watching".green().bold(),
            dir.display(),
            config.catalog_path.display()
        );

        tokio::signal::ctrl_c().await?;
        tracing::info!("interrupt received, shutting down");
        handle.stop().await;
        Ok::<(), CliError>(())
    })
}
