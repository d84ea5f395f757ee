//! Command implementations for bundle-cli

pub mod imports;
pub mod resolve;
pub mod scan;
pub mod watch;

pub use imports::run_imports;
pub use resolve::run_resolve;
pub use scan::run_scan;
pub use watch::run_watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bundle_fs::{NormalizedPath, WellKnownPath};
use bundle_manifest::ArchiveInspector;
use bundle_registry::{EventProcessor, Registry, ServiceConfig};

use crate::cli::ServiceArgs;
use crate::error::{CliError, Result};

/// Load the configuration and apply command-line overrides.
///
/// Without `--config`, a `bundle-registry.toml` in the working directory
/// is used when present; otherwise every key takes its default.
pub fn load_config(
    args: &ServiceArgs,
    catalog: Option<&Path>,
    retry_delay_ms: Option<u64>,
) -> Result<ServiceConfig> {
    let implicit = PathBuf::from(WellKnownPath::ConfigFile.as_str());
    let config_path = match &args.config {
        Some(path) => Some(path.as_path()),
        None if implicit.is_file() => Some(implicit.as_path()),
        None => None,
    };

    let mut config = ServiceConfig::load_or_default(config_path)?;
    if let Some(dir) = &args.dir {
        config.watch_dir = dir.clone();
    }
    if let Some(catalog) = catalog {
        config.catalog_path = catalog.to_path_buf();
    }
    if let Some(delay) = retry_delay_ms {
        config.retry_delay_ms = delay;
    }
    Ok(config)
}

/// The configured bundle directory, made absolute so registry keys are
/// stable across commands.
pub fn bundle_dir(config: &ServiceConfig) -> Result<PathBuf> {
    if !config.watch_dir.is_dir() {
        return Err(CliError::user(format!(
            "bundle directory not found: {}",
            config.watch_dir.display()
        )));
    }
    Ok(NormalizedPath::new(&config.watch_dir)
        .canonicalize()?
        .to_native())
}

/// A fresh registry with a processor bound to it.
pub fn processor(config: &ServiceConfig) -> EventProcessor {
    EventProcessor::new(
        Arc::new(Registry::new()),
        ArchiveInspector::with_manifest_entry(config.manifest_entry.clone()),
    )
}

/// Build a registry from a one-shot scan, without writing a catalog.
pub fn scan_registry(config: &ServiceConfig) -> Result<Arc<Registry>> {
    let dir = bundle_dir(config)?;
    let processor = processor(config);
    let report = processor.scan(&dir)?;
    for path in &report.pending {
        tracing::warn!(path = %path.display(), "archive is locked, left out");
    }
    Ok(Arc::clone(processor.registry()))
}
