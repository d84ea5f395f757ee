//! Imports command implementation

use std::path::Path;

use bundle_fs::NormalizedPath;
use bundle_registry::ServiceConfig;

use crate::error::{CliError, Result};

/// Print one `package constraint -> provider` line per import of `archive`.
pub fn run_imports(config: &ServiceConfig, archive: &Path) -> Result<()> {
    let registry = super::scan_registry(config)?;
    let dir = super::bundle_dir(config)?;

    let candidate = if archive.is_absolute() || !dir.join(archive).exists() {
        archive.to_path_buf()
    } else {
        dir.join(archive)
    };
    let key = NormalizedPath::new(&candidate)
        .canonicalize()
        .map_err(|_| CliError::user(format!("archive not found: {}", archive.display())))?;

    let rows = registry.resolve_imports(&key).ok_or_else(|| {
        CliError::user(format!("{} is not a registered bundle", archive.display()))
    })?;

    for row in rows {
        let provider = row
            .provider
            .map(|path| path.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!("{} {} -> {}", row.package, row.constraint, provider);
    }
    Ok(())
}
