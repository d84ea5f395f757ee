//! Resolve command implementation

use bundle_manifest::VersionConstraint;
use bundle_registry::ServiceConfig;

use crate::error::Result;

/// Print the archive providing `package`, or `none`.
///
/// Returns whether a provider was found.
pub fn run_resolve(config: &ServiceConfig, package: &str, range: Option<&str>) -> Result<bool> {
    let constraint = match range {
        Some(text) => VersionConstraint::parse(text)?,
        None => VersionConstraint::unversioned(),
    };
    let registry = super::scan_registry(config)?;

    match registry.find_provider(package, &constraint) {
        Some(path) => {
            println!("{path}");
            Ok(true)
        }
        None => {
            tracing::debug!(package, constraint = %constraint, "no provider");
            println!("none");
            Ok(false)
        }
    }
}
