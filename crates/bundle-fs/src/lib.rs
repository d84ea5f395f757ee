//! Filesystem primitives for the bundle registry
//!
//! Provides normalized archive paths, atomic locked writes and
//! format-agnostic (TOML/JSON/YAML) load/save.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, StoreFormat};
pub use constants::WellKnownPath;
pub use error::{Error, Result};
pub use io::LockPolicy;
pub use path::NormalizedPath;
