//! Shared test utilities for the bundle registry workspace.
//!
//! This crate builds real container archives so that tests exercise the
//! same zip parsing as production. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`jar`]: [`JarBuilder`] for archives with a chosen manifest
//! - [`dir`]: [`BundleDir`], a scratch directory of archives

pub mod dir;
pub mod jar;

pub use dir::BundleDir;
pub use jar::{JarBuilder, fold_header};
