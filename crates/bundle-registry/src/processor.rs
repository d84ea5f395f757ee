//! Per-event state machine
//!
//! Each filesystem event for a path walks through
//!
//! ```text
//! IDLE -> VALIDATING -+-> RETRY_WAIT            (file locked, re-check later)
//!                     +-> DONE                  (gone, not a container, invalid)
//!                     +-> APPLYING -> DONE      (descriptor committed)
//! ```
//!
//! Errors never leave the processor: a rejected file is logged and the
//! event abandoned.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bundle_fs::NormalizedPath;
use bundle_fs::io::{Readability, probe_readable};
use bundle_manifest::{ArchiveInspector, BundleDescriptor};

use crate::catalog::CatalogExporter;
use crate::error::{Error, Result};
use crate::registry::Registry;

/// Where an event currently is in its processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Idle,
    Validating,
    RetryWait,
    Applying,
    Done,
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Validating => "VALIDATING",
            Self::RetryWait => "RETRY_WAIT",
            Self::Applying => "APPLYING",
            Self::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// How an event ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A descriptor was inserted or replaced
    Registered,
    /// A previously registered bundle was removed
    Deregistered,
    /// Nothing changed
    Ignored,
    /// The file is locked; the caller should re-check it later
    RetryWait,
}

/// Summary of a full directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Files registered by the scan
    pub registered: usize,
    /// Files that were looked at and left out
    pub ignored: usize,
    /// Locked files that still need a re-check
    pub pending: Vec<PathBuf>,
    /// The scan was stopped before visiting every file
    pub cancelled: bool,
}

/// Applies filesystem events to a [`Registry`] and, when a catalog is
/// attached, keeps the catalog in step with it.
///
/// The processor is the registry's single writer.
#[derive(Debug)]
pub struct EventProcessor {
    registry: Arc<Registry>,
    inspector: ArchiveInspector,
    exporter: Option<CatalogExporter>,
}

impl EventProcessor {
    /// A processor that only maintains the in-memory registry.
    pub fn new(registry: Arc<Registry>, inspector: ArchiveInspector) -> Self {
        Self {
            registry,
            inspector,
            exporter: None,
        }
    }

    /// Write the catalog after every registry change.
    pub fn with_catalog(mut self, exporter: CatalogExporter) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn exporter(&self) -> Option<&CatalogExporter> {
        self.exporter.as_ref()
    }

    /// Process a create or modify event for `path`.
    pub fn handle_change(&self, path: &Path) -> EventOutcome {
        let key = NormalizedPath::new(path);
        transition(&key, EventState::Validating);

        match check_readable(path) {
            Ok(Readability::Missing) => {
                tracing::debug!(path = %key, "file vanished, treating as removal");
                return self.handle_remove(path);
            }
            Ok(Readability::Directory) => {
                tracing::debug!(path = %key, "ignoring subdirectory");
                transition(&key, EventState::Done);
                return EventOutcome::Ignored;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %key, error = %e, "file not readable yet");
                transition(&key, EventState::RetryWait);
                return EventOutcome::RetryWait;
            }
        }

        if !self.inspector.is_container_file(path) {
            tracing::warn!(path = %key, "not a container archive, ignoring");
            transition(&key, EventState::Done);
            return EventOutcome::Ignored;
        }

        let outcome = match BundleDescriptor::build(path, &self.inspector) {
            Ok(descriptor) => {
                tracing::info!(
                    path = %key,
                    exports = descriptor.export_count(),
                    imports = descriptor.import_count(),
                    "registering bundle"
                );
                self.registry.upsert(descriptor);
                transition(&key, EventState::Applying);
                self.persist();
                EventOutcome::Registered
            }
            Err(e) => {
                tracing::warn!(path = %key, error = %e, "invalid bundle");
                self.deregister(&key)
            }
        };

        transition(&key, EventState::Done);
        outcome
    }

    /// Process a delete event for `path`.
    pub fn handle_remove(&self, path: &Path) -> EventOutcome {
        let key = NormalizedPath::new(path);
        let outcome = self.deregister(&key);
        transition(&key, EventState::Done);
        outcome
    }

    /// Process every file in `dir` as if it had just been created.
    ///
    /// Entries are visited in file-name order; subdirectories are skipped.
    pub fn scan(&self, dir: &Path) -> Result<ScanReport> {
        self.scan_until(dir, &AtomicBool::new(false))
    }

    /// [`scan`](Self::scan) that stops before the next file once `cancel`
    /// is set. Files already processed stay registered.
    pub fn scan_until(&self, dir: &Path, cancel: &AtomicBool) -> Result<ScanReport> {
        if !dir.is_dir() {
            return Err(Error::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| bundle_fs::Error::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| !path.is_dir())
            .collect();
        files.sort();

        let mut report = ScanReport::default();
        let total = files.len();
        for (visited, file) in files.into_iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(
                    dir = %dir.display(),
                    skipped = total - visited,
                    "directory scan cancelled"
                );
                report.cancelled = true;
                return Ok(report);
            }
            match self.handle_change(&file) {
                EventOutcome::Registered => report.registered += 1,
                EventOutcome::RetryWait => report.pending.push(file),
                EventOutcome::Deregistered | EventOutcome::Ignored => report.ignored += 1,
            }
        }

        tracing::info!(
            dir = %dir.display(),
            registered = report.registered,
            ignored = report.ignored,
            pending = report.pending.len(),
            "directory scan complete"
        );
        Ok(report)
    }

    fn deregister(&self, key: &NormalizedPath) -> EventOutcome {
        match self.registry.remove(key) {
            Some(_) => {
                tracing::info!(path = %key, "deregistered bundle");
                self.persist();
                EventOutcome::Deregistered
            }
            None => EventOutcome::Ignored,
        }
    }

    // The in-memory change stands even when the catalog write fails.
    fn persist(&self) {
        let Some(exporter) = &self.exporter else {
            return;
        };
        if let Err(e) = exporter.save(&self.registry.snapshot()) {
            tracing::warn!(error = %e, "catalog not updated");
        }
    }
}

fn check_readable(path: &Path) -> Result<Readability> {
    match probe_readable(path) {
        Readability::Locked => Err(Error::TransientLock {
            path: path.to_path_buf(),
        }),
        other => Ok(other),
    }
}

fn transition(path: &NormalizedPath, state: EventState) {
    tracing::debug!(path = %path, state = %state, "event state");
}
