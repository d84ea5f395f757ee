//! Atomic I/O operations with advisory file locking

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// How `write_atomic` behaves when another writer holds the target's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPolicy {
    /// Wait until the lock is released.
    #[default]
    Block,
    /// Fail immediately with [`Error::LockFailed`].
    Fail,
}

/// Result of probing whether a file can be read right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readability {
    /// The path does not exist.
    Missing,
    /// The path is a directory, not a file.
    Directory,
    /// The file can be opened and no writer holds an exclusive lock on it.
    Readable,
    /// The file exists but cannot be read at the moment.
    Locked,
}

/// Write content atomically to a file.
///
/// Writers serialize on an advisory lock held on a `<file>.lock` sidecar,
/// then write to a temp file in the same directory and rename it over the
/// target, so readers only ever observe the old or the new content.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], policy: LockPolicy) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file_name = native_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let lock_path = native_path.with_file_name(format!("{file_name}.lock"));
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| Error::io(&lock_path, e))?;

    let locked = match policy {
        LockPolicy::Block => lock_file.lock_exclusive(),
        LockPolicy::Fail => lock_file.try_lock_exclusive(),
    };
    locked.map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    let temp_path = native_path.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let written = write_and_sync(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    // Lock released when lock_file is dropped
    let _ = lock_file.unlock();
    written
}

fn write_and_sync(temp_path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Probe whether a file is currently readable.
///
/// A file is considered locked when it cannot be opened for reading, or
/// when a non-blocking shared advisory lock cannot be taken because a
/// writer holds an exclusive one. Never fails: every outcome is a variant.
pub fn probe_readable(path: &Path) -> Readability {
    match fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => return Readability::Missing,
        Err(_) => return Readability::Locked,
        Ok(meta) if meta.is_dir() => return Readability::Directory,
        Ok(_) => {}
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Readability::Missing,
        Err(_) => return Readability::Locked,
    };

    match file.try_lock_shared() {
        Ok(()) => {
            let _ = file.unlock();
            Readability::Readable
        }
        Err(_) => Readability::Locked,
    }
}
