//! [`BundleDir`], a temporary directory of archives.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::jar::JarBuilder;

/// A scratch directory standing in for the watched archive directory.
///
/// The root is canonicalized so paths built here match the ones the
/// watcher reports (e.g. `/private/var/...` on macOS).
pub struct BundleDir {
    _temp: TempDir,
    root: PathBuf,
}

impl BundleDir {
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap_or_else(|e| panic!("BundleDir: tempdir failed: {e}"));
        let root = dunce::canonicalize(temp.path())
            .unwrap_or_else(|e| panic!("BundleDir: canonicalize failed: {e}"));
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a file inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write an archive and return its path.
    pub fn write_jar(&self, name: &str, jar: &JarBuilder) -> PathBuf {
        let path = self.file(name);
        jar.write_to(&path);
        path
    }

    /// Write arbitrary bytes and return the path.
    ///
    /// # Panics
    /// Panics if the write fails.
    pub fn write_bytes(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("BundleDir: failed to write {name}: {e}"));
        path
    }

    /// Create a subdirectory and return its path.
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    pub fn subdir(&self, name: &str) -> PathBuf {
        let path = self.file(name);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("BundleDir: failed to create {name}: {e}"));
        path
    }

    /// Delete a file.
    ///
    /// # Panics
    /// Panics if the file cannot be removed.
    pub fn remove(&self, name: &str) {
        fs::remove_file(self.file(name))
            .unwrap_or_else(|e| panic!("BundleDir: failed to remove {name}: {e}"));
    }
}

impl Default for BundleDir {
    fn default() -> Self {
        Self::new()
    }
}
