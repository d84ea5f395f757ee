//! Container archive inspection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bundle_fs::WellKnownPath;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Local file header signature every zip-based container starts with
/// (`PK\x03\x04`, read little-endian).
pub const CONTAINER_MAGIC: u32 = 0x0403_4b50;

/// Sniffs container files and reads their embedded manifest.
#[derive(Debug, Clone)]
pub struct ArchiveInspector {
    manifest_entry: String,
}

impl Default for ArchiveInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveInspector {
    /// Inspector for the conventional `META-INF/MANIFEST.MF` entry.
    pub fn new() -> Self {
        Self::with_manifest_entry(WellKnownPath::ManifestEntry.as_str())
    }

    pub fn with_manifest_entry(entry: impl Into<String>) -> Self {
        Self {
            manifest_entry: entry.into(),
        }
    }

    pub fn manifest_entry(&self) -> &str {
        &self.manifest_entry
    }

    /// Check the first four bytes against [`CONTAINER_MAGIC`].
    ///
    /// Directories, files shorter than four bytes and unreadable files are
    /// not containers. Never fails.
    pub fn is_container_file(&self, path: &Path) -> bool {
        if path.is_dir() {
            return false;
        }
        let Ok(mut file) = File::open(path) else {
            return false;
        };
        let mut magic = [0u8; 4];
        match file.read_exact(&mut magic) {
            Ok(()) => u32::from_le_bytes(magic) == CONTAINER_MAGIC,
            Err(_) => false,
        }
    }

    /// Read the manifest entry as text, or `None` if the file cannot be
    /// opened as a container or has no manifest.
    pub fn read_manifest_entry(&self, path: &Path) -> Option<String> {
        match self.manifest_text(path) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no manifest");
                None
            }
        }
    }

    /// Like [`read_manifest_entry`](Self::read_manifest_entry), reporting
    /// why the manifest could not be read.
    ///
    /// The entry is looked up by exact name first, then case-insensitively.
    pub fn manifest_text(&self, path: &Path) -> Result<String> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|_| Error::NotAContainer {
            path: path.to_path_buf(),
        })?;

        let entry_name = if archive.index_for_name(&self.manifest_entry).is_some() {
            self.manifest_entry.clone()
        } else {
            archive
                .file_names()
                .find(|name| name.eq_ignore_ascii_case(&self.manifest_entry))
                .map(str::to_string)
                .ok_or_else(|| Error::NoManifestEntry {
                    path: path.to_path_buf(),
                    entry: self.manifest_entry.clone(),
                })?
        };

        let mut entry = archive
            .by_name(&entry_name)
            .map_err(|_| Error::NoManifestEntry {
                path: path.to_path_buf(),
                entry: self.manifest_entry.clone(),
            })?;

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
