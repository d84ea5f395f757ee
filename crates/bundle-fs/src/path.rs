//! Archive paths as registry keys

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// An archive path in a single canonical spelling.
///
/// Separators are stored as `/` whatever the platform, so that
/// `C:\bundles\a.jar` and `C:/bundles/a.jar` key the same registry entry
/// and render the same way in the catalog. [`to_native`](Self::to_native)
/// converts back for I/O.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    text: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            text: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Resolve the path against the filesystem.
    ///
    /// Goes through `dunce` so Windows paths keep their plain drive-letter
    /// form and match what the notification backend reports.
    pub fn canonicalize(&self) -> Result<Self> {
        let native = self.to_native();
        match dunce::canonicalize(&native) {
            Ok(resolved) => Ok(Self::new(resolved)),
            Err(e) => Err(Error::io(native, e)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.text)
    }

    /// Last non-empty segment.
    pub fn file_name(&self) -> Option<&str> {
        self.text
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
    }

    /// Text after the last `.` of the file name; dot-files have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(dot) => Some(&name[dot + 1..]),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.text)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for NormalizedPath {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}
