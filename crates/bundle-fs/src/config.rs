//! Format-agnostic document loading and saving

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, LockPolicy, NormalizedPath, Result, io};

/// Serialization format, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Toml,
    Json,
    Yaml,
}

impl StoreFormat {
    /// Detect the format from a path's extension.
    ///
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Format-agnostic document store.
///
/// Detects the format from the file extension and handles
/// serialization/deserialization transparently. Saves are atomic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore {
    lock_policy: LockPolicy,
}

impl ConfigStore {
    /// Create a store that waits for the write lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a custom lock policy.
    pub fn with_lock_policy(lock_policy: LockPolicy) -> Self {
        Self { lock_policy }
    }

    /// Load a document from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = StoreFormat::from_path(path)?;
        let content = io::read_text(path)?;
        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.label().into(),
            message,
        };

        match format {
            StoreFormat::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            StoreFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))
            }
            StoreFormat::Yaml => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }

    /// Serialize a value into the text form of `format`.
    pub fn render<T: Serialize>(
        &self,
        path: &NormalizedPath,
        format: StoreFormat,
        value: &T,
    ) -> Result<String> {
        let serialize_error = |message: String| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.label().into(),
            message,
        };

        match format {
            StoreFormat::Toml => {
                toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
            }
            StoreFormat::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
            }
            StoreFormat::Yaml => {
                serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))
            }
        }
    }

    /// Save a document to a file, replacing it atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = StoreFormat::from_path(path)?;
        let content = self.render(path, format, value)?;
        tracing::debug!(path = %path, format = format.label(), "writing document");
        io::write_atomic(path, content.as_bytes(), self.lock_policy)
    }
}
