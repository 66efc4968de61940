//! Codec configuration, read from TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CodecError, Result};

/// Where exported story files go when no path is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Directory for exported files.
    pub output_dir: PathBuf,

    /// File extension, without the dot.
    pub extension: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            extension: "txt".to_string(),
        }
    }
}

impl TextConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CodecError::FileNotFound(path.to_path_buf()),
            _ => CodecError::Io(e),
        })?;
        tracing::debug!(path = %path.display(), "loaded text codec configuration");
        Self::from_toml_str(&text)
    }

    /// `<output_dir>/<story name>.<extension>`
    pub fn default_export_path(&self, story_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", story_name, self.extension))
    }
}
