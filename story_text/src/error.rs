//! Error types for the text codec.

use std::path::PathBuf;

use story_graph::StoryError;
use thiserror::Error;

/// Errors from importing, exporting or configuring.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input deviates from the story grammar. No story is produced.
    #[error("Illegal format - {0}")]
    IllegalFormat(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Story(#[from] StoryError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl CodecError {
    pub(crate) fn format(detail: impl Into<String>) -> Self {
        CodecError::IllegalFormat(detail.into())
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
