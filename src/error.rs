//! Error types for Splice.

use thiserror::Error;

/// Library-level error type for Splice operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid corpus: {0}")]
    CorpusLoad(String),

    #[error("Transcoding failed: {0}")]
    Transcode(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Splice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;
