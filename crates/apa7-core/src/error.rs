//! Error types for the formatting engine

use apa7_ooxml::OoxmlError;
use thiserror::Error;

/// Errors that can occur while formatting a document
#[derive(Error, Debug)]
pub enum FormatError {
    /// The document container or one of its parts could not be read or written
    #[error("Document error: {0}")]
    Ooxml(#[from] OoxmlError),

    /// Error reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`FormatConfig`](crate::FormatConfig)
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// The format report could not be serialized
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    /// Configuration parsed but holds an unusable value
    #[error("Invalid configuration: {0}")]
    ConfigValue(String),
}

/// Result type for formatting operations
pub type Result<T> = std::result::Result<T, FormatError>;
