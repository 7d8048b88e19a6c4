//! Error types for markdown to ADF conversion.

use std::io;
use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid TOML or has unknown values.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A markdown construct that has no ADF rendering was found and the
    /// configured policy rejects it.
    #[error("Unsupported markdown construct '{construct}' at byte {offset}")]
    Unsupported {
        construct: &'static str,
        offset: usize,
    },

    /// A markdown node reached the transformer without a type mapping.
    #[error("No ADF mapping for markdown node '{kind}' at byte {offset}")]
    UnmappedNode { kind: &'static str, offset: usize },

    /// The transformer's block stack went out of balance.
    #[error("Internal conversion error: {0}")]
    Internal(String),

    /// Error while rendering the document to JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
