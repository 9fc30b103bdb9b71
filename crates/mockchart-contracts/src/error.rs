//! Error types for the mockchart crates.
//!
//! Generation itself never fails. Errors come from the surfaces around it:
//! configuration, option validation, parsing of user-supplied names and
//! serialization of output.

use thiserror::Error;

/// The unified error type for the mockchart crates.
#[derive(Debug, Error)]
pub enum MockchartError {
    /// A configuration file is missing, unreadable or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Generation options are outside the supported bounds.
    #[error("invalid generation options: {reason}")]
    InvalidOptions { reason: String },

    /// A lab panel name did not match any known panel.
    #[error("unknown lab test type '{name}'")]
    UnknownLabTest { name: String },

    /// A generated value could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// A JSON Schema document could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

impl From<serde_json::Error> for MockchartError {
    fn from(e: serde_json::Error) -> Self {
        MockchartError::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the mockchart crates.
pub type MockchartResult<T> = Result<T, MockchartError>;
