//! Error types for vigil

use thiserror::Error;

/// Main error type for vigil
#[derive(Error, Debug)]
pub enum VigilError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Probe error
    #[error("Probe error: {0}")]
    Probe(String),

    /// API error
    #[error("API error: {0}")]
    Api(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for vigil operations
pub type VigilResult<T> = Result<T, VigilError>;

impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        VigilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VigilError {
    fn from(err: toml::de::Error) -> Self {
        VigilError::Config(err.to_string())
    }
}
