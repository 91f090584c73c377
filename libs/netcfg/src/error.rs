//! Error types for configuration handling.

use netres_events::{ConfigClass, EventError};
use thiserror::Error;

/// Errors that can occur when reading, validating or storing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not a JSON object.
    #[error("{class} configuration must be a JSON object")]
    NotAnObject { class: ConfigClass },

    /// The subject kind does not match the configuration class.
    #[error("{class} configuration cannot be attached to {subject}")]
    WrongSubject { class: ConfigClass, subject: String },

    /// The document failed its validity check.
    #[error("invalid {class} configuration for {subject}")]
    Invalid { class: ConfigClass, subject: String },

    /// The configuration class is not registered.
    #[error("unknown configuration class: {0}")]
    UnknownClass(String),

    /// A subject key could not be parsed.
    #[error(transparent)]
    InvalidSubject(#[from] EventError),

    /// The network-config document has the wrong shape.
    #[error("malformed network configuration: {0}")]
    Document(String),

    /// JSON decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a network-config file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
