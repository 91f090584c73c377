//! Error types for event handling.

use thiserror::Error;

/// Errors that can occur when decoding events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The change type is unknown.
    #[error("unknown change type: {0}")]
    UnknownChangeType(String),

    /// The subject string could not be interpreted.
    #[error("invalid subject '{subject}': {reason}")]
    InvalidSubject { subject: String, reason: String },
}
