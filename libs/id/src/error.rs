//! Error types for identifier parsing.

use thiserror::Error;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("identifier cannot be empty")]
    Empty,

    /// A required separator is missing.
    #[error("missing '{separator}' separator in '{input}'")]
    MissingSeparator { separator: char, input: String },

    /// The device scheme or scheme-specific part is empty.
    #[error("invalid device id '{0}': expected scheme:identifier")]
    InvalidDevice(String),

    /// The port number is not an unsigned integer.
    #[error("invalid port number '{0}'")]
    InvalidPort(String),

    /// The MAC address is not six colon-separated hex octets.
    #[error("invalid MAC address '{0}'")]
    InvalidMac(String),

    /// The identifier format is invalid.
    #[error("invalid identifier format: {message}")]
    InvalidFormat { message: String },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }
}
