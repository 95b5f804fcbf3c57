//! # Error Types
//!
//! This module defines error types used throughout the qrbill library.

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T, E = QrBillError> = std::result::Result<T, E>;

/// Main error type for qrbill operations
#[derive(Debug, Error)]
pub enum QrBillError {
    /// Malformed render parameters (zero grid size, unknown color without fallback)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reference string has the wrong shape
    #[error("Format error: {0}")]
    Format(String),

    /// Reference string is well-formed but its check digits are wrong
    #[error("Checksum error: {0}")]
    Checksum(String),

    /// Payment record field violation (first failing field wins)
    #[error("Invalid field {field}: {message}")]
    Validation { field: String, message: String },

    /// Validated content does not fit into the fixed bill area
    #[error("Layout overflow: {0}")]
    LayoutOverflow(String),

    /// The external QR/barcode encoder rejected the input
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Preview rasterization error
    #[error("Preview error: {0}")]
    Preview(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QrBillError {
    /// Build a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field of a validation error, if this is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
