//! Error types for booking operations.

use thiserror::Error;

/// Errors that can occur while handling a booking.
///
/// Validation failures are not errors in this sense; they are reported through
/// [`crate::validate::ValidationError`] and never reach storage.
#[derive(Error, Debug)]
pub enum BookingError {
    /// The key-value backend refused a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A page element the form handler relies on is not present.
    #[error("required page element '{0}' is missing")]
    MissingElement(&'static str),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// The confirmation service reported a failure.
    #[error("confirmation failed: {0}")]
    Confirmation(String),
}

/// A specialized Result type for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

impl BookingError {
    /// Create a new storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a new configuration validation error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Json(_))
    }
}
