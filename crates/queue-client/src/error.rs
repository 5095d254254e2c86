//! Error types for message, queue and confirmation operations.

use thiserror::Error;

/// Comprehensive error type for all client-side queue operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid argument for {field}: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("Message has no GUID")]
    MissingGuid,

    #[error("Message is not bound to a queue")]
    MissingQueueBinding,

    #[error("Confirmation batch is full ({capacity} messages)")]
    BatchFull { capacity: usize },

    #[error("Payload too large: {size} bytes (max: {max_size})")]
    PayloadTooLarge { size: usize, max_size: usize },

    #[error("Queue is not open: {queue}")]
    QueueNotOpen { queue: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ClientError {
    /// Check if the caller can recover by skipping the input or resetting the builder
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidArgument { .. } => true,
            Self::MissingGuid => true,
            Self::MissingQueueBinding => true,
            Self::BatchFull { .. } => true,
            Self::PayloadTooLarge { .. } => true,
            Self::QueueNotOpen { .. } => true,
            Self::Serialization(_) => true, // after reset()
            Self::Configuration(_) => false,
        }
    }

    pub(crate) fn invalid_argument(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors while encoding or decoding a confirmation blob
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Blob truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Blob length mismatch: header says {declared} bytes, blob has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Unsupported protocol version {0}")]
    UnsupportedVersion(u8),

    #[error("Unexpected event type {0}")]
    UnexpectedEventType(u8),

    #[error("Fragmented events are not supported")]
    Fragmented,

    #[error("Invalid header layout: {message}")]
    InvalidHeader { message: String },

    #[error("Unknown queue identity kind {0}")]
    UnknownIdentityKind(u8),

    #[error("Event exceeds size limit: {size} bytes (max: {max_size})")]
    EventTooLarge { size: usize, max_size: usize },

    #[error("Builder is poisoned by a previous encoding failure; reset it")]
    Poisoned,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
