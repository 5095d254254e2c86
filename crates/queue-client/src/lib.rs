//! # Queue Client
//!
//! Message model and confirmation batching for queue consumers and producers.
//!
//! This library provides:
//! - Queue identities that bind to a URI, options and flags once opened
//! - Messages carrying payload, properties and delivery metadata
//! - Confirmation cookies detached from the message they came from
//! - A builder that batches confirmations into one binary confirm event
//! - Open-queue results as reported by the session
//!
//! ## Module Organization
//!
//! - [error] - Error types for all client operations
//! - [types] - Identifiers, flags, options and other value types
//! - [queue_id] - Queue identity and binding
//! - [message] - Messages and confirmation cookies
//! - [protocol] - Wire layout of the confirm event
//! - [confirm] - Confirm event builder
//! - [open_queue] - Open-queue status
//! - [config] - Builder configuration loading
//! - [session] - Session boundary and in-memory session

// Module declarations
pub mod config;
pub mod confirm;
pub mod error;
pub mod message;
pub mod open_queue;
pub mod protocol;
pub mod queue_id;
pub mod session;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use config::ConfirmBuilderConfig;
pub use confirm::ConfirmEventBuilder;
pub use error::{ClientError, ConfigurationError, SerializationError};
pub use message::{Message, MessageConfirmationCookie};
pub use open_queue::{OpenQueueResult, OpenQueueStatus};
pub use protocol::{ConfirmBlob, ConfirmRecord, MAX_CONFIRMATIONS_PER_BATCH};
pub use queue_id::{QueueBinding, QueueId, QueueIdentity};
pub use session::{InMemorySession, Session};
pub use types::{
    AckResult, CompressionAlgorithmType, CorrelationId, GroupId, MessageGuid, MessageProperties,
    QueueFlags, QueueOptions, SubscriptionHandle, Uri,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
