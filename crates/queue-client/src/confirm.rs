//! Batching of message confirmations into a single confirm event.
//!
//! A consumer confirms many messages in one round trip by adding them to a
//! [`ConfirmEventBuilder`] and handing the resulting blob to the session.
//! The blob is serialized lazily and memoized; every successful addition
//! drops the memoized copy.

use crate::config::ConfirmBuilderConfig;
use crate::error::{ClientError, ConfigurationError, SerializationError};
use crate::message::{Message, MessageConfirmationCookie};
use crate::protocol::{self, confirm_event_size};
use bytes::Bytes;
use tracing::{debug, trace, warn};

/// Accumulates confirmation cookies and serializes them in insertion order
#[derive(Debug, Clone)]
pub struct ConfirmEventBuilder {
    cookies: Vec<MessageConfirmationCookie>,
    cached_blob: Option<Bytes>,
    poisoned: bool,
    config: ConfirmBuilderConfig,
}

impl Default for ConfirmEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmEventBuilder {
    /// Create empty builder allowing the full wire limit of confirmations
    pub fn new() -> Self {
        Self {
            cookies: Vec::new(),
            cached_blob: None,
            poisoned: false,
            config: ConfirmBuilderConfig::default(),
        }
    }

    /// Create empty builder with custom capacity and logging
    pub fn with_config(config: ConfirmBuilderConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Add a confirmation for `message`.
    ///
    /// Fails without modifying the builder if the message has no GUID, no
    /// usable queue identity, or the batch is already full.
    pub fn add_message_confirmation(&mut self, message: &Message) -> Result<(), ClientError> {
        let guid = match message.message_guid() {
            Some(guid) if !guid.is_unset() => guid,
            _ => return Err(self.rejected(ClientError::MissingGuid)),
        };

        match message.queue_id() {
            Some(queue_id) if !queue_id.identity().is_degenerate() => {}
            _ => return Err(self.rejected(ClientError::MissingQueueBinding)),
        }

        self.ensure_room()?;

        // Both presence checks passed, so the cookie always exists here.
        let cookie = message
            .confirmation_cookie()
            .ok_or(ClientError::MissingQueueBinding)?;
        trace!(guid = %guid, "Adding message confirmation");
        self.push(cookie);
        Ok(())
    }

    /// Add a confirmation from a previously extracted cookie
    pub fn add_message_confirmation_with_cookie(
        &mut self,
        cookie: &MessageConfirmationCookie,
    ) -> Result<(), ClientError> {
        if cookie.message_guid().is_unset() {
            return Err(self.rejected(ClientError::MissingGuid));
        }
        if cookie.queue_id().identity().is_degenerate() {
            return Err(self.rejected(ClientError::MissingQueueBinding));
        }

        self.ensure_room()?;

        trace!(guid = %cookie.message_guid(), "Adding message confirmation");
        self.push(cookie.clone());
        Ok(())
    }

    /// Number of confirmations added since creation or the last reset
    pub fn message_count(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Maximum number of confirmations this builder accepts
    pub fn capacity(&self) -> usize {
        self.config.max_confirmations
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity().saturating_sub(self.cookies.len())
    }

    /// Confirmations in the order they were added
    pub fn cookies(&self) -> &[MessageConfirmationCookie] {
        &self.cookies
    }

    /// Size of the blob the current confirmations serialize to
    pub fn blob_size(&self) -> usize {
        confirm_event_size(self.cookies.len())
    }

    /// Check if a serialized blob is memoized for the current confirmations
    pub fn is_cached(&self) -> bool {
        self.cached_blob.is_some()
    }

    /// Serialized confirm event for all confirmations added so far.
    ///
    /// Returns the memoized blob when nothing was added since it was last
    /// built. An encoding failure poisons the builder until [`reset`].
    ///
    /// [`reset`]: ConfirmEventBuilder::reset
    pub fn blob(&mut self) -> Result<Bytes, ClientError> {
        if self.poisoned {
            return Err(SerializationError::Poisoned.into());
        }

        if let Some(blob) = &self.cached_blob {
            return Ok(blob.clone());
        }

        let blob = match protocol::encode_confirm_event(&self.cookies) {
            Ok(buf) => buf.freeze(),
            Err(e) => {
                warn!(
                    error = %e,
                    message_count = self.cookies.len(),
                    "Failed to encode confirm event; builder must be reset"
                );
                self.poisoned = true;
                return Err(e.into());
            }
        };

        debug!(
            message_count = self.cookies.len(),
            size = blob.len(),
            "Built confirm event"
        );
        self.cached_blob = Some(blob.clone());
        Ok(blob)
    }

    /// Discard all confirmations and the memoized blob
    pub fn reset(&mut self) {
        if !self.cookies.is_empty() {
            debug!(
                message_count = self.cookies.len(),
                "Resetting confirm event builder"
            );
        }

        self.cookies.clear();
        self.cached_blob = None;
        self.poisoned = false;
    }

    fn ensure_room(&self) -> Result<(), ClientError> {
        if self.poisoned {
            return Err(self.rejected(SerializationError::Poisoned.into()));
        }
        if self.cookies.len() >= self.capacity() {
            return Err(self.rejected(ClientError::BatchFull {
                capacity: self.capacity(),
            }));
        }
        Ok(())
    }

    fn push(&mut self, cookie: MessageConfirmationCookie) {
        self.cookies.push(cookie);
        self.cached_blob = None;
    }

    fn rejected(&self, error: ClientError) -> ClientError {
        if self.config.log_rejections {
            warn!(
                error = %error,
                message_count = self.cookies.len(),
                "Rejected message confirmation"
            );
        } else {
            debug!(error = %error, "Rejected message confirmation");
        }
        error
    }
}

#[cfg(test)]
#[path = "confirm_tests.rs"]
mod tests;
