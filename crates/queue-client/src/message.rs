//! Message types and the confirmation cookies derived from them.

use crate::error::ClientError;
use crate::protocol::MAX_PAYLOAD_SIZE;
use crate::queue_id::QueueId;
use crate::types::{
    AckResult, CompressionAlgorithmType, CorrelationId, GroupId, MessageGuid, MessageProperties,
    SubscriptionHandle,
};
use bytes::Bytes;
use std::sync::Arc;

// ============================================================================
// Message
// ============================================================================

/// A single queue message.
///
/// The payload is held as [`Bytes`], so a message shares the session's buffer
/// through a reference count instead of owning a copy. Cloning a message takes
/// another reference on that buffer; the buffer stays alive for as long as
/// any clone needs it.
#[derive(Debug, Clone, Default)]
pub struct Message {
    data: Option<Bytes>,
    properties: Option<Arc<MessageProperties>>,
    correlation_id: Option<CorrelationId>,
    compression: CompressionAlgorithmType,
    group_id: Option<GroupId>,
    guid: Option<MessageGuid>,
    queue_id: Option<QueueId>,
    subscription_handle: Option<SubscriptionHandle>,
    ack_status: Option<AckResult>,
}

impl Message {
    /// Create empty outbound message
    pub fn new() -> Self {
        Self::default()
    }

    /// Create message delivered to a consumer
    pub fn received(
        queue_id: QueueId,
        guid: MessageGuid,
        subscription_handle: SubscriptionHandle,
    ) -> Self {
        Self {
            queue_id: Some(queue_id),
            guid: Some(guid),
            subscription_handle: Some(subscription_handle),
            ..Self::default()
        }
    }

    /// Create message carrying the broker's acknowledgement of a post
    pub fn acknowledged(
        queue_id: QueueId,
        guid: MessageGuid,
        correlation_id: Option<CorrelationId>,
        status: AckResult,
    ) -> Self {
        Self {
            queue_id: Some(queue_id),
            guid: Some(guid),
            correlation_id,
            ack_status: Some(status),
            ..Self::default()
        }
    }

    /// Add payload, failing on an invalid payload
    pub fn with_data(mut self, data: Bytes) -> Result<Self, ClientError> {
        self.set_data_ref(data)?;
        Ok(self)
    }

    /// Add correlation id
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Add properties
    pub fn with_properties(mut self, properties: Arc<MessageProperties>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Add compression type
    pub fn with_compression(mut self, compression: CompressionAlgorithmType) -> Self {
        self.compression = compression;
        self
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    /// Reference `data` as the payload.
    ///
    /// An empty payload is rejected, as is a payload larger than the protocol
    /// allows. The message is left unchanged on failure.
    pub fn set_data_ref(&mut self, data: Bytes) -> Result<&mut Self, ClientError> {
        if data.is_empty() {
            return Err(ClientError::invalid_argument(
                "payload",
                "must not be empty",
            ));
        }
        if data.len() > MAX_PAYLOAD_SIZE {
            return Err(ClientError::PayloadTooLarge {
                size: data.len(),
                max_size: MAX_PAYLOAD_SIZE,
            });
        }

        self.data = Some(data);
        Ok(self)
    }

    pub fn set_properties_ref(&mut self, properties: Arc<MessageProperties>) -> &mut Self {
        self.properties = Some(properties);
        self
    }

    pub fn clear_properties_ref(&mut self) -> &mut Self {
        self.properties = None;
        self
    }

    pub fn set_correlation_id(&mut self, correlation_id: CorrelationId) -> &mut Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn set_compression_algorithm_type(
        &mut self,
        compression: CompressionAlgorithmType,
    ) -> &mut Self {
        self.compression = compression;
        self
    }

    /// Set group id; rejects empty ids and ids over the maximum length
    pub fn set_group_id(&mut self, group_id: &str) -> Result<&mut Self, ClientError> {
        self.group_id = Some(GroupId::new(group_id)?);
        Ok(self)
    }

    pub fn clear_group_id(&mut self) -> &mut Self {
        self.group_id = None;
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn queue_id(&self) -> Option<&QueueId> {
        self.queue_id.as_ref()
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    pub fn subscription_handle(&self) -> Option<&SubscriptionHandle> {
        self.subscription_handle.as_ref()
    }

    pub fn compression_algorithm_type(&self) -> CompressionAlgorithmType {
        self.compression
    }

    pub fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    pub fn message_guid(&self) -> Option<&MessageGuid> {
        self.guid.as_ref()
    }

    /// Derive the cookie used to confirm this message.
    ///
    /// Requires a queue id and a GUID. Messages delivered without a
    /// subscription handle are confirmed against the default subscription.
    pub fn confirmation_cookie(&self) -> Option<MessageConfirmationCookie> {
        let queue_id = self.queue_id.as_ref()?;
        let guid = self.guid?;
        let subscription_handle = self.subscription_handle.unwrap_or_default();

        Some(MessageConfirmationCookie::new(
            queue_id.clone(),
            guid,
            subscription_handle,
        ))
    }

    /// Ack outcome for a posted message; `Unknown` until the broker replies
    pub fn ack_status(&self) -> AckResult {
        self.ack_status.unwrap_or_default()
    }

    /// Borrow the payload, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Get another reference to the payload buffer
    pub fn data_ref(&self) -> Option<Bytes> {
        self.data.clone()
    }

    pub fn data_size(&self) -> usize {
        self.data.as_ref().map_or(0, Bytes::len)
    }

    pub fn has_properties(&self) -> bool {
        self.properties.is_some()
    }

    pub fn properties(&self) -> Option<&MessageProperties> {
        self.properties.as_deref()
    }

    /// Copy the properties out of the message
    pub fn load_properties(&self) -> Option<MessageProperties> {
        self.properties.as_deref().cloned()
    }

    pub fn has_group_id(&self) -> bool {
        self.group_id.is_some()
    }
}

// ============================================================================
// Confirmation Cookie
// ============================================================================

/// Everything needed to confirm one message: queue, GUID and subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageConfirmationCookie {
    queue_id: QueueId,
    guid: MessageGuid,
    subscription_handle: SubscriptionHandle,
}

impl MessageConfirmationCookie {
    pub fn new(
        queue_id: QueueId,
        guid: MessageGuid,
        subscription_handle: SubscriptionHandle,
    ) -> Self {
        Self {
            queue_id,
            guid,
            subscription_handle,
        }
    }

    pub fn queue_id(&self) -> &QueueId {
        &self.queue_id
    }

    pub fn message_guid(&self) -> &MessageGuid {
        &self.guid
    }

    pub fn subscription_handle(&self) -> &SubscriptionHandle {
        &self.subscription_handle
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
