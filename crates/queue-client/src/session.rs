//! Boundary with the session layer.
//!
//! The session opens queues, delivers messages and transmits confirm events.
//! The [`Session`] trait is the contract the rest of this crate relies on;
//! [`InMemorySession`] implements it without a broker for tests and tools.

use crate::confirm::ConfirmEventBuilder;
use crate::error::ClientError;
use crate::message::Message;
use crate::open_queue::{OpenQueueResult, OpenQueueStatus};
use crate::protocol::{ConfirmBlob, ConfirmRecord};
use crate::queue_id::{QueueBinding, QueueId, QueueIdentity};
use crate::types::{MessageGuid, QueueFlags, QueueOptions, SubscriptionHandle, Uri};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Operations the core expects from a session
#[async_trait]
pub trait Session: Send + Sync {
    /// Open the queue at `uri`, binding `queue_id` on success
    async fn open_queue(
        &self,
        queue_id: &mut QueueId,
        uri: &str,
        flags: QueueFlags,
        options: QueueOptions,
    ) -> OpenQueueStatus;

    /// Close an open queue and unbind `queue_id`
    async fn close_queue(&self, queue_id: &mut QueueId) -> Result<(), ClientError>;

    /// Next delivered message, if any
    async fn next_message(&self) -> Option<Message>;

    /// Transmit the builder's blob and reset the builder.
    ///
    /// Returns the number of confirmations sent. The builder is left intact
    /// when transmission fails.
    async fn confirm_messages(&self, builder: &mut ConfirmEventBuilder)
        -> Result<usize, ClientError>;
}

// ============================================================================
// In-Memory Session
// ============================================================================

/// First GUID byte for GUIDs minted by the in-memory session
const GUID_MARKER: u8 = 0x40;

#[derive(Default)]
struct SessionState {
    open_queues: HashMap<QueueIdentity, Arc<QueueBinding>>,
    pending: VecDeque<Message>,
    confirmed: Vec<ConfirmRecord>,
    transmitted: Vec<Bytes>,
    next_guid: u64,
}

impl SessionState {
    fn mint_guid(&mut self) -> MessageGuid {
        self.next_guid += 1;
        let mut bytes = [0u8; 16];
        bytes[0] = GUID_MARKER;
        bytes[8..].copy_from_slice(&self.next_guid.to_be_bytes());
        MessageGuid::from_bytes(bytes)
    }
}

/// Broker-less session keeping all state in memory
#[derive(Clone, Default)]
pub struct InMemorySession {
    state: Arc<RwLock<SessionState>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message on an open queue as if the broker delivered it
    pub async fn deliver(
        &self,
        queue_id: &QueueId,
        payload: Bytes,
    ) -> Result<MessageGuid, ClientError> {
        let mut state = self.state.write().await;

        let binding = state
            .open_queues
            .get(queue_id.identity())
            .cloned()
            .ok_or_else(|| ClientError::QueueNotOpen {
                queue: queue_id.to_string(),
            })?;
        if !binding.flags.is_reader() {
            return Err(ClientError::invalid_argument(
                "queue_id",
                "queue was not opened for reading",
            ));
        }

        let mut bound = queue_id.clone();
        bound.bind_shared(binding);

        let guid = state.mint_guid();
        let message =
            Message::received(bound, guid, SubscriptionHandle::default()).with_data(payload)?;
        state.pending.push_back(message);

        debug!(guid = %guid, "Delivered message");
        Ok(guid)
    }

    /// GUIDs of every confirmation transmitted so far, in order
    pub async fn confirmed_guids(&self) -> Vec<MessageGuid> {
        self.state
            .read()
            .await
            .confirmed
            .iter()
            .map(|record| record.message_guid)
            .collect()
    }

    /// Every confirm event transmitted so far
    pub async fn transmitted_blobs(&self) -> Vec<Bytes> {
        self.state.read().await.transmitted.clone()
    }

    pub async fn is_open(&self, queue_id: &QueueId) -> bool {
        self.state
            .read()
            .await
            .open_queues
            .contains_key(queue_id.identity())
    }

    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }
}

#[async_trait]
impl Session for InMemorySession {
    async fn open_queue(
        &self,
        queue_id: &mut QueueId,
        uri: &str,
        flags: QueueFlags,
        options: QueueOptions,
    ) -> OpenQueueStatus {
        let uri = match Uri::parse(uri) {
            Ok(uri) => uri,
            Err(e) => {
                warn!(uri = %uri, error = %e, "Rejected open-queue request");
                return OpenQueueStatus::failure(
                    queue_id.clone(),
                    OpenQueueResult::InvalidUri,
                    e.to_string(),
                );
            }
        };

        if !flags.is_reader() && !flags.is_writer() {
            return OpenQueueStatus::failure(
                queue_id.clone(),
                OpenQueueResult::InvalidFlags,
                format!("flags '{}' include neither READ nor WRITE", flags),
            );
        }

        if queue_id.identity().is_degenerate() {
            return OpenQueueStatus::failure(
                queue_id.clone(),
                OpenQueueResult::InvalidArgument,
                "queue id has a null identity",
            );
        }

        let mut state = self.state.write().await;
        if let Some(existing) = state.open_queues.get(queue_id.identity()) {
            let (result, description) = if existing.uri == uri {
                (OpenQueueResult::AlreadyOpened, "queue is already open")
            } else {
                (
                    OpenQueueResult::CorrelationIdNotUnique,
                    "queue id is already used by another queue",
                )
            };
            return OpenQueueStatus::failure(queue_id.clone(), result, description);
        }

        let binding = Arc::new(QueueBinding {
            uri,
            options,
            flags,
        });
        queue_id.bind_shared(Arc::clone(&binding));
        state.open_queues.insert(*queue_id.identity(), binding);

        info!(queue = %queue_id, "Opened queue");
        OpenQueueStatus::success(queue_id.clone())
    }

    async fn close_queue(&self, queue_id: &mut QueueId) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        if state.open_queues.remove(queue_id.identity()).is_none() {
            return Err(ClientError::QueueNotOpen {
                queue: queue_id.to_string(),
            });
        }

        let identity = *queue_id.identity();
        state
            .pending
            .retain(|message| message.queue_id().map(QueueId::identity) != Some(&identity));
        queue_id.unbind();

        info!(queue = %queue_id, "Closed queue");
        Ok(())
    }

    async fn next_message(&self) -> Option<Message> {
        self.state.write().await.pending.pop_front()
    }

    async fn confirm_messages(
        &self,
        builder: &mut ConfirmEventBuilder,
    ) -> Result<usize, ClientError> {
        if builder.is_empty() {
            return Ok(0);
        }

        let blob = builder.blob()?;
        let decoded = ConfirmBlob::decode(&blob)?;

        let mut state = self.state.write().await;
        if let Some(record) = decoded
            .records
            .iter()
            .find(|record| !state.open_queues.contains_key(&record.queue_identity()))
        {
            return Err(ClientError::QueueNotOpen {
                queue: record.queue_identity().to_string(),
            });
        }

        let count = decoded.len();
        state.confirmed.extend(decoded.records);
        state.transmitted.push(blob);
        drop(state);

        builder.reset();
        debug!(message_count = count, "Transmitted confirm event");
        Ok(count)
    }
}
