//! Queue identity and binding metadata.
//!
//! A [`QueueId`] names a queue from the application's point of view. Its
//! identity is chosen once, at construction, and is one of three forms (see
//! [`QueueIdentity`]). The uri, options and flags describing the opened queue
//! are attached by the session when an open succeeds and travel together as a
//! single [`QueueBinding`].

use crate::types::{CorrelationId, QueueFlags, QueueOptions, Uri};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The canonical identity form of a queue id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueIdentity {
    CorrelationId(CorrelationId),
    Numeric(i64),
    Pointer(usize),
}

impl QueueIdentity {
    /// A null pointer identity cannot name a queue
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Pointer(0) => true,
            Self::CorrelationId(CorrelationId::Pointer(0)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for QueueIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorrelationId(correlation_id) => write!(f, "{}", correlation_id),
            Self::Numeric(value) => write!(f, "[ numeric = {} ]", value),
            Self::Pointer(address) => write!(f, "[ pointer = {:#x} ]", address),
        }
    }
}

/// Metadata describing an opened queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueBinding {
    pub uri: Uri,
    pub options: QueueOptions,
    pub flags: QueueFlags,
}

/// Identity of a queue plus, once opened, its binding metadata.
///
/// Clones share one binding.
#[derive(Debug, Clone)]
pub struct QueueId {
    identity: QueueIdentity,
    binding: Option<Arc<QueueBinding>>,
}

impl QueueId {
    /// Create unbound queue id identified by a correlation id
    pub fn from_correlation_id(correlation_id: CorrelationId) -> Self {
        Self::from_identity(QueueIdentity::CorrelationId(correlation_id))
    }

    /// Create unbound queue id identified by a numeric handle
    pub fn from_numeric(numeric: i64) -> Self {
        Self::from_identity(QueueIdentity::Numeric(numeric))
    }

    /// Create unbound queue id identified by the address of caller-owned state.
    ///
    /// The pointer is only used as an identity and is never dereferenced.
    pub fn from_pointer<T>(ptr: *const T) -> Self {
        Self::from_identity(QueueIdentity::Pointer(ptr as usize))
    }

    pub fn from_identity(identity: QueueIdentity) -> Self {
        Self {
            identity,
            binding: None,
        }
    }

    pub fn identity(&self) -> &QueueIdentity {
        &self.identity
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        match &self.identity {
            QueueIdentity::CorrelationId(correlation_id) => Some(correlation_id),
            _ => None,
        }
    }

    pub fn numeric(&self) -> Option<i64> {
        match self.identity {
            QueueIdentity::Numeric(value) => Some(value),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<usize> {
        match self.identity {
            QueueIdentity::Pointer(address) => Some(address),
            _ => None,
        }
    }

    /// Flags the queue was opened with, empty when unbound
    pub fn flags(&self) -> QueueFlags {
        self.binding
            .as_ref()
            .map(|binding| binding.flags)
            .unwrap_or_default()
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.binding.as_ref().map(|binding| &binding.uri)
    }

    pub fn options(&self) -> Option<&QueueOptions> {
        self.binding.as_ref().map(|binding| &binding.options)
    }

    pub fn binding(&self) -> Option<&QueueBinding> {
        self.binding.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Check if this id names an opened queue with a usable identity
    pub fn is_valid(&self) -> bool {
        self.is_bound() && !self.identity.is_degenerate()
    }

    /// Attach the metadata of a successfully opened queue
    pub fn bind(&mut self, uri: Uri, options: QueueOptions, flags: QueueFlags) {
        self.bind_shared(Arc::new(QueueBinding {
            uri,
            options,
            flags,
        }));
    }

    /// Attach binding metadata already held elsewhere
    pub fn bind_shared(&mut self, binding: Arc<QueueBinding>) {
        self.binding = Some(binding);
    }

    /// Drop binding metadata after the queue is closed
    pub fn unbind(&mut self) -> Option<Arc<QueueBinding>> {
        self.binding.take()
    }
}

impl PartialEq for QueueId {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for QueueId {}

impl Hash for QueueId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            Some(binding) => write!(
                f,
                "[ identity = {} uri = {} flags = \"{}\" ]",
                self.identity, binding.uri, binding.flags
            ),
            None => write!(f, "[ identity = {} ]", self.identity),
        }
    }
}

#[cfg(test)]
#[path = "queue_id_tests.rs"]
mod tests;
