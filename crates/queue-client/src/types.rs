//! Value types shared by queue identities, messages and confirmations.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

// ============================================================================
// Correlation Identifiers
// ============================================================================

static NEXT_AUTO_VALUE: AtomicU64 = AtomicU64::new(1);

/// Application-supplied value correlating client state with a queue or message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrelationId {
    /// Caller-chosen integer
    Numeric(i64),
    /// Address of caller-owned state; never dereferenced
    Pointer(usize),
    /// Process-unique value generated by [`CorrelationId::auto_value`]
    AutoValue(u64),
}

impl CorrelationId {
    /// Generate a correlation id unique within this process
    pub fn auto_value() -> Self {
        Self::AutoValue(NEXT_AUTO_VALUE.fetch_add(1, Ordering::Relaxed))
    }

    /// Create correlation id from the address of `ptr`
    pub fn from_pointer<T>(ptr: *const T) -> Self {
        Self::Pointer(ptr as usize)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    pub fn is_auto_value(&self) -> bool {
        matches!(self, Self::AutoValue(_))
    }

    pub fn numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(value) => Some(*value),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<usize> {
        match self {
            Self::Pointer(address) => Some(*address),
            _ => None,
        }
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(f, "[ numeric = {} ]", value),
            Self::Pointer(address) => write!(f, "[ pointer = {:#x} ]", address),
            Self::AutoValue(value) => write!(f, "[ autoValue = {} ]", value),
        }
    }
}

// ============================================================================
// Message GUID
// ============================================================================

/// Length of a message GUID in bytes
pub const MESSAGE_GUID_LENGTH: usize = 16;

/// Broker-assigned globally unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageGuid(#[serde(with = "hex_serde")] [u8; MESSAGE_GUID_LENGTH]);

/// Hex string serialization for GUID bytes
mod hex_serde {
    use super::MESSAGE_GUID_LENGTH;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &[u8; MESSAGE_GUID_LENGTH], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::encode_upper(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; MESSAGE_GUID_LENGTH], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let mut bytes = [0u8; MESSAGE_GUID_LENGTH];
        hex::decode_to_slice(encoded, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(bytes)
    }
}

impl MessageGuid {
    /// The all-zero GUID, never assigned by a broker
    pub const UNSET: Self = Self([0u8; MESSAGE_GUID_LENGTH]);

    pub fn from_bytes(bytes: [u8; MESSAGE_GUID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse GUID from its 32 character hex form
    pub fn from_hex(s: &str) -> Result<Self, ClientError> {
        let mut bytes = [0u8; MESSAGE_GUID_LENGTH];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ClientError::invalid_argument("message_guid", e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; MESSAGE_GUID_LENGTH] {
        &self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0 == [0u8; MESSAGE_GUID_LENGTH]
    }
}

impl fmt::Display for MessageGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for MessageGuid {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Identifier of the subscription a message was delivered through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle {
    id: u32,
    correlation_id: Option<CorrelationId>,
}

impl SubscriptionHandle {
    /// Id of the subscription every queue opened for reading starts with
    pub const DEFAULT_ID: u32 = 0;

    pub fn new(id: u32) -> Self {
        Self {
            id,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ID)
    }
}

// ============================================================================
// Queue URI
// ============================================================================

/// URI scheme accepted for queue addresses
pub const URI_SCHEME: &str = "bmq";

/// Validated queue address of the form `bmq://domain/queue[?id=app]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri(Url);

impl Uri {
    /// Parse and validate queue URI
    pub fn parse(s: &str) -> Result<Self, ClientError> {
        let url = Url::parse(s).map_err(|e| ClientError::invalid_argument("uri", e.to_string()))?;

        if url.scheme() != URI_SCHEME {
            return Err(ClientError::invalid_argument(
                "uri",
                format!("scheme must be '{}'", URI_SCHEME),
            ));
        }

        match url.host_str() {
            Some(domain) if !domain.is_empty() => {}
            _ => return Err(ClientError::invalid_argument("uri", "missing domain")),
        }

        let queue = url.path().trim_start_matches('/');
        if queue.is_empty() || queue.contains('/') {
            return Err(ClientError::invalid_argument(
                "uri",
                "path must be a single queue name",
            ));
        }

        if url.query_pairs().any(|(key, _)| key != "id") {
            return Err(ClientError::invalid_argument(
                "uri",
                "only the 'id' query parameter is allowed",
            ));
        }

        Ok(Self(url))
    }

    pub fn domain(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    pub fn queue(&self) -> &str {
        self.0.path().trim_start_matches('/')
    }

    /// Application id for fan-out queues
    pub fn app_id(&self) -> Option<String> {
        self.0
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
    }

    /// Domain and queue without the app id
    pub fn canonical(&self) -> String {
        format!("{}://{}/{}", URI_SCHEME, self.domain(), self.queue())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Uri {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Uri> for String {
    fn from(uri: Uri) -> Self {
        uri.0.into()
    }
}

// ============================================================================
// Queue Options and Flags
// ============================================================================

/// Consumer flow-control options applied when a queue is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueOptions {
    pub max_unconfirmed_messages: i32,
    pub max_unconfirmed_bytes: i64,
    pub consumer_priority: i32,
    pub suspends_on_bad_host_health: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_unconfirmed_messages: 1000,
            max_unconfirmed_bytes: 32 * 1024 * 1024,
            consumer_priority: 0,
            suspends_on_bad_host_health: false,
        }
    }
}

impl QueueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_unconfirmed_messages(mut self, value: i32) -> Self {
        self.max_unconfirmed_messages = value;
        self
    }

    pub fn with_max_unconfirmed_bytes(mut self, value: i64) -> Self {
        self.max_unconfirmed_bytes = value;
        self
    }

    pub fn with_consumer_priority(mut self, value: i32) -> Self {
        self.consumer_priority = value;
        self
    }

    pub fn with_suspends_on_bad_host_health(mut self, value: bool) -> Self {
        self.suspends_on_bad_host_health = value;
        self
    }
}

/// Mode bits a queue is opened with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueFlags(u64);

impl QueueFlags {
    pub const ADMIN: Self = Self(1 << 0);
    pub const READ: Self = Self(1 << 1);
    pub const WRITE: Self = Self(1 << 2);
    pub const ACK: Self = Self(1 << 3);

    const ALL: u64 = 0b1111;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build flags from raw bits, rejecting unknown bits
    pub fn from_bits(bits: u64) -> Option<Self> {
        if bits & !Self::ALL != 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_reader(&self) -> bool {
        self.contains(Self::READ)
    }

    pub fn is_writer(&self) -> bool {
        self.contains(Self::WRITE)
    }
}

impl std::ops::BitOr for QueueFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for QueueFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for QueueFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::ADMIN, "ADMIN"),
            (Self::READ, "READ"),
            (Self::WRITE, "WRITE"),
            (Self::ACK, "ACK"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();

        write!(f, "{}", names.join(","))
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Payload compression applied by the producer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressionAlgorithmType {
    #[default]
    None,
    Zlib,
}

impl CompressionAlgorithmType {
    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Zlib => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Zlib),
            _ => None,
        }
    }
}

/// Outcome reported by the broker for a published message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckResult {
    Success,
    #[default]
    Unknown,
    Timeout,
    NotConnected,
    Canceled,
    NotSupported,
    Refused,
    InvalidArgument,
    NotReady,
    LimitMessages,
    LimitBytes,
    StorageFailure,
}

impl AckResult {
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Unknown => -1,
            Self::Timeout => -2,
            Self::NotConnected => -3,
            Self::Canceled => -4,
            Self::NotSupported => -5,
            Self::Refused => -6,
            Self::InvalidArgument => -7,
            Self::NotReady => -8,
            Self::LimitMessages => -100,
            Self::LimitBytes => -101,
            Self::StorageFailure => -104,
        }
    }

    /// Map a raw status code; unrecognised codes become `Unknown`
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Success,
            -2 => Self::Timeout,
            -3 => Self::NotConnected,
            -4 => Self::Canceled,
            -5 => Self::NotSupported,
            -6 => Self::Refused,
            -7 => Self::InvalidArgument,
            -8 => Self::NotReady,
            -100 => Self::LimitMessages,
            -101 => Self::LimitBytes,
            -104 => Self::StorageFailure,
            _ => Self::Unknown,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Check if the broker rejected the message for exceeding a queue limit
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Self::LimitMessages | Self::LimitBytes)
    }
}

impl fmt::Display for AckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "SUCCESS",
            Self::Unknown => "UNKNOWN",
            Self::Timeout => "TIMEOUT",
            Self::NotConnected => "NOT_CONNECTED",
            Self::Canceled => "CANCELED",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::Refused => "REFUSED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotReady => "NOT_READY",
            Self::LimitMessages => "LIMIT_MESSAGES",
            Self::LimitBytes => "LIMIT_BYTES",
            Self::StorageFailure => "STORAGE_FAILURE",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// Properties and Groups
// ============================================================================

/// Opaque property bag attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageProperties {
    entries: BTreeMap<String, String>,
}

impl MessageProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn num_properties(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maximum length of a message group id in bytes
pub const MAX_GROUP_ID_LENGTH: usize = 31;

/// Validated message group identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Result<Self, ClientError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ClientError::invalid_argument("group_id", "must not be empty"));
        }
        if id.len() > MAX_GROUP_ID_LENGTH {
            return Err(ClientError::invalid_argument(
                "group_id",
                format!("maximum {} bytes", MAX_GROUP_ID_LENGTH),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
