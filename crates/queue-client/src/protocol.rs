//! Confirm event wire format.
//!
//! A confirm event is an 8 byte event header, a 4 byte confirm header and
//! one fixed-size 32 byte record per confirmed message. All integers are big
//! endian.
//!
//! ```text
//! event header   | length:u32 (bit 31 = fragment) | ver:2 type:6 | hdr words | type specific | reserved |
//! confirm header | hdr words:4 record words:4 | reserved:24 |
//! record         | kind:u8 | reserved:24 | subscription id:u32 | identity:u64 | guid:16 bytes |
//! ```
//!
//! Records carry no reference to their neighbours and can be decoded alone.

use crate::error::SerializationError;
use crate::message::MessageConfirmationCookie;
use crate::queue_id::QueueIdentity;
use crate::types::{CorrelationId, MessageGuid, MESSAGE_GUID_LENGTH};
use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u8 = 1;
pub const EVENT_TYPE_CONFIRM: u8 = 4;

pub const WORD_SIZE: usize = 4;
pub const EVENT_HEADER_SIZE: usize = 8;
pub const CONFIRM_HEADER_SIZE: usize = 4;
pub const CONFIRM_RECORD_SIZE: usize = 32;

/// Size of the blob produced for an empty batch
pub const EMPTY_CONFIRM_EVENT_SIZE: usize = EVENT_HEADER_SIZE + CONFIRM_HEADER_SIZE;

/// Largest event the broker accepts
pub const MAX_EVENT_SIZE: usize = 64 * 1024 * 1024;

/// Largest payload a single message may reference
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Number of records that fit in one confirm event
pub const MAX_CONFIRMATIONS_PER_BATCH: usize =
    (MAX_EVENT_SIZE - EMPTY_CONFIRM_EVENT_SIZE) / CONFIRM_RECORD_SIZE;

const FRAGMENT_BIT: u32 = 1 << 31;
const LENGTH_MASK: u32 = !FRAGMENT_BIT;

/// Size in bytes of a confirm event holding `count` records
pub const fn confirm_event_size(count: usize) -> usize {
    EMPTY_CONFIRM_EVENT_SIZE + count * CONFIRM_RECORD_SIZE
}

// ============================================================================
// Identity Encoding
// ============================================================================

/// How a record's 8 byte identity value is to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    CorrelationNumeric,
    CorrelationPointer,
    CorrelationAutoValue,
    Numeric,
    Pointer,
}

impl IdentityKind {
    pub fn code(&self) -> u8 {
        match self {
            Self::CorrelationNumeric => 1,
            Self::CorrelationPointer => 2,
            Self::CorrelationAutoValue => 3,
            Self::Numeric => 4,
            Self::Pointer => 5,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, SerializationError> {
        match code {
            1 => Ok(Self::CorrelationNumeric),
            2 => Ok(Self::CorrelationPointer),
            3 => Ok(Self::CorrelationAutoValue),
            4 => Ok(Self::Numeric),
            5 => Ok(Self::Pointer),
            other => Err(SerializationError::UnknownIdentityKind(other)),
        }
    }
}

/// Split a queue identity into its wire kind and raw value
pub fn encode_identity(identity: &QueueIdentity) -> (IdentityKind, u64) {
    match identity {
        QueueIdentity::CorrelationId(CorrelationId::Numeric(value)) => {
            (IdentityKind::CorrelationNumeric, *value as u64)
        }
        QueueIdentity::CorrelationId(CorrelationId::Pointer(address)) => {
            (IdentityKind::CorrelationPointer, *address as u64)
        }
        QueueIdentity::CorrelationId(CorrelationId::AutoValue(value)) => {
            (IdentityKind::CorrelationAutoValue, *value)
        }
        QueueIdentity::Numeric(value) => (IdentityKind::Numeric, *value as u64),
        QueueIdentity::Pointer(address) => (IdentityKind::Pointer, *address as u64),
    }
}

/// Rebuild a queue identity from its wire kind and raw value
pub fn decode_identity(kind: IdentityKind, value: u64) -> QueueIdentity {
    match kind {
        IdentityKind::CorrelationNumeric => {
            QueueIdentity::CorrelationId(CorrelationId::Numeric(value as i64))
        }
        IdentityKind::CorrelationPointer => {
            QueueIdentity::CorrelationId(CorrelationId::Pointer(value as usize))
        }
        IdentityKind::CorrelationAutoValue => {
            QueueIdentity::CorrelationId(CorrelationId::AutoValue(value))
        }
        IdentityKind::Numeric => QueueIdentity::Numeric(value as i64),
        IdentityKind::Pointer => QueueIdentity::Pointer(value as usize),
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Serialize `cookies` into a complete confirm event, in order
pub fn encode_confirm_event(
    cookies: &[MessageConfirmationCookie],
) -> Result<BytesMut, SerializationError> {
    let size = confirm_event_size(cookies.len());
    if size > MAX_EVENT_SIZE {
        return Err(SerializationError::EventTooLarge {
            size,
            max_size: MAX_EVENT_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(size);
    put_event_header(&mut buf, size)?;
    put_confirm_header(&mut buf);
    for cookie in cookies {
        put_confirm_record(&mut buf, cookie);
    }

    if buf.len() != size {
        return Err(SerializationError::LengthMismatch {
            declared: size,
            actual: buf.len(),
        });
    }

    Ok(buf)
}

fn put_event_header(buf: &mut BytesMut, size: usize) -> Result<(), SerializationError> {
    let length = u32::try_from(size)
        .ok()
        .filter(|length| length & FRAGMENT_BIT == 0)
        .ok_or(SerializationError::EventTooLarge {
            size,
            max_size: MAX_EVENT_SIZE,
        })?;

    buf.put_u32(length);
    buf.put_u8((PROTOCOL_VERSION << 6) | EVENT_TYPE_CONFIRM);
    buf.put_u8((EVENT_HEADER_SIZE / WORD_SIZE) as u8);
    buf.put_u8(0);
    buf.put_u8(0);
    Ok(())
}

fn put_confirm_header(buf: &mut BytesMut) {
    let header_words = (CONFIRM_HEADER_SIZE / WORD_SIZE) as u8;
    let record_words = (CONFIRM_RECORD_SIZE / WORD_SIZE) as u8;
    buf.put_u8((header_words << 4) | record_words);
    buf.put_bytes(0, 3);
}

fn put_confirm_record(buf: &mut BytesMut, cookie: &MessageConfirmationCookie) {
    let (kind, value) = encode_identity(cookie.queue_id().identity());
    buf.put_u8(kind.code());
    buf.put_bytes(0, 3);
    buf.put_u32(cookie.subscription_handle().id());
    buf.put_u64(value);
    buf.put_slice(cookie.message_guid().as_bytes());
}

// ============================================================================
// Decoding
// ============================================================================

/// One decoded confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRecord {
    pub identity_kind: IdentityKind,
    pub identity_value: u64,
    pub subscription_id: u32,
    pub message_guid: MessageGuid,
}

impl ConfirmRecord {
    /// Decode a single record from exactly [`CONFIRM_RECORD_SIZE`] bytes
    pub fn decode(mut bytes: &[u8]) -> Result<Self, SerializationError> {
        if bytes.len() < CONFIRM_RECORD_SIZE {
            return Err(SerializationError::Truncated {
                needed: CONFIRM_RECORD_SIZE,
                available: bytes.len(),
            });
        }

        let identity_kind = IdentityKind::from_code(bytes.get_u8())?;
        bytes.advance(3);
        let subscription_id = bytes.get_u32();
        let identity_value = bytes.get_u64();
        let mut guid = [0u8; MESSAGE_GUID_LENGTH];
        bytes.copy_to_slice(&mut guid);

        Ok(Self {
            identity_kind,
            identity_value,
            subscription_id,
            message_guid: MessageGuid::from_bytes(guid),
        })
    }

    pub fn queue_identity(&self) -> QueueIdentity {
        decode_identity(self.identity_kind, self.identity_value)
    }
}

/// A validated confirm event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmBlob {
    pub records: Vec<ConfirmRecord>,
}

impl ConfirmBlob {
    /// Validate headers and decode every record in order
    pub fn decode(blob: &[u8]) -> Result<Self, SerializationError> {
        if blob.len() < EMPTY_CONFIRM_EVENT_SIZE {
            return Err(SerializationError::Truncated {
                needed: EMPTY_CONFIRM_EVENT_SIZE,
                available: blob.len(),
            });
        }

        let mut header = &blob[..EMPTY_CONFIRM_EVENT_SIZE];
        let raw_length = header.get_u32();
        if raw_length & FRAGMENT_BIT != 0 {
            return Err(SerializationError::Fragmented);
        }
        let declared = (raw_length & LENGTH_MASK) as usize;
        if declared != blob.len() {
            return Err(SerializationError::LengthMismatch {
                declared,
                actual: blob.len(),
            });
        }

        let type_byte = header.get_u8();
        let version = type_byte >> 6;
        if version != PROTOCOL_VERSION {
            return Err(SerializationError::UnsupportedVersion(version));
        }
        let event_type = type_byte & 0x3F;
        if event_type != EVENT_TYPE_CONFIRM {
            return Err(SerializationError::UnexpectedEventType(event_type));
        }

        let event_header_words = header.get_u8() as usize;
        if event_header_words * WORD_SIZE != EVENT_HEADER_SIZE {
            return Err(SerializationError::InvalidHeader {
                message: format!("event header is {} words", event_header_words),
            });
        }
        header.advance(2);

        let layout = header.get_u8();
        let confirm_header_words = (layout >> 4) as usize;
        let record_words = (layout & 0x0F) as usize;
        if confirm_header_words * WORD_SIZE != CONFIRM_HEADER_SIZE
            || record_words * WORD_SIZE != CONFIRM_RECORD_SIZE
        {
            return Err(SerializationError::InvalidHeader {
                message: format!(
                    "confirm header is {} words with {} word records",
                    confirm_header_words, record_words
                ),
            });
        }

        let body = &blob[EMPTY_CONFIRM_EVENT_SIZE..];
        if body.len() % CONFIRM_RECORD_SIZE != 0 {
            return Err(SerializationError::Truncated {
                needed: body.len().next_multiple_of(CONFIRM_RECORD_SIZE),
                available: body.len(),
            });
        }

        let records = body
            .chunks_exact(CONFIRM_RECORD_SIZE)
            .map(ConfirmRecord::decode)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
