//! Result of opening a queue.

use crate::queue_id::QueueId;
use std::fmt;

/// Recognised open-queue result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenQueueResult {
    Success,
    Unknown,
    Timeout,
    NotConnected,
    Canceled,
    NotSupported,
    Refused,
    InvalidArgument,
    NotReady,
    AlreadyInProgress,
    AlreadyOpened,
    InvalidUri,
    InvalidFlags,
    CorrelationIdNotUnique,
}

impl OpenQueueResult {
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
            Self::AlreadyInProgress => 1,
            Self::AlreadyOpened => 2,
            Self::InvalidUri => -100,
            Self::InvalidFlags => -101,
            Self::CorrelationIdNotUnique => -102,
        }
    }

    /// Map a raw result code; unrecognised codes become `Unknown`
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
            1 => Self::AlreadyInProgress,
            2 => Self::AlreadyOpened,
            -100 => Self::InvalidUri,
            -101 => Self::InvalidFlags,
            -102 => Self::CorrelationIdNotUnique,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Unknown => "UNKNOWN",
            Self::Timeout => "TIMEOUT",
            Self::NotConnected => "NOT_CONNECTED",
            Self::Canceled => "CANCELED",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::Refused => "REFUSED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotReady => "NOT_READY",
            Self::AlreadyInProgress => "ALREADY_IN_PROGRESS",
            Self::AlreadyOpened => "ALREADY_OPENED",
            Self::InvalidUri => "INVALID_URI",
            Self::InvalidFlags => "INVALID_FLAGS",
            Self::CorrelationIdNotUnique => "CORRELATIONID_NOT_UNIQUE",
        }
    }
}

impl fmt::Display for OpenQueueResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an open-queue request, produced by the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenQueueStatus {
    queue_id: QueueId,
    result: i32,
    error_description: String,
}

impl Default for OpenQueueStatus {
    fn default() -> Self {
        Self {
            queue_id: QueueId::from_numeric(0),
            result: OpenQueueResult::Success.code(),
            error_description: String::new(),
        }
    }
}

impl OpenQueueStatus {
    pub fn new(queue_id: QueueId, result: i32, error_description: impl Into<String>) -> Self {
        Self {
            queue_id,
            result,
            error_description: error_description.into(),
        }
    }

    /// Successful open of `queue_id`
    pub fn success(queue_id: QueueId) -> Self {
        Self::new(queue_id, OpenQueueResult::Success.code(), "")
    }

    /// Failed open of `queue_id`
    pub fn failure(
        queue_id: QueueId,
        result: OpenQueueResult,
        error_description: impl Into<String>,
    ) -> Self {
        Self::new(queue_id, result.code(), error_description)
    }

    /// True iff the result code is the success code
    pub fn to_bool(&self) -> bool {
        self.result == OpenQueueResult::Success.code()
    }

    pub fn is_ok(&self) -> bool {
        self.to_bool()
    }

    pub fn queue_id(&self) -> &QueueId {
        &self.queue_id
    }

    pub fn result(&self) -> i32 {
        self.result
    }

    pub fn result_kind(&self) -> OpenQueueResult {
        OpenQueueResult::from_code(self.result)
    }

    pub fn error_description(&self) -> &str {
        &self.error_description
    }
}

impl From<&OpenQueueStatus> for bool {
    fn from(status: &OpenQueueStatus) -> Self {
        status.to_bool()
    }
}

impl fmt::Display for OpenQueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ queueId = {} result = \"{} ({})\" errorDescription = \"{}\" ]",
            self.queue_id,
            self.result_kind(),
            self.result,
            self.error_description
        )
    }
}

#[cfg(test)]
#[path = "open_queue_tests.rs"]
mod tests;
