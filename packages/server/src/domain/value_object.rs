//! Value Objects for domain models.
//!
//! Value Objects are immutable and validated on construction, so anything
//! holding one can rely on its invariants.

use std::{fmt, num::IntErrorKind};

use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a room name (matches the storage column width)
pub const ROOM_NAME_MAX_CHARS: usize = 255;

fn parse_positive_id(kind: &'static str, raw: &str) -> Result<i64, ValueObjectError> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValueObjectError::InvalidId {
            kind,
            value: raw.to_string(),
        }),
    }
}

/// Room identifier (positive, server-assigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(i64);

impl RoomId {
    /// Create a RoomId from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::InvalidId` if `id` is zero or negative.
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::InvalidId {
                kind: "roomId",
                value: id.to_string(),
            });
        }
        Ok(Self(id))
    }

    /// Parse a RoomId from a path segment or query parameter.
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        parse_positive_id("roomId", raw).map(Self)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier (positive, server-assigned, globally monotonic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(id: i64) -> Result<Self, ValueObjectError> {
        if id <= 0 {
            return Err(ValueObjectError::InvalidId {
                kind: "messageId",
                value: id.to_string(),
            });
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or longer than [`ROOM_NAME_MAX_CHARS`].
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = trimmed.chars().count();
        if len > ROOM_NAME_MAX_CHARS {
            return Err(ValueObjectError::RoomNameTooLong {
                max: ROOM_NAME_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Message content value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// Content is stored as sent, whatever its length.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is empty.
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Page size for message listings.
///
/// Absent, unparseable, zero or negative values fall back to [`MessageLimit::DEFAULT`];
/// anything above [`MessageLimit::MAX`] is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimit(usize);

impl MessageLimit {
    pub const DEFAULT: usize = 50;
    pub const MAX: usize = 200;

    pub fn from_requested(requested: Option<i64>) -> Self {
        match requested {
            Some(n) if n > 0 => Self((n as u64).min(Self::MAX as u64) as usize),
            _ => Self(Self::DEFAULT),
        }
    }

    /// Parse the raw `limit` query value.
    ///
    /// A positive number too large for i64 is still a request for "as many as possible".
    pub fn from_query(raw: Option<&str>) -> Self {
        let requested = raw.and_then(|s| match s.parse::<i64>() {
            Ok(n) => Some(n),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(i64::MAX),
            Err(_) => None,
        });
        Self::from_requested(requested)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for MessageLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Identity of one live realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random (UUID v4) connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object (Unix milliseconds, UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
