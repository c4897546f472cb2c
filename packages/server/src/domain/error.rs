//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Identifier is not a positive integer
    #[error("invalid {kind}: {value:?}")]
    InvalidId { kind: &'static str, value: String },

    /// RoomName validation error
    #[error("room name cannot be empty")]
    RoomNameEmpty,

    /// RoomName too long error
    #[error("room name cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("message content cannot be empty")]
    MessageContentEmpty,
}

/// Errors returned by a [`ChatStore`](super::ChatStore) implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The referenced room does not exist
    #[error("room {0} not found")]
    RoomNotFound(i64),

    /// The backing store is unreachable or failed
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while delivering a message to one live connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The connection's outbound side is gone
    #[error("connection closed")]
    Closed,

    /// The connection is not draining its outbound queue
    #[error("outbound queue full")]
    QueueFull,

    /// The message could not be encoded into a frame
    #[error("failed to encode frame: {0}")]
    Encode(String),
}
