//! Core domain models for the chat server.

use super::value_object::{MessageContent, MessageId, RoomId, RoomName, Timestamp};

/// A named channel that groups messages and realtime subscribers.
///
/// Rooms are immutable once created and owned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, name: RoomName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl Message {
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            content,
            created_at,
        }
    }
}
