//! Conversion logic between domain entities and DTOs.

use chathub_shared::time::timestamp_to_rfc3339;

use crate::domain::{Message, Room};
use crate::infrastructure::dto::http::{MessageDto, RoomDto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Room> for RoomDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.value(),
            name: room.name.as_str().to_string(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<Room> for RoomDto {
    fn from(room: Room) -> Self {
        Self::from(&room)
    }
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.value(),
            room_id: message.room_id.value(),
            content: message.content.as_str().to_string(),
            created_at: timestamp_to_rfc3339(message.created_at.value()),
        }
    }
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}
