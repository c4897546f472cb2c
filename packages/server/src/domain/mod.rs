//! Domain layer for the chat server.
//!
//! This module contains business types and the interfaces (storage, connection)
//! that the use cases depend on. It is independent of DTOs and infrastructure.

pub mod connection;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use connection::Connection;
pub use entity::{Message, Room};
pub use error::{DeliveryError, RepositoryError, ValueObjectError};
pub use repository::ChatStore;
#[cfg(test)]
pub use repository::MockChatStore;
pub use value_object::{
    ConnectionId, MessageContent, MessageId, MessageLimit, RoomId, RoomName, Timestamp,
};
