//! Test doubles shared by the use case tests.

use async_trait::async_trait;

use crate::domain::{
    ChatStore, Message, MessageContent, MessageLimit, RepositoryError, Room, RoomId, RoomName,
};

/// Store whose every call never completes
pub(crate) struct StalledStore;

#[async_trait]
impl ChatStore for StalledStore {
    async fn create_room(&self, _name: RoomName) -> Result<Room, RepositoryError> {
        std::future::pending().await
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        std::future::pending().await
    }

    async fn create_message(
        &self,
        _room_id: RoomId,
        _content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        std::future::pending().await
    }

    async fn list_messages(
        &self,
        _room_id: RoomId,
        _limit: MessageLimit,
    ) -> Result<Vec<Message>, RepositoryError> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        std::future::pending().await
    }
}
