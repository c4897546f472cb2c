//! Storage trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Message, MessageContent, MessageLimit, RepositoryError, Room, RoomId, RoomName};

/// Chat storage collaborator.
///
/// Rooms and messages are created here and are immutable afterwards.
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create a room and assign it the next room id
    async fn create_room(&self, name: RoomName) -> Result<Room, RepositoryError>;

    /// All rooms in ascending id order
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    /// Persist a message in an existing room
    ///
    /// Fails with `RepositoryError::RoomNotFound` if `room_id` is unknown.
    async fn create_message(
        &self,
        room_id: RoomId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError>;

    /// Latest messages of a room, newest first
    async fn list_messages(
        &self,
        room_id: RoomId,
        limit: MessageLimit,
    ) -> Result<Vec<Message>, RepositoryError>;

    /// Liveness probe of the backing store
    async fn ping(&self) -> Result<(), RepositoryError>;
}
