//! UseCase: ルーム作成

use std::{sync::Arc, time::Duration};

use crate::domain::{ChatStore, Room, RoomName};

use super::{STORAGE_TIMEOUT, UseCaseError, with_deadline};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    store: Arc<dyn ChatStore>,
    timeout: Duration,
}

impl CreateRoomUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            timeout: STORAGE_TIMEOUT,
        }
    }

    pub async fn execute(&self, name: RoomName) -> Result<Room, UseCaseError> {
        let room = with_deadline(self.timeout, self.store.create_room(name)).await?;
        tracing::info!("Room {} '{}' created", room.id, room.name.as_str());
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockChatStore, RepositoryError, RoomId, Timestamp};

    #[tokio::test]
    async fn test_create_room_returns_stored_room() {
        // テスト項目: ストレージが採番した Room をそのまま返す
        // given (前提条件):
        let mut store = MockChatStore::new();
        store
            .expect_create_room()
            .withf(|name| name.as_str() == "general")
            .times(1)
            .returning(|name| Ok(Room::new(RoomId::new(1).unwrap(), name, Timestamp::new(0))));
        let usecase = CreateRoomUseCase::new(Arc::new(store));

        // when (操作):
        let room = usecase
            .execute(RoomName::new("general".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.id.value(), 1);
        assert_eq!(room.name.as_str(), "general");
    }

    #[tokio::test]
    async fn test_create_room_propagates_storage_error() {
        // テスト項目: ストレージのエラーは Repository エラーとして返る
        // given (前提条件):
        let mut store = MockChatStore::new();
        store
            .expect_create_room()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = CreateRoomUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase
            .execute(RoomName::new("general".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(UseCaseError::Repository(RepositoryError::Unavailable(_)))
        ));
    }
}
