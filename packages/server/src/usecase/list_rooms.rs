//! UseCase: ルーム一覧取得

use std::{sync::Arc, time::Duration};

use crate::domain::{ChatStore, Room};

use super::{STORAGE_TIMEOUT, UseCaseError, with_deadline};

pub struct ListRoomsUseCase {
    store: Arc<dyn ChatStore>,
    timeout: Duration,
}

impl ListRoomsUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            timeout: STORAGE_TIMEOUT,
        }
    }

    /// All rooms in ascending id order
    pub async fn execute(&self) -> Result<Vec<Room>, UseCaseError> {
        with_deadline(self.timeout, self.store.list_rooms()).await
    }
}
