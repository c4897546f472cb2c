//! UseCase: メッセージ履歴取得

use std::{sync::Arc, time::Duration};

use crate::domain::{ChatStore, Message, MessageLimit, RoomId};

use super::{STORAGE_TIMEOUT, UseCaseError, with_deadline};

pub struct ListMessagesUseCase {
    store: Arc<dyn ChatStore>,
    timeout: Duration,
}

impl ListMessagesUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            timeout: STORAGE_TIMEOUT,
        }
    }

    /// Latest `limit` messages of `room_id`, newest first
    ///
    /// An unknown room yields an empty list.
    pub async fn execute(
        &self,
        room_id: RoomId,
        limit: MessageLimit,
    ) -> Result<Vec<Message>, UseCaseError> {
        with_deadline(self.timeout, self.store.list_messages(room_id, limit)).await
    }
}
