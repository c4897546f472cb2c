//! InMemory ChatStore 実装
//!
//! ドメイン層が定義する ChatStore trait の具体的な実装。
//! BTreeMap / Vec をインメモリ DB として使用します。
//! Ids are allocated from two counters (rooms, messages) so they are positive and
//! strictly increasing for the lifetime of the process.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chathub_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ChatStore, Message, MessageContent, MessageId, MessageLimit, RepositoryError, Room, RoomId,
    RoomName, Timestamp,
};

#[derive(Debug, Default)]
struct StoreState {
    rooms: BTreeMap<RoomId, Room>,
    /// All messages in insertion (= id) order
    messages: Vec<Message>,
    last_room_id: i64,
    last_message_id: i64,
}

/// インメモリ ChatStore 実装
pub struct InMemoryChatStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryChatStore {
    /// 新しい InMemoryChatStore を作成（システム時計を使用）
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 時計を差し替えて作成（テスト用）
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

impl Default for InMemoryChatStore {
    fn default() -> Self {
        Self::new()
    }
}

fn allocate<T>(
    counter: &mut i64,
    build: impl FnOnce(i64) -> Result<T, crate::domain::ValueObjectError>,
) -> Result<T, RepositoryError> {
    let next = counter
        .checked_add(1)
        .ok_or_else(|| RepositoryError::Unavailable("id space exhausted".to_string()))?;
    let id = build(next).map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
    *counter = next;
    Ok(id)
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn create_room(&self, name: RoomName) -> Result<Room, RepositoryError> {
        let created_at = self.now();
        let mut state = self.state.lock().await;
        let id = allocate(&mut state.last_room_id, RoomId::new)?;
        let room = Room::new(id, name, created_at);
        state.rooms.insert(id, room.clone());
        tracing::debug!("Room {} '{}' created", id, room.name.as_str());
        Ok(room)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.rooms.values().cloned().collect())
    }

    async fn create_message(
        &self,
        room_id: RoomId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        let created_at = self.now();
        let mut state = self.state.lock().await;
        if !state.rooms.contains_key(&room_id) {
            return Err(RepositoryError::RoomNotFound(room_id.value()));
        }
        let id = allocate(&mut state.last_message_id, MessageId::new)?;
        let message = Message::new(id, room_id, content, created_at);
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        room_id: RoomId,
        limit: MessageLimit,
    ) -> Result<Vec<Message>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .rev()
            .filter(|m| m.room_id == room_id)
            .take(limit.value())
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
