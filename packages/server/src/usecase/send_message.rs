//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化に成功したメッセージだけが room の購読者に broadcast される
//!
//! ### なぜこのテストが必要か
//! - 「broadcast されるのは保存済みのメッセージのみ」という配信の前提を保証する
//! - ストレージ障害・タイムアウト時に購読者へ何も届かないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：保存して broadcast（送信者自身の接続にも届く）
//! - 異常系：存在しない room、ストレージのタイムアウト

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{ChatStore, Message, MessageContent, RoomId},
    infrastructure::hub::{BroadcastReport, ConnectionRegistry},
};

use super::{STORAGE_TIMEOUT, UseCaseError, with_deadline};

/// メッセージ送信のユースケース
///
/// Shared by the HTTP API and the realtime sessions.
pub struct SendMessageUseCase {
    /// Storage (データアクセス層の抽象化)
    store: Arc<dyn ChatStore>,
    /// Live subscribers per room
    registry: Arc<ConnectionRegistry>,
    timeout: Duration,
}

impl SendMessageUseCase {
    pub fn new(store: Arc<dyn ChatStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            store,
            registry,
            timeout: STORAGE_TIMEOUT,
        }
    }

    /// Override the storage deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// メッセージを保存し、room の購読者全員に配信する
    ///
    /// # Returns
    ///
    /// * `Ok((Message, BroadcastReport))` - 保存されたメッセージと配信結果
    /// * `Err(UseCaseError)` - 保存失敗（この場合 broadcast は行われない）
    pub async fn execute(
        &self,
        room_id: RoomId,
        content: MessageContent,
    ) -> Result<(Message, BroadcastReport), UseCaseError> {
        // 1. 保存（期限付き）
        let message = with_deadline(self.timeout, self.store.create_message(room_id, content))
            .await?;

        // 2. 保存済みのメッセージを broadcast
        let report = self.registry.broadcast(room_id, &message).await;

        tracing::info!(
            "Message {} stored in room {} and delivered to {} connection(s)",
            message.id,
            room_id,
            report.delivered
        );
        Ok((message, report))
    }
}
