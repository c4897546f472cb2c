//! Realtime connection handle.
//!
//! The registry only sees connections through this trait; the WebSocket
//! transport behind it lives in the UI/infrastructure layers.

use async_trait::async_trait;

use super::{ConnectionId, DeliveryError, Message};

/// One live subscriber connection.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Stable identity of this connection for its whole lifetime
    fn id(&self) -> ConnectionId;

    /// Deliver a persisted message to the peer
    ///
    /// Must not wait on the peer: a stalled peer is reported as an error.
    async fn send(&self, message: &Message) -> Result<(), DeliveryError>;

    /// Force the connection to close. Idempotent.
    fn close(&self);
}
