//! WebSocket-backed [`Connection`].
//!
//! The socket itself is owned by the session in the UI layer. This handle only
//! holds the sending half of the session's outbound queue plus a cancellation
//! token, so the registry can deliver to or close a session without touching
//! the socket.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{Connection, ConnectionId, DeliveryError, Message},
    infrastructure::dto::websocket::OutboundFrame,
};

/// Frames a session may have queued before it counts as stalled
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Outbound half of one WebSocket session
pub struct WebSocketConnection {
    id: ConnectionId,
    outbound: mpsc::Sender<String>,
    closed: CancellationToken,
}

impl WebSocketConnection {
    /// Create a connection handle together with the receiver its writer task drains
    pub fn channel(closed: CancellationToken) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let connection = Self {
            id: ConnectionId::generate(),
            outbound: tx,
            closed,
        };
        (connection, rx)
    }

    /// Token cancelled once the connection is asked to close
    #[cfg(test)]
    pub(crate) fn closed_token(&self) -> &CancellationToken {
        &self.closed
    }
}

#[async_trait]
impl Connection for WebSocketConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        if self.closed.is_cancelled() {
            return Err(DeliveryError::Closed);
        }

        let frame = serde_json::to_string(&OutboundFrame::from(message))
            .map_err(|e| DeliveryError::Encode(e.to_string()))?;

        self.outbound.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    fn close(&self) {
        if !self.closed.is_cancelled() {
            tracing::debug!("Closing connection {}", self.id);
        }
        self.closed.cancel();
    }
}
