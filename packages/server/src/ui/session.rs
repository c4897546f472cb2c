//! One realtime subscriber session per accepted WebSocket.
//!
//! ```text
//! Connecting ──subscribe──▶ Subscribed ──(reading ↔ delivering)──▶ Closed
//! ```
//!
//! The read loop turns inbound frames into stored messages. The writer task
//! (`pusher_loop`) drains the connection's outbound queue into the socket and is
//! the only place the socket is closed.

use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{Connection, ConnectionId, MessageContent, RoomId},
    infrastructure::{
        dto::websocket::InboundFrame,
        hub::{ConnectionRegistry, WebSocketConnection},
    },
    usecase::SendMessageUseCase,
};

/// Why a session reached `Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Close frame or end of stream from the peer
    ClientClosed,
    /// The socket returned an error
    TransportError,
    /// The peer sent a frame that is not `{"content": string}`
    DecodeError,
    /// Closed by the server: failed delivery or writer failure
    ServerClosed,
    /// The process is shutting down
    Shutdown,
}

/// What the read loop does with one inbound frame
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    Content(String),
    Ignore,
    Close,
    Invalid(String),
}

fn classify(frame: &WsMessage) -> Inbound {
    let parsed = match frame {
        WsMessage::Text(text) => serde_json::from_str::<InboundFrame>(text.as_str()),
        WsMessage::Binary(bytes) => serde_json::from_slice::<InboundFrame>(bytes),
        WsMessage::Ping(_) | WsMessage::Pong(_) => return Inbound::Ignore,
        WsMessage::Close(_) => return Inbound::Close,
    };
    match parsed {
        Ok(frame) => Inbound::Content(frame.content),
        Err(e) => Inbound::Invalid(e.to_string()),
    }
}

/// Registry membership of one session
///
/// Subscribes on creation and unsubscribes exactly once on drop, whichever way
/// the session ends.
struct Subscription {
    registry: Arc<ConnectionRegistry>,
    room_id: RoomId,
    connection_id: ConnectionId,
}

impl Subscription {
    fn new(
        registry: Arc<ConnectionRegistry>,
        room_id: RoomId,
        connection: Arc<dyn Connection>,
    ) -> Self {
        let connection_id = connection.id();
        registry.subscribe(room_id, connection);
        Self {
            registry,
            room_id,
            connection_id,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.room_id, self.connection_id);
    }
}

pub struct SubscriberSession {
    room_id: RoomId,
    connection: Arc<WebSocketConnection>,
    outbound: mpsc::Receiver<String>,
    /// Child of the shutdown token; cancelled to close this session only
    closed: CancellationToken,
    shutdown: CancellationToken,
    registry: Arc<ConnectionRegistry>,
    send_message_usecase: Arc<SendMessageUseCase>,
}

impl SubscriberSession {
    pub fn new(
        room_id: RoomId,
        registry: Arc<ConnectionRegistry>,
        send_message_usecase: Arc<SendMessageUseCase>,
        shutdown: CancellationToken,
    ) -> Self {
        let closed = shutdown.child_token();
        let (connection, outbound) = WebSocketConnection::channel(closed.clone());
        Self {
            room_id,
            connection: Arc::new(connection),
            outbound,
            closed,
            shutdown,
            registry,
            send_message_usecase,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id()
    }

    /// Drive the session until it closes
    pub async fn run(self, socket: WebSocket) -> CloseReason {
        let connection_id = self.connection.id();
        let (sink, mut stream) = socket.split();

        // Connecting → Subscribed
        let subscription = Subscription::new(
            self.registry.clone(),
            self.room_id,
            self.connection.clone(),
        );
        tracing::info!(
            "Connection {} subscribed to room {}",
            connection_id,
            self.room_id
        );

        let writer = pusher_loop(self.outbound, sink, self.closed.clone());

        let reason = loop {
            let frame = tokio::select! {
                _ = self.closed.cancelled() => {
                    break if self.shutdown.is_cancelled() {
                        CloseReason::Shutdown
                    } else {
                        CloseReason::ServerClosed
                    };
                }
                frame = stream.next() => frame,
            };

            let frame = match frame {
                None => break CloseReason::ClientClosed,
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on connection {}: {}", connection_id, e);
                    break CloseReason::TransportError;
                }
                Some(Ok(frame)) => frame,
            };

            match classify(&frame) {
                Inbound::Content(content) => {
                    forward(&self.send_message_usecase, self.room_id, content).await
                }
                Inbound::Ignore => {}
                Inbound::Close => break CloseReason::ClientClosed,
                Inbound::Invalid(e) => {
                    tracing::warn!(
                        "Undecodable frame on connection {}, closing: {}",
                        connection_id,
                        e
                    );
                    break CloseReason::DecodeError;
                }
            }
        };

        // → Closed
        drop(subscription);
        self.closed.cancel();
        if let Err(e) = writer.await {
            tracing::error!("Writer task of connection {} failed: {}", connection_id, e);
        }

        tracing::info!(
            "Connection {} left room {} ({:?})",
            connection_id,
            self.room_id,
            reason
        );
        reason
    }
}

/// Store the content and broadcast it. Failures drop the frame; the session stays open.
async fn forward(usecase: &SendMessageUseCase, room_id: RoomId, content: String) {
    let content = match MessageContent::new(content) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Dropping frame for room {}: {}", room_id, e);
            return;
        }
    };
    if let Err(e) = usecase.execute(room_id, content).await {
        tracing::warn!("Dropping frame for room {}: {}", room_id, e);
    }
}

/// Spawns the task that owns the socket's sending half.
///
/// Frames queued by broadcasts are written in order. The task stops when the
/// session is closed, the queue is gone or a write fails; it then closes the
/// socket and marks the session closed.
fn pusher_loop<S>(
    rx: mpsc::Receiver<String>,
    mut sink: S,
    closed: CancellationToken,
) -> tokio::task::JoinHandle<()>
where
    S: Sink<WsMessage> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        pump_outbound(rx, &mut sink, &closed).await;
        closed.cancel();
        // Close frame is best effort: the peer may already be gone.
        let _ = sink.close().await;
    })
}

async fn pump_outbound<S>(mut rx: mpsc::Receiver<String>, sink: &mut S, closed: &CancellationToken)
where
    S: Sink<WsMessage> + Unpin,
{
    loop {
        let frame = tokio::select! {
            _ = closed.cancelled() => break,
            frame = rx.recv() => frame,
        };
        let Some(frame) = frame else { break };
        if sink.send(WsMessage::Text(frame.into())).await.is_err() {
            break;
        }
    }
}
