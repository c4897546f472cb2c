//! Realtime hub
//!
//! - `registry`: room → subscribed connections, broadcast and cleanup
//! - `websocket`: `Connection` implementation backed by a per-socket outbound queue

pub mod registry;
pub mod websocket;

pub use registry::{BroadcastReport, ConnectionRegistry};
pub use websocket::{OUTBOUND_QUEUE_CAPACITY, WebSocketConnection};
