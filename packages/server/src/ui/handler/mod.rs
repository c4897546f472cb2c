//! Request handlers of the three listeners.

pub mod admin;
pub mod http;
pub mod websocket;

pub use admin::{require_bearer, restart, status, stop};
pub use http::{create_message, create_room, health_check, list_messages, list_rooms, readiness_check};
pub use websocket::websocket_handler;
