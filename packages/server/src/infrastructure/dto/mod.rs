//! Data Transfer Objects (DTOs) for HTTP and WebSocket payloads.

pub mod conversion;
pub mod http;
pub mod websocket;
