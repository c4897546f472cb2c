//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Room as returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: i64,
    pub name: String,
    pub created_at: String, // RFC 3339
}

/// Message as returned by the HTTP API and pushed over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub room_id: i64,
    pub content: String,
    pub created_at: String, // RFC 3339
}

/// Body of `POST /v1/rooms`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Body of `POST /v1/rooms/{roomId}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}

/// Query of `GET /v1/rooms/{roomId}/messages`
///
/// `limit` stays a string so that garbage falls back to the default instead of a 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<String>,
}

/// Body of `/healthz` and `/readyz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Error body of every failing HTTP API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
