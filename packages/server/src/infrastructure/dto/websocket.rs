//! WebSocket frame DTOs.

use serde::Deserialize;

/// Query parameters for the WebSocket upgrade
///
/// Kept as a raw string so validation can answer with our own 400 body.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

/// Frame sent by a client: `{ "content": string }`
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    pub content: String,
}

/// Frame pushed to subscribers after a successful broadcast: the full message record
pub type OutboundFrame = super::http::MessageDto;
