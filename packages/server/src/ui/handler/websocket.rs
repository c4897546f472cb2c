//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::RoomId,
    infrastructure::dto::websocket::ConnectQuery,
    ui::{session::SubscriberSession, state::RealtimeState},
};

/// `GET /ws?roomId=<id>`
///
/// The room id is validated before the upgrade so a bad request never touches the registry.
pub async fn websocket_handler(
    State(state): State<Arc<RealtimeState>>,
    Query(query): Query<ConnectQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let room_id = match query.room_id.as_deref().map(RoomId::parse) {
        Some(Ok(room_id)) => room_id,
        _ => {
            tracing::warn!("Rejected WebSocket connection: invalid roomId {:?}", query.room_id);
            return (StatusCode::BAD_REQUEST, "invalid roomId\n").into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    if state.shutdown.is_cancelled() {
        return (StatusCode::SERVICE_UNAVAILABLE, "shutting down\n").into_response();
    }

    let session = SubscriberSession::new(
        room_id,
        state.registry.clone(),
        state.send_message_usecase.clone(),
        state.shutdown.clone(),
    );
    let connection_id = session.connection_id();
    let sessions = state.sessions.clone();

    ws.on_failed_upgrade(move |e| {
        tracing::warn!("WebSocket upgrade failed for connection {}: {}", connection_id, e);
    })
    .on_upgrade(move |socket| async move {
        sessions.track_future(session.run(socket)).await;
    })
}
