//! Routers of the three listeners.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        create_message, create_room, health_check, list_messages, list_rooms, readiness_check,
        require_bearer, restart, status, stop, websocket_handler,
    },
    state::{AdminState, AppState, RealtimeState},
};

/// HTTP API listener
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(readiness_check))
        .route("/v1/rooms", get(list_rooms).post(create_room))
        .route(
            "/v1/rooms/{room_id}/messages",
            get(list_messages).post(create_message),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Realtime listener
pub fn realtime_router(state: Arc<RealtimeState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Admin listener
///
/// Routes accept any method so authentication is answered before 405.
pub fn admin_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/admin/status", any(status))
        .route("/admin/stop", any(stop))
        .route("/admin/restart", any(restart))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
