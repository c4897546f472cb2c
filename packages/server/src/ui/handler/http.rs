//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{MessageContent, MessageLimit, RoomId, RoomName},
    infrastructure::dto::http::{
        CreateMessageRequest, CreateRoomRequest, ListMessagesQuery, MessageDto, RoomDto,
        StatusResponse,
    },
    ui::{error::ApiError, state::AppState},
};

fn parse_room_id(raw: &str) -> Result<RoomId, ApiError> {
    RoomId::parse(raw).map_err(|_| ApiError::BadRequest("invalid roomId".to_string()))
}

/// Liveness probe
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe: pings storage
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> Response {
    match state.check_readiness_usecase.execute().await {
        Ok(()) => Json(StatusResponse {
            status: "ready".to_string(),
        })
        .into_response(),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse {
                    status: "unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `POST /v1/rooms`
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoomDto>), ApiError> {
    let Json(request) = body?;
    let name = RoomName::new(request.name)?;

    let room = state.create_room_usecase.execute(name).await?;

    // Domain Model から DTO への変換
    Ok((StatusCode::CREATED, Json(RoomDto::from(room))))
}

/// `GET /v1/rooms`
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RoomDto>>, ApiError> {
    let rooms = state.list_rooms_usecase.execute().await?;
    Ok(Json(rooms.into_iter().map(RoomDto::from).collect()))
}

/// `POST /v1/rooms/{roomId}/messages`
///
/// The stored message is also broadcast to the room's live subscribers.
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let room_id = parse_room_id(&room_id)?;
    let Json(request) = body?;
    let content = MessageContent::new(request.content)?;

    let (message, _report) = state
        .send_message_usecase
        .execute(room_id, content)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageDto::from(message))))
}

/// `GET /v1/rooms/{roomId}/messages?limit=N`
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let room_id = parse_room_id(&room_id)?;
    let limit = MessageLimit::from_query(query.limit.as_deref());

    let messages = state
        .list_messages_usecase
        .execute(room_id, limit)
        .await?;

    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}
