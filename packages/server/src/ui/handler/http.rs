//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use coderoom_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Development root route
pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({"title": "Real-time Code Editor"}))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of populated rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state
        .repository
        .list_rooms()
        .await
        .into_iter()
        .map(|(room_id, members)| RoomSummaryDto {
            id: room_id.into_string(),
            members: members
                .into_iter()
                .map(|m| m.connection_id.into_string())
                .collect(),
        })
        .collect();

    Json(rooms)
}

/// Get room detail by ID. Rooms without members do not exist.
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let members = state.repository.list_members(&room_id).await;
    if members.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    let room_detail = RoomDetailDto {
        id: room_id.into_string(),
        members: members
            .into_iter()
            .map(|m| MemberDetailDto {
                connection_id: m.connection_id.into_string(),
                username: m.username.into_string(),
                connected_at: timestamp_to_jst_rfc3339(m.connected_at.value()),
            })
            .collect(),
    };

    Ok(Json(room_detail))
}
