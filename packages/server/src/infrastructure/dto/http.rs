//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Connection ids in join order
    pub members: Vec<String>,
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
}

/// Member detail for room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub username: String,
    pub connected_at: String, // ISO 8601
}
