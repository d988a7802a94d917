use serde::{Deserialize, Serialize};

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
pub struct RoomCreateRequest {
    pub host_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request payload for joining a room
#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    pub player_name: String,
}

/// Body for actions that only identify the acting player
#[derive(Debug, Deserialize)]
pub struct PlayerIdRequest {
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitDrawingRequest {
    pub player_id: String,
    pub image_b64: String,
}

/// Plain message response, e.g. when a room closes
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}
