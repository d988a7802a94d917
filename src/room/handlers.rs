use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::RoomModel,
    repository::LeaveRoomResult,
    types::{DetailResponse, JoinRoomRequest, PlayerIdRequest, RoomCreateRequest, SubmitDrawingRequest},
};
use crate::shared::{AppError, AppState};

pub const ROOM_CLOSED_DETAIL: &str = "Room closed as last player left.";

/// HTTP handler for creating a new room
///
/// POST /rooms/create
#[instrument(name = "create_room", skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<RoomCreateRequest>,
) -> Result<(StatusCode, Json<RoomModel>), AppError> {
    let room = state
        .room_service
        .create_room(&request.host_name, request.name)
        .await?;

    info!(room_code = %room.code, "Room created");
    Ok((StatusCode::CREATED, Json(room)))
}

/// POST /rooms/:room_code/join
#[instrument(name = "join_room", skip(state))]
pub async fn join_room(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<RoomModel>, AppError> {
    let room = state
        .room_service
        .join_room(&room_code, &request.player_name)
        .await?;
    Ok(Json(room))
}

/// POST /rooms/:room_code/leave
///
/// Answers 200 with a detail message instead of a room when the room closed.
#[instrument(name = "leave_room", skip(state))]
pub async fn leave_room(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<Response, AppError> {
    let result = state
        .room_service
        .leave_room(&room_code, &request.player_id)
        .await?;

    let response = match result {
        LeaveRoomResult::Left(room) | LeaveRoomResult::PlayerNotInRoom(room) => {
            Json(room).into_response()
        }
        LeaveRoomResult::RoomClosed => (
            StatusCode::OK,
            Json(DetailResponse {
                detail: ROOM_CLOSED_DETAIL.to_string(),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

/// POST /rooms/:room_code/start-game
#[instrument(name = "start_game", skip(state))]
pub async fn start_game(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<Json<RoomModel>, AppError> {
    let room = state
        .room_service
        .start_game(&room_code, &request.player_id)
        .await?;
    Ok(Json(room))
}

/// POST /rooms/:room_code/submit-drawing
#[instrument(name = "submit_drawing", skip(state, request), fields(player_id = %request.player_id))]
pub async fn submit_drawing(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
    Json(request): Json<SubmitDrawingRequest>,
) -> Result<Json<RoomModel>, AppError> {
    let room = state
        .room_service
        .submit_drawing(&room_code, &request.player_id, request.image_b64)
        .await?;
    Ok(Json(room))
}

/// POST /rooms/:room_code/play-again
#[instrument(name = "play_again", skip(state))]
pub async fn play_again(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<Json<RoomModel>, AppError> {
    let room = state
        .room_service
        .play_again(&room_code, &request.player_id)
        .await?;
    Ok(Json(room))
}

/// POST /rooms/:room_code/judge
#[instrument(name = "judge_room", skip(state))]
pub async fn judge_room(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
) -> Result<Json<RoomModel>, AppError> {
    let room = state.room_service.judge_room(&room_code).await?;
    Ok(Json(room))
}

/// GET /rooms/:room_code
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_code): Path<String>,
) -> Result<Json<RoomModel>, AppError> {
    let room = state.room_service.get_room_details(&room_code).await?;
    Ok(Json(room))
}
