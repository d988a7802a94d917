use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument};

use super::generators::normalize_code;
use super::models::{GamePhase, JudgmentResult, Player, RoomModel};
use super::topics::TopicPicker;
use crate::judge::JudgmentJob;
use crate::shared::AppError;

/// Result of attempting to register a new room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRoomResult {
    Created,
    /// Another live room already uses this code
    CodeTaken,
}

/// Result of attempting to leave a room
#[derive(Debug, Clone)]
pub enum LeaveRoomResult {
    /// Successfully left the room, returns updated room data
    Left(RoomModel),
    /// Player was not in the room, returns the unchanged room
    PlayerNotInRoom(RoomModel),
    /// Room was deleted because no players left
    RoomClosed,
}

/// Room snapshot returned by reads that may also start a judgment
#[derive(Debug, Clone)]
pub struct RefreshedRoom {
    pub room: RoomModel,
    /// Judgment claimed by this read, to be handed to the worker
    pub job: Option<JudgmentJob>,
}

/// Registry of live rooms. Every operation is atomic per call and applies
/// the lazy round timeout before doing anything else.
#[async_trait]
pub trait RoomRepository {
    async fn create_room(&self, room: &RoomModel) -> Result<CreateRoomResult, AppError>;

    /// Raw lookup with no side effects
    async fn get_room(&self, code: &str) -> Result<Option<RoomModel>, AppError>;

    async fn delete_room(&self, code: &str) -> Result<bool, AppError>;

    async fn try_join_room(
        &self,
        code: &str,
        player: Player,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError>;

    async fn leave_room(
        &self,
        code: &str,
        player_id: &str,
        now: DateTime<Utc>,
    ) -> Result<LeaveRoomResult, AppError>;

    async fn start_round(
        &self,
        code: &str,
        player_id: &str,
        topics: &dyn TopicPicker,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError>;

    async fn submit_drawing(
        &self,
        code: &str,
        player_id: &str,
        image_b64: String,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError>;

    async fn play_again(
        &self,
        code: &str,
        player_id: &str,
        topics: &dyn TopicPicker,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError>;

    /// Client-facing read: applies the timeout and claims judgment if due
    async fn refresh_room(&self, code: &str, now: DateTime<Utc>)
        -> Result<RefreshedRoom, AppError>;

    /// Explicit judge request, only valid once the game is over
    async fn request_judgment(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshedRoom, AppError>;

    /// Writes a finished judgment. Returns false when the write was discarded
    /// because the room is gone or has moved on.
    async fn store_judgment(
        &self,
        code: &str,
        round: u64,
        result: JudgmentResult,
    ) -> Result<bool, AppError>;
}

/// In-memory room registry guarded by a single lock
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, RoomModel>>, AppError> {
        self.rooms.lock().map_err(|_| {
            error!("Room registry lock poisoned");
            AppError::Internal
        })
    }

    /// Runs `action` against a live room after applying the round timeout
    fn with_room<T>(
        &self,
        code: &str,
        now: DateTime<Utc>,
        action: impl FnOnce(&mut RoomModel) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let code = normalize_code(code);
        let mut rooms = self.lock()?;
        let room = rooms.get_mut(&code).ok_or_else(|| {
            debug!(room_code = %code, "Room not found");
            AppError::NotFound("Room not found".to_string())
        })?;
        room.expire_round_if_due(now);
        action(room)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room), fields(room_code = %room.code))]
    async fn create_room(&self, room: &RoomModel) -> Result<CreateRoomResult, AppError> {
        let code = normalize_code(&room.code);
        let mut rooms = self.lock()?;
        if rooms.contains_key(&code) {
            debug!("Room code already in use");
            return Ok(CreateRoomResult::CodeTaken);
        }
        let mut stored = room.clone();
        stored.code = code.clone();
        rooms.insert(code, stored);

        debug!("Room created in memory");
        Ok(CreateRoomResult::Created)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, code: &str) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.lock()?;
        Ok(rooms.get(&normalize_code(code)).cloned())
    }

    #[instrument(skip(self))]
    async fn delete_room(&self, code: &str) -> Result<bool, AppError> {
        let mut rooms = self.lock()?;
        let removed = rooms.remove(&normalize_code(code)).is_some();
        if removed {
            info!(room_code = %code, "Room deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self, player), fields(player_id = %player.id))]
    async fn try_join_room(
        &self,
        code: &str,
        player: Player,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError> {
        self.with_room(code, now, |room| {
            room.add_player(player)?;
            info!(
                room_code = %room.code,
                new_player_count = room.player_count(),
                "Player joined room"
            );
            Ok(room.clone())
        })
    }

    #[instrument(skip(self))]
    async fn leave_room(
        &self,
        code: &str,
        player_id: &str,
        now: DateTime<Utc>,
    ) -> Result<LeaveRoomResult, AppError> {
        let code = normalize_code(code);
        let mut rooms = self.lock()?;
        let room = rooms
            .get_mut(&code)
            .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;
        room.expire_round_if_due(now);

        if !room.remove_player(player_id) {
            debug!(room_code = %code, "Player not in room");
            return Ok(LeaveRoomResult::PlayerNotInRoom(room.clone()));
        }

        if room.players.is_empty() {
            rooms.remove(&code);
            info!(room_code = %code, "Room is now empty, deleting");
            return Ok(LeaveRoomResult::RoomClosed);
        }

        info!(
            room_code = %code,
            new_player_count = room.player_count(),
            current_host = %room.host_id,
            "Player left room"
        );
        Ok(LeaveRoomResult::Left(room.clone()))
    }

    #[instrument(skip(self, topics))]
    async fn start_round(
        &self,
        code: &str,
        player_id: &str,
        topics: &dyn TopicPicker,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError> {
        self.with_room(code, now, |room| {
            room.start_round(player_id, topics, now)?;
            Ok(room.clone())
        })
    }

    #[instrument(skip(self, image_b64), fields(image_len = image_b64.len()))]
    async fn submit_drawing(
        &self,
        code: &str,
        player_id: &str,
        image_b64: String,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError> {
        self.with_room(code, now, |room| {
            room.submit_drawing(player_id, image_b64, now)?;
            debug!(
                room_code = %room.code,
                submitted = room.submitted_drawings.len(),
                players = room.player_count(),
                "Drawing submitted"
            );
            Ok(room.clone())
        })
    }

    #[instrument(skip(self, topics))]
    async fn play_again(
        &self,
        code: &str,
        player_id: &str,
        topics: &dyn TopicPicker,
        now: DateTime<Utc>,
    ) -> Result<RoomModel, AppError> {
        self.with_room(code, now, |room| {
            room.play_again(player_id, topics, now)?;
            Ok(room.clone())
        })
    }

    #[instrument(skip(self))]
    async fn refresh_room(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshedRoom, AppError> {
        self.with_room(code, now, |room| {
            let job = room.claim_judgment();
            Ok(RefreshedRoom {
                room: room.clone(),
                job,
            })
        })
    }

    #[instrument(skip(self))]
    async fn request_judgment(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshedRoom, AppError> {
        self.with_room(code, now, |room| {
            if room.game_phase != GamePhase::GameOver {
                return Err(AppError::BadRequest(
                    "Judgment only after game over.".to_string(),
                ));
            }
            let job = room.claim_judgment();
            Ok(RefreshedRoom {
                room: room.clone(),
                job,
            })
        })
    }

    #[instrument(skip(self, result))]
    async fn store_judgment(
        &self,
        code: &str,
        round: u64,
        result: JudgmentResult,
    ) -> Result<bool, AppError> {
        let mut rooms = self.lock()?;
        let Some(room) = rooms.get_mut(&normalize_code(code)) else {
            debug!(room_code = %code, "Room closed before judgment finished, discarding");
            return Ok(false);
        };

        let stored = room.record_judgment(round, result);
        if stored {
            info!(room_code = %code, round, "Judgment stored");
        } else {
            debug!(room_code = %code, round, "Stale judgment discarded");
        }
        Ok(stored)
    }
}
