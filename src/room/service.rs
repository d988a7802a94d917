use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    generators::{display_name_or_default, CodeGenerator, RandomCodeGenerator},
    models::{JudgmentResult, Player, RoomModel},
    repository::{CreateRoomResult, LeaveRoomResult, RefreshedRoom, RoomRepository},
    topics::{RandomTopicPicker, TopicPicker},
};
use crate::{
    config::GameConfig,
    judge::{JudgmentQueue, JUDGE_UNAVAILABLE_SUMMARY},
    shared::AppError,
};

/// Fresh codes tried before giving up on creating a room
pub const MAX_CODE_ATTEMPTS: usize = 50;

/// Service for handling room business logic
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    judgments: JudgmentQueue,
    codes: Arc<dyn CodeGenerator>,
    topics: Arc<dyn TopicPicker>,
    config: GameConfig,
}

impl RoomService {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        judgments: JudgmentQueue,
        config: GameConfig,
    ) -> Self {
        Self {
            repository,
            judgments,
            codes: Arc::new(RandomCodeGenerator::new(config.room_code_length)),
            topics: Arc::new(RandomTopicPicker),
            config,
        }
    }

    pub fn with_code_generator(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    pub fn with_topic_picker(mut self, topics: Arc<dyn TopicPicker>) -> Self {
        self.topics = topics;
        self
    }

    /// Creates a room with a fresh code; the host becomes its first player
    #[instrument(skip(self))]
    pub async fn create_room(
        &self,
        host_name: &str,
        room_name: Option<String>,
    ) -> Result<RoomModel, AppError> {
        let host = Player::new(display_name_or_default(host_name));

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.codes.generate();
            let room = RoomModel::new(code, room_name.clone(), host.clone(), &self.config);

            match self.repository.create_room(&room).await? {
                CreateRoomResult::Created => {
                    info!(
                        room_code = %room.code,
                        host_id = %room.host_id,
                        "Room created successfully"
                    );
                    return Ok(room);
                }
                CreateRoomResult::CodeTaken => {
                    debug!(room_code = %room.code, "Room code collision, retrying");
                }
            }
        }

        error!(
            attempts = MAX_CODE_ATTEMPTS,
            "No free room code found, code space may be exhausted"
        );
        Err(AppError::Internal)
    }

    #[instrument(skip(self))]
    pub async fn join_room(&self, code: &str, player_name: &str) -> Result<RoomModel, AppError> {
        let player = Player::new(display_name_or_default(player_name));
        let room = self
            .repository
            .try_join_room(code, player, Utc::now())
            .await?;
        Ok(room)
    }

    #[instrument(skip(self))]
    pub async fn leave_room(&self, code: &str, player_id: &str) -> Result<LeaveRoomResult, AppError> {
        let result = self.repository.leave_room(code, player_id, Utc::now()).await?;

        match &result {
            LeaveRoomResult::Left(room) => {
                info!(
                    room_code = %room.code,
                    player_id = %player_id,
                    new_player_count = room.player_count(),
                    "Player left room"
                );
            }
            LeaveRoomResult::RoomClosed => {
                info!(room_code = %code, "Room closed after last player left");
            }
            LeaveRoomResult::PlayerNotInRoom(_) => {
                debug!(room_code = %code, player_id = %player_id, "Player was not in room");
            }
        }

        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn start_game(&self, code: &str, player_id: &str) -> Result<RoomModel, AppError> {
        self.repository
            .start_round(code, player_id, self.topics.as_ref(), Utc::now())
            .await
    }

    #[instrument(skip(self, image_b64))]
    pub async fn submit_drawing(
        &self,
        code: &str,
        player_id: &str,
        image_b64: String,
    ) -> Result<RoomModel, AppError> {
        self.repository
            .submit_drawing(code, player_id, image_b64, Utc::now())
            .await
    }

    #[instrument(skip(self))]
    pub async fn play_again(&self, code: &str, player_id: &str) -> Result<RoomModel, AppError> {
        self.repository
            .play_again(code, player_id, self.topics.as_ref(), Utc::now())
            .await
    }

    /// Queues judgment for a finished round. The returned room does not yet
    /// reflect the result.
    #[instrument(skip(self))]
    pub async fn judge_room(&self, code: &str) -> Result<RoomModel, AppError> {
        let refreshed = self.repository.request_judgment(code, Utc::now()).await?;
        Ok(self.dispatch(refreshed).await)
    }

    /// Client-facing room read. May end an expired round and start judging.
    #[instrument(skip(self))]
    pub async fn get_room_details(&self, code: &str) -> Result<RoomModel, AppError> {
        let refreshed = self.repository.refresh_room(code, Utc::now()).await?;
        Ok(self.dispatch(refreshed).await)
    }

    async fn dispatch(&self, refreshed: RefreshedRoom) -> RoomModel {
        let RefreshedRoom { room, job } = refreshed;
        let Some(job) = job else {
            return room;
        };

        if let Err(job) = self.judgments.enqueue(job) {
            warn!(room_code = %job.room_code, "Judgment worker unavailable, storing fallback");
            let fallback = JudgmentResult::without_winner(JUDGE_UNAVAILABLE_SUMMARY);
            if let Err(e) = self
                .repository
                .store_judgment(&job.room_code, job.round, fallback)
                .await
            {
                error!(room_code = %job.room_code, error = %e, "Failed to store fallback judgment");
            }
        }
        room
    }
}
