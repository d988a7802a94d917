//! Round state machine for a single room.
//!
//! Every transition validates first and only then mutates, so a rejected
//! action leaves the room untouched. The registry calls these methods while
//! holding its lock.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::errors::RoomError;
use super::models::{GamePhase, JudgmentResult, Player, RoomModel, SubmittedDrawing};
use super::round_timer::round_expired;
use super::topics::TopicPicker;
use crate::judge::{JudgeEntry, JudgmentJob, NO_DRAWINGS_SUMMARY};

impl RoomModel {
    /// Applies the lazy round timeout. Returns true if the round just ended.
    pub fn expire_round_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.game_phase != GamePhase::Drawing {
            return false;
        }
        let Some(started_at) = self.round_start_time else {
            return false;
        };
        if round_expired(started_at, now, self.round_duration_seconds) {
            info!(room_code = %self.code, "Round timed out");
            self.game_phase = GamePhase::GameOver;
            return true;
        }
        false
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), RoomError> {
        if self.is_round_active() {
            return Err(RoomError::GameInProgress);
        }
        if self.is_full() {
            return Err(RoomError::RoomFull);
        }
        self.players.push(player);
        Ok(())
    }

    /// Removes a player and repairs the room around the gap.
    ///
    /// Returns false if the player was not in the room. Callers must delete
    /// the room when this leaves it empty.
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        if !self.has_player(player_id) {
            return false;
        }
        self.players.retain(|p| p.id != player_id);
        if self.players.is_empty() {
            return true;
        }

        self.submitted_drawings.retain(|d| d.drawer_id != player_id);

        if self.host_id == player_id {
            if let Some(new_host) = self.players.first() {
                info!(
                    room_code = %self.code,
                    new_host_id = %new_host.id,
                    new_host_name = %new_host.name,
                    "Host left, assigning new host"
                );
                self.host_id = new_host.id.clone();
            }
        }

        if self.is_round_active() {
            if !self.has_enough_players() {
                info!(room_code = %self.code, "Round aborted due to insufficient players");
                self.game_phase = GamePhase::GameOver;
                self.current_topic = None;
                self.round_start_time = None;
            } else if self.game_phase == GamePhase::Drawing && self.all_players_submitted() {
                debug!(room_code = %self.code, "Remaining players have all submitted");
                self.game_phase = GamePhase::GameOver;
            }
        }
        true
    }

    /// Host-only transition from the lobby into a drawing round
    pub fn start_round(
        &mut self,
        player_id: &str,
        topics: &dyn TopicPicker,
        now: DateTime<Utc>,
    ) -> Result<(), RoomError> {
        if !self.is_host(player_id) {
            return Err(RoomError::NotHost("start the game"));
        }
        if self.game_phase != GamePhase::Lobby {
            return Err(RoomError::WrongPhase(
                "Game can only be started from the lobby.",
            ));
        }
        if !self.has_enough_players() {
            return Err(RoomError::NotEnoughPlayers(self.min_players_to_start));
        }

        let topic = topics.pick(self.current_topic.as_deref());
        self.begin_round(topic, now);
        Ok(())
    }

    /// Host-only restart after game over.
    ///
    /// With too few players the room is still reset, back to the lobby, and
    /// the shortfall is reported as an error.
    pub fn play_again(
        &mut self,
        player_id: &str,
        topics: &dyn TopicPicker,
        now: DateTime<Utc>,
    ) -> Result<(), RoomError> {
        if !self.is_host(player_id) {
            return Err(RoomError::NotHost("restart the game"));
        }
        if self.game_phase != GamePhase::GameOver {
            return Err(RoomError::WrongPhase(
                "Game can only be restarted when it's over.",
            ));
        }
        if !self.has_enough_players() {
            self.reset_round(GamePhase::Lobby);
            return Err(RoomError::ReturnedToLobby(self.min_players_to_start));
        }

        let topic = topics.pick(self.current_topic.as_deref());
        self.begin_round(topic, now);
        Ok(())
    }

    /// Records one drawing per player; the round ends once everyone has submitted
    pub fn submit_drawing(
        &mut self,
        player_id: &str,
        image_b64: String,
        now: DateTime<Utc>,
    ) -> Result<(), RoomError> {
        if self.game_phase != GamePhase::Drawing {
            return Err(RoomError::WrongPhase("Not in drawing phase."));
        }
        if self.expire_round_if_due(now) {
            return Err(RoomError::RoundOver);
        }
        let drawer_name = match self.player(player_id) {
            Some(player) => player.name.clone(),
            None => return Err(RoomError::NotInRoom(player_id.to_string())),
        };
        if self.has_submitted(player_id) {
            return Err(RoomError::DuplicateSubmission);
        }

        self.submitted_drawings.push(SubmittedDrawing {
            drawer_id: player_id.to_string(),
            drawer_name,
            topic: self
                .current_topic
                .clone()
                .unwrap_or_else(|| "No Topic".to_string()),
            image_b64,
        });

        if self.all_players_submitted() {
            info!(room_code = %self.code, "All drawings submitted, ending round early");
            self.game_phase = GamePhase::GameOver;
        }
        Ok(())
    }

    /// Marks the round as being judged and returns the work to do.
    ///
    /// Returns None when nothing needs judging: wrong phase, already judged,
    /// already pending, or no drawings (which is resolved locally).
    pub fn claim_judgment(&mut self) -> Option<JudgmentJob> {
        if self.game_phase != GamePhase::GameOver
            || self.judgment_result.is_some()
            || self.judgment_pending
        {
            return None;
        }

        if self.submitted_drawings.is_empty() {
            self.judgment_result = Some(JudgmentResult::without_winner(NO_DRAWINGS_SUMMARY));
            return None;
        }

        self.judgment_pending = true;
        Some(JudgmentJob {
            room_code: self.code.clone(),
            round: self.round,
            entries: self
                .submitted_drawings
                .iter()
                .map(|d| JudgeEntry {
                    drawer_id: d.drawer_id.clone(),
                    drawer_name: d.drawer_name.clone(),
                    topic: d.topic.clone(),
                    image_b64: d.image_b64.clone(),
                })
                .collect(),
        })
    }

    /// Stores a finished judgment if it still belongs to the current round
    pub fn record_judgment(&mut self, round: u64, result: JudgmentResult) -> bool {
        if round != self.round
            || self.game_phase != GamePhase::GameOver
            || self.judgment_result.is_some()
        {
            return false;
        }
        self.judgment_result = Some(result);
        self.judgment_pending = false;
        true
    }

    fn all_players_submitted(&self) -> bool {
        !self.players.is_empty()
            && self
                .players
                .iter()
                .all(|p| self.has_submitted(&p.id))
    }

    fn begin_round(&mut self, topic: String, now: DateTime<Utc>) {
        self.reset_round(GamePhase::Drawing);
        self.round += 1;
        info!(room_code = %self.code, round = self.round, topic = %topic, "Round started");
        self.current_topic = Some(topic);
        self.round_start_time = Some(now);
    }

    fn reset_round(&mut self, phase: GamePhase) {
        self.game_phase = phase;
        self.current_topic = None;
        self.round_start_time = None;
        self.submitted_drawings.clear();
        self.judgment_result = None;
        self.judgment_pending = false;
    }
}
