use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    /// Creates a player with a fresh UUID
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
        }
    }
}

/// Stage of a room in the round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Lobby,
    Drawing,
    /// Reserved for multi-round play, nothing transitions here yet
    RoundTransition,
    GameOver,
}

/// A drawing handed in during a round. Name and topic are copied at submit
/// time so later renames or topic changes don't affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedDrawing {
    pub drawer_id: String,
    pub drawer_name: String,
    pub topic: String,
    pub image_b64: String,
}

/// Outcome of judging a round. An empty `winner_id` means no winner.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JudgmentResult {
    pub summary: String,
    pub winner_id: String,
    pub winner_name: String,
}

impl JudgmentResult {
    /// Result without a winner, used for degraded judgments
    pub fn without_winner(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            winner_id: String::new(),
            winner_name: String::new(),
        }
    }

    pub fn has_winner(&self) -> bool {
        !self.winner_id.is_empty()
    }
}

/// In-memory model of a single game room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    pub code: String,
    pub name: String,
    pub host_id: String,
    pub players: Vec<Player>, // Insertion order decides host succession
    pub max_players: usize,
    pub min_players_to_start: usize,

    pub game_phase: GamePhase,
    pub current_topic: Option<String>,
    pub round_start_time: Option<DateTime<Utc>>,
    pub round_duration_seconds: u64,

    pub submitted_drawings: Vec<SubmittedDrawing>,
    pub judgment_result: Option<JudgmentResult>,

    /// Incremented on every round start, stale judgments carry an older value
    #[serde(skip)]
    pub round: u64,
    #[serde(skip)]
    pub judgment_pending: bool,
}

impl RoomModel {
    /// Creates a lobby-phase room with the host as its only player
    pub fn new(code: String, name: Option<String>, host: Player, config: &GameConfig) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Room {}", code));

        Self {
            code,
            name,
            host_id: host.id.clone(),
            players: vec![host],
            max_players: config.max_players,
            min_players_to_start: config.min_players_to_start,
            game_phase: GamePhase::Lobby,
            current_topic: None,
            round_start_time: None,
            round_duration_seconds: config.round_duration_seconds,
            submitted_drawings: Vec::new(),
            judgment_result: None,
            round: 0,
            judgment_pending: false,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host_id == player_id
    }

    pub fn has_submitted(&self, player_id: &str) -> bool {
        self.submitted_drawings
            .iter()
            .any(|d| d.drawer_id == player_id)
    }

    /// True while a round is underway (anything but lobby and game over)
    pub fn is_round_active(&self) -> bool {
        !matches!(self.game_phase, GamePhase::Lobby | GamePhase::GameOver)
    }

    pub fn has_enough_players(&self) -> bool {
        self.players.len() >= self.min_players_to_start
    }
}
