use thiserror::Error;

use crate::shared::AppError;

/// Reasons a room action is rejected by the round state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Only the host can {0}.")]
    NotHost(&'static str),

    #[error("Room is full")]
    RoomFull,

    #[error("Cannot join an active game.")]
    GameInProgress,

    #[error("{0}")]
    WrongPhase(&'static str),

    #[error("Need at least {0} players to start.")]
    NotEnoughPlayers(usize),

    #[error("Need at least {0} players. Returning to Lobby.")]
    ReturnedToLobby(usize),

    #[error("You have already submitted your drawing.")]
    DuplicateSubmission,

    #[error("Player {0} is not in this room.")]
    NotInRoom(String),

    #[error("The drawing round is over.")]
    RoundOver,
}

impl From<RoomError> for AppError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotHost(_) | RoomError::RoomFull | RoomError::GameInProgress => {
                AppError::Forbidden(err.to_string())
            }
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}
