// Library crate for the drawduel room server
// This file exposes the public API for integration tests

pub mod config;
pub mod judge;
pub mod room;
pub mod routes;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, GameConfig, JudgeConfig};
pub use room::{
    models::{GamePhase, JudgmentResult, Player, RoomModel},
    repository::{InMemoryRoomRepository, LeaveRoomResult, RoomRepository},
    service::RoomService,
};
pub use shared::{AppError, AppState};
