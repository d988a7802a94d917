// Public API - what other modules can use
pub use handlers::{
    create_room, get_room, join_room, judge_room, leave_room, play_again, start_game,
    submit_drawing,
};

// Internal modules
pub mod errors;
pub mod generators;
mod handlers;
mod lifecycle;
pub mod models;
pub mod repository;
pub mod round_timer;
pub mod service;
pub mod topics;
pub mod types;
