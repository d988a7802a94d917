use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::room::service::RoomService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<RoomService>,
}

impl AppState {
    pub fn new(room_service: Arc<RoomService>) -> Self {
        Self { room_service }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "detail": detail
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::config::GameConfig;
    use crate::judge::{start_judgment_worker, Judge, JudgeEntry, JudgeError};
    use crate::room::repository::{InMemoryRoomRepository, RoomRepository};
    use crate::room::topics::FixedTopicPicker;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Judge that always names the first drawer as the winner
    pub struct FirstDrawerJudge;

    #[async_trait]
    impl Judge for FirstDrawerJudge {
        async fn judge(&self, entries: &[JudgeEntry]) -> Result<String, JudgeError> {
            let mut text = String::from("Descriptions:\n");
            for entry in entries {
                text.push_str(&format!("- {}: a bold take on {}\n", entry.drawer_name, entry.topic));
            }
            if let Some(first) = entries.first() {
                text.push_str(&format!("Winner: {}\nReason: it was first\n", first.drawer_name));
            }
            Ok(text)
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        game_config: GameConfig,
        room_repository: Option<Arc<dyn RoomRepository + Send + Sync>>,
        judge: Option<Arc<dyn Judge>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                game_config: GameConfig::default(),
                room_repository: None,
                judge: None,
            }
        }

        pub fn with_game_config(mut self, config: GameConfig) -> Self {
            self.game_config = config;
            self
        }

        pub fn with_room_repository(mut self, repo: Arc<dyn RoomRepository + Send + Sync>) -> Self {
            self.room_repository = Some(repo);
            self
        }

        pub fn with_judge(mut self, judge: Arc<dyn Judge>) -> Self {
            self.judge = Some(judge);
            self
        }

        /// Must be called inside a tokio runtime since it spawns the judgment worker
        pub fn build(self) -> AppState {
            let repository = self
                .room_repository
                .unwrap_or_else(|| Arc::new(InMemoryRoomRepository::new()));
            let judge = self.judge.unwrap_or_else(|| Arc::new(FirstDrawerJudge));
            let (queue, _worker) =
                start_judgment_worker(repository.clone(), judge, Duration::from_secs(5));

            let service = RoomService::new(repository, queue, self.game_config)
                .with_topic_picker(Arc::new(FixedTopicPicker::new("Robot")));
            AppState::new(Arc::new(service))
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
