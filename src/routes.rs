use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::room;
use crate::shared::AppState;

/// Builds the HTTP router for all room actions
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(|| async { "Hello from drawduel!" }))
        .route("/rooms/create", post(room::create_room))
        .route("/rooms/:room_code", get(room::get_room))
        .route("/rooms/:room_code/join", post(room::join_room))
        .route("/rooms/:room_code/leave", post(room::leave_room))
        .route("/rooms/:room_code/start-game", post(room::start_game))
        .route("/rooms/:room_code/submit-drawing", post(room::submit_drawing))
        .route("/rooms/:room_code/play-again", post(room::play_again))
        .route("/rooms/:room_code/judge", post(room::judge_room))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
