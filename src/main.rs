use drawduel::{
    config::AppConfig,
    judge::{start_judgment_worker, GeminiJudge},
    room::repository::InMemoryRoomRepository,
    routes::build_router,
    AppState, RoomService,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawduel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting drawduel room server");

    let config = AppConfig::from_env();

    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let judge = Arc::new(GeminiJudge::new(config.judge.clone()));
    let (judgments, _worker) = start_judgment_worker(
        room_repository.clone(),
        judge,
        config.judge.request_timeout,
    );

    let room_service = RoomService::new(room_repository, judgments, config.game.clone());
    let app = build_router(
        AppState::new(Arc::new(room_service)),
        &config.server.allowed_origins,
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!(bind_addr = %config.server.bind_addr, "Server running");
    axum::serve(listener, app).await
}
