use std::sync::Arc;
use std::time::Duration;

use drawduel::{
    judge::{start_judgment_worker, Judge},
    room::topics::FixedTopicPicker,
    GameConfig, InMemoryRoomRepository, RoomModel, RoomService,
};

use super::mocks::CountingJudge;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: RoomService,
    pub repository: Arc<InMemoryRoomRepository>,
}

pub struct TestSetupBuilder {
    config: GameConfig,
    judge: Arc<dyn Judge>,
    judge_timeout: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            judge: Arc::new(CountingJudge::new()),
            judge_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_round_duration(mut self, seconds: u64) -> Self {
        self.config.round_duration_seconds = seconds;
        self
    }

    pub fn with_judge(mut self, judge: Arc<dyn Judge>) -> Self {
        self.judge = judge;
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let (queue, _worker) =
            start_judgment_worker(repository.clone(), self.judge, self.judge_timeout);
        let service = RoomService::new(repository.clone(), queue, self.config)
            .with_topic_picker(Arc::new(FixedTopicPicker::new("Robot")));

        TestSetup {
            service,
            repository,
        }
    }
}

impl TestSetup {
    /// Creates a room hosted by the first name and joins everyone else
    pub async fn room_with(&self, names: &[&str]) -> RoomModel {
        let (host, guests) = names.split_first().expect("at least one player");
        let mut room = self.service.create_room(host, None).await.unwrap();
        for guest in guests {
            room = self.service.join_room(&room.code, guest).await.unwrap();
        }
        room
    }

    /// Same as `room_with`, then starts the round as host
    pub async fn started_room(&self, names: &[&str]) -> RoomModel {
        let room = self.room_with(names).await;
        self.service
            .start_game(&room.code, &room.host_id)
            .await
            .unwrap()
    }
}

pub fn player_id(room: &RoomModel, name: &str) -> String {
    room.players
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.id.clone())
        .unwrap_or_else(|| panic!("no player named {}", name))
}
