use std::time::Duration;

use drawduel::RoomModel;

use super::setup::TestSetup;

impl TestSetup {
    pub async fn submit(&self, room: &RoomModel, player_id: &str) -> RoomModel {
        self.service
            .submit_drawing(&room.code, player_id, "iVBORw0KGgo=".to_string())
            .await
            .unwrap()
    }

    /// Polls the room like a client would until a judgment shows up
    pub async fn wait_for_judgment(&self, code: &str) -> RoomModel {
        for _ in 0..200 {
            let room = self.service.get_room_details(code).await.unwrap();
            if room.judgment_result.is_some() {
                return room;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("judgment for room {} never arrived", code);
    }
}
