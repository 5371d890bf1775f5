use mystic_common::games::GameBroadcaster;
use mystic_common::games::battle::{BattleOutcome, BattleSnapshot};

use crate::state::SharedState;

#[derive(Clone)]
pub struct LocalBroadcaster {
    shared_state: SharedState,
}

impl LocalBroadcaster {
    pub fn new(shared_state: SharedState) -> Self {
        Self { shared_state }
    }
}

impl GameBroadcaster for LocalBroadcaster {
    async fn broadcast_state(&self, snapshot: BattleSnapshot) {
        self.shared_state.update_snapshot(snapshot);
    }

    async fn broadcast_game_over(&self, outcome: BattleOutcome) {
        self.shared_state.push_event(format!(
            "Level {} vs {}: {:?}",
            outcome.campaign_level, outcome.enemy_name, outcome.status
        ));
        self.shared_state.set_outcome(outcome);
    }
}
