use std::future::Future;

use super::battle::{BattleOutcome, BattleSnapshot};

/// Where a running battle session publishes what it renders to.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: BattleSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, outcome: BattleOutcome) -> impl Future<Output = ()> + Send;
}
