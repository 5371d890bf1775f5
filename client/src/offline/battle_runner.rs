use std::time::Duration;

use mystic_common::games::PacingSettings;
use mystic_common::games::battle::{BattleOutcome, BattleSession, BattleSessionState};
use mystic_common::games::campaign::PlayerProfile;
use mystic_common::games::match3::{BotType, Match3Settings};
use mystic_common::log;
use tokio::sync::mpsc;

use super::broadcaster::LocalBroadcaster;
use super::bot::bot_task;
use crate::state::SharedState;

#[derive(Debug, Clone)]
pub struct BattlePlan {
    pub campaign_level: u32,
    pub profile: PlayerProfile,
    pub board: Match3Settings,
    pub pacing: PacingSettings,
    pub bot_type: BotType,
    pub think_delay: Duration,
    pub seed: u64,
}

/// Plays one battle with a bot: the session and the bot run as separate
/// tasks, and bot commands reach the session through this loop.
pub async fn run_battle(
    shared_state: &SharedState,
    plan: &BattlePlan,
) -> Result<BattleOutcome, String> {
    let session_id = format!("level-{}-{}", plan.campaign_level, plan.seed);
    let session_state = BattleSessionState::create(
        session_id.clone(),
        plan.campaign_level,
        &plan.profile,
        plan.board,
        plan.pacing,
        plan.seed,
    )?;

    shared_state.reset_battle();
    let broadcaster = LocalBroadcaster::new(shared_state.clone());
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();

    let mut game_handle = {
        let session_state = session_state.clone();
        tokio::spawn(async move { BattleSession::run(&session_state, &broadcaster).await })
    };
    let bot_handle = tokio::spawn(bot_task(
        shared_state.clone(),
        command_tx,
        plan.bot_type,
        plan.think_delay,
        plan.seed.wrapping_add(1),
    ));

    let outcome = loop {
        tokio::select! {
            result = &mut game_handle => {
                break result.map_err(|e| format!("Battle task failed: {}", e))?;
            }
            Some(command) = command_rx.recv() => {
                if let Err(e) = BattleSession::handle_command(&session_state, command).await {
                    log!("[session:{}] Command {:?} rejected: {}", session_id, command, e);
                    shared_state.push_event(format!("Rejected {:?}: {}", command, e));
                }
            }
        }
    };

    bot_handle.abort();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_plan(bot_type: BotType, seed: u64) -> BattlePlan {
        BattlePlan {
            campaign_level: 1,
            profile: PlayerProfile::default(),
            board: Match3Settings::default(),
            pacing: PacingSettings::instant(),
            bot_type,
            think_delay: Duration::ZERO,
            seed,
        }
    }

    #[tokio::test]
    async fn test_greedy_bot_plays_battle_to_the_end() {
        let shared_state = SharedState::new();

        let outcome = run_battle(&shared_state, &fast_plan(BotType::Greedy, 11))
            .await
            .unwrap();

        assert!(outcome.status.is_over());
        assert_eq!(shared_state.outcome(), Some(outcome));
        assert!(!shared_state.recent_events().is_empty());
    }

    #[tokio::test]
    async fn test_locked_level_fails_before_starting() {
        let shared_state = SharedState::new();
        let plan = BattlePlan {
            campaign_level: 77,
            ..fast_plan(BotType::Random, 1)
        };

        assert!(run_battle(&shared_state, &plan).await.is_err());
        assert!(shared_state.latest_snapshot().is_none());
    }
}
