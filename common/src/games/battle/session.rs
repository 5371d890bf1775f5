use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use super::game::{BattleGame, BattleStep};
use super::types::{BattleOutcome, LevelUpChoice, Skill};
use crate::games::campaign::PlayerProfile;
use crate::games::match3::{EngineStep, InputOutcome, Match3Settings, Position};
use crate::games::{GameBroadcaster, PacingSettings, SessionRng};
use crate::{debug_log, log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleCommand {
    SelectCell(Position),
    /// Two inputs in one go: arm `first`, then pick `second`.
    Swap { first: Position, second: Position },
    UseSkill(Skill),
    ChooseLevelUp(LevelUpChoice),
    Retreat,
}

#[derive(Clone)]
pub struct BattleSessionState {
    pub session_id: String,
    pub game: Arc<Mutex<BattleGame>>,
    pub rng: Arc<Mutex<SessionRng>>,
    pub action_notify: Arc<Notify>,
    pub pacing: PacingSettings,
}

impl BattleSessionState {
    pub fn create(
        session_id: impl Into<String>,
        campaign_level: u32,
        profile: &PlayerProfile,
        settings: Match3Settings,
        pacing: PacingSettings,
        seed: u64,
    ) -> Result<Self, String> {
        let mut rng = SessionRng::new(seed);
        let game = BattleGame::new(campaign_level, profile, settings, &mut rng)?;

        Ok(Self {
            session_id: session_id.into(),
            game: Arc::new(Mutex::new(game)),
            rng: Arc::new(Mutex::new(rng)),
            action_notify: Arc::new(Notify::new()),
            pacing,
        })
    }
}

pub struct BattleSession;

impl BattleSession {
    /// Drives the battle until it ends: publishes a snapshot, waits out the
    /// pending pace (or a command when there is none), then advances one
    /// step if nothing changed in the meantime.
    pub async fn run<B: GameBroadcaster>(
        state: &BattleSessionState,
        broadcaster: &B,
    ) -> BattleOutcome {
        loop {
            let (snapshot, outcome, pace, revision) = {
                let game = state.game.lock().await;
                (
                    game.snapshot(),
                    game.outcome(),
                    game.pending_pace(),
                    game.revision(),
                )
            };

            broadcaster.broadcast_state(snapshot).await;

            if let Some(outcome) = outcome {
                log!(
                    "[session:{}] Battle over: {:?} after {} swaps",
                    state.session_id,
                    outcome.status,
                    outcome.swaps_made
                );
                broadcaster.broadcast_game_over(outcome.clone()).await;
                return outcome;
            }

            let Some(pace) = pace else {
                state.action_notify.notified().await;
                continue;
            };

            tokio::time::sleep(state.pacing.duration(pace)).await;

            let mut game = state.game.lock().await;
            if game.revision() != revision {
                continue;
            }
            let mut rng = state.rng.lock().await;
            if let Some(step) = game.advance(&mut rng) {
                Self::log_step(state, &step);
            }
            for event in game.take_events() {
                debug_log!("[session:{}] {:?}", state.session_id, event);
            }
        }
    }

    pub async fn handle_command(
        state: &BattleSessionState,
        command: BattleCommand,
    ) -> Result<(), String> {
        let result = {
            let mut game = state.game.lock().await;
            match command {
                BattleCommand::SelectCell(pos) => {
                    let outcome = game.select_cell(pos);
                    debug_log!("[session:{}] Select {} -> {:?}", state.session_id, pos, outcome);
                    Ok(())
                }
                BattleCommand::Swap { first, second } => Self::swap(&mut game, first, second),
                BattleCommand::UseSkill(skill) => game.use_skill(skill),
                BattleCommand::ChooseLevelUp(choice) => game.choose_level_up(choice),
                BattleCommand::Retreat => game.retreat(),
            }
        };

        state.action_notify.notify_one();
        result
    }

    /// Only an adjacent in-range pair reaches the engine, so a rejected swap
    /// leaves the selection as it was.
    fn swap(game: &mut BattleGame, first: Position, second: Position) -> Result<(), String> {
        let board = game.engine().board();
        if !board.contains(first) || !board.contains(second) || !first.is_adjacent(second) {
            return Err(format!("Cells {} and {} are not neighbours", first, second));
        }

        match game.request_swap(first, second) {
            InputOutcome::SwapAccepted { .. } => Ok(()),
            other => Err(format!("Swap {} <-> {} not accepted: {:?}", first, second, other)),
        }
    }

    fn log_step(state: &BattleSessionState, step: &BattleStep) {
        match step {
            BattleStep::Engine(EngineStep::Settled { combo, reshuffled }) => {
                debug_log!("[session:{}] Settled at combo {}", state.session_id, combo);
                if *reshuffled {
                    log!("[session:{}] No moves left, board reshuffled", state.session_id);
                }
            }
            BattleStep::Engine(EngineStep::Cleared(event)) => {
                debug_log!(
                    "[session:{}] Cleared {} ({}) combo {}",
                    state.session_id,
                    event.cleared_count,
                    event.gem_kind,
                    event.combo
                );
            }
            BattleStep::EnemyAttack { damage } => {
                debug_log!("[session:{}] Enemy hits for {}", state.session_id, damage);
            }
            BattleStep::Engine(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::games::battle::types::{BattleSnapshot, BattleStatus, MAX_CHARGE};
    use crate::games::match3::{Board, BotType, calculate_swap};

    #[derive(Clone, Default)]
    struct RecordingBroadcaster {
        states: Arc<Mutex<Vec<BattleSnapshot>>>,
        outcomes: Arc<Mutex<Vec<BattleOutcome>>>,
    }

    impl GameBroadcaster for RecordingBroadcaster {
        async fn broadcast_state(&self, snapshot: BattleSnapshot) {
            self.states.lock().await.push(snapshot);
        }

        async fn broadcast_game_over(&self, outcome: BattleOutcome) {
            self.outcomes.lock().await.push(outcome);
        }
    }

    fn instant_session(seed: u64) -> BattleSessionState {
        BattleSessionState::create(
            "test",
            1,
            &PlayerProfile::default(),
            Match3Settings::default(),
            PacingSettings::instant(),
            seed,
        )
        .unwrap()
    }

    async fn wait_for_input(state: &BattleSessionState) -> Option<BattleSnapshot> {
        loop {
            {
                let game = state.game.lock().await;
                if game.is_over() {
                    return None;
                }
                if game.battle().level_up_pending() || game.awaiting_input() {
                    return Some(game.snapshot());
                }
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_greedy_bot_finishes_a_battle() {
        let state = instant_session(42);
        let broadcaster = RecordingBroadcaster::default();
        let runner = {
            let state = state.clone();
            let broadcaster = broadcaster.clone();
            tokio::spawn(async move { BattleSession::run(&state, &broadcaster).await })
        };
        let mut bot_rng = SessionRng::new(7);

        while let Some(snapshot) = wait_for_input(&state).await {
            let command = if snapshot.player.level_up_pending {
                BattleCommand::ChooseLevelUp(LevelUpChoice::Attack)
            } else if snapshot.player.skill_charge >= MAX_CHARGE {
                BattleCommand::UseSkill(Skill::Bash)
            } else {
                let board = Board::from_cells(snapshot.board.size, snapshot.board.cells).unwrap();
                match calculate_swap(BotType::Greedy, &board, &mut bot_rng) {
                    Some(swap) => BattleCommand::Swap {
                        first: swap.first,
                        second: swap.second,
                    },
                    None => BattleCommand::Retreat,
                }
            };
            BattleSession::handle_command(&state, command).await.unwrap();
        }

        let outcome = runner.await.unwrap();
        assert!(outcome.status.is_over());
        assert!(outcome.swaps_made > 0 || outcome.status == BattleStatus::Retreated);
        assert_eq!(broadcaster.outcomes.lock().await.as_slice(), &[outcome]);
        assert!(!broadcaster.states.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_retreat_ends_session() {
        let state = instant_session(5);
        let broadcaster = RecordingBroadcaster::default();
        let runner = {
            let state = state.clone();
            let broadcaster = broadcaster.clone();
            tokio::spawn(async move { BattleSession::run(&state, &broadcaster).await })
        };

        BattleSession::handle_command(&state, BattleCommand::Retreat)
            .await
            .unwrap();

        let outcome = runner.await.unwrap();
        assert_eq!(outcome.status, BattleStatus::Retreated);
        assert!(
            BattleSession::handle_command(&state, BattleCommand::Retreat)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_uncharged_skill_is_an_error() {
        let state = instant_session(5);

        let result =
            BattleSession::handle_command(&state, BattleCommand::UseSkill(Skill::Heal)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_far_apart_swap_is_rejected_without_side_effects() {
        let state = instant_session(5);
        let revision = state.game.lock().await.revision();

        let far = BattleSession::handle_command(
            &state,
            BattleCommand::Swap {
                first: Position::new(0, 0),
                second: Position::new(0, 2),
            },
        )
        .await;
        let off_board = BattleSession::handle_command(
            &state,
            BattleCommand::Swap {
                first: Position::new(8, 0),
                second: Position::new(7, 0),
            },
        )
        .await;

        assert!(far.is_err());
        assert!(off_board.is_err());
        let game = state.game.lock().await;
        assert_eq!(game.revision(), revision);
        assert_eq!(game.engine().selection(), None);
    }

    #[test]
    fn test_create_rejects_locked_level() {
        let result = BattleSessionState::create(
            "test",
            99,
            &PlayerProfile::default(),
            Match3Settings::default(),
            PacingSettings::instant(),
            1,
        );

        assert!(result.is_err());
    }
}
