use super::game_state::BattleState;
use super::types::{BattleEvent, BattleOutcome, BattleSnapshot, BattleStatus, LevelUpChoice, Skill};
use crate::games::campaign::{PlayerProfile, level_info};
use crate::games::match3::{
    EngineStep, InputOutcome, Match3GameState, Match3Settings, Position, SwapCandidate, hint,
};
use crate::games::{Pace, SessionRng};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleStep {
    Engine(EngineStep),
    EnemyAttack { damage: u32 },
}

/// Board engine and combat in one synchronous state machine. Nothing here
/// sleeps; whoever drives it waits out [`BattleGame::pending_pace`] between
/// calls to [`BattleGame::advance`].
pub struct BattleGame {
    campaign_level: u32,
    engine: Match3GameState,
    battle: BattleState,
    enemy_turns_due: u32,
    revision: u64,
}

impl BattleGame {
    pub fn new(
        campaign_level: u32,
        profile: &PlayerProfile,
        settings: Match3Settings,
        rng: &mut SessionRng,
    ) -> Result<Self, String> {
        if level_info(campaign_level).is_none() {
            return Err(format!("Unknown campaign level {}", campaign_level));
        }

        let battle = BattleState::new(campaign_level, profile, rng);
        let engine = Match3GameState::new(settings, rng)?;
        Ok(Self::from_parts(campaign_level, engine, battle))
    }

    pub fn from_parts(campaign_level: u32, engine: Match3GameState, battle: BattleState) -> Self {
        Self {
            campaign_level,
            engine,
            battle,
            enemy_turns_due: 0,
            revision: 0,
        }
    }

    pub fn engine(&self) -> &Match3GameState {
        &self.engine
    }

    pub fn battle(&self) -> &BattleState {
        &self.battle
    }

    pub fn campaign_level(&self) -> u32 {
        self.campaign_level
    }

    /// Bumped on every change; a driver that slept on a pace compares it
    /// before advancing.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn enemy_turns_due(&self) -> u32 {
        self.enemy_turns_due
    }

    pub fn is_over(&self) -> bool {
        self.battle.status().is_over()
    }

    /// The engine's pace first; once it is idle, the enemy's turn.
    pub fn pending_pace(&self) -> Option<Pace> {
        if self.is_over() {
            return None;
        }
        if let Some(pace) = self.engine.pending_pace() {
            return Some(pace);
        }
        self.enemy_turn_ready().then_some(Pace::EnemyTurn)
    }

    /// Ready for the next swap: nothing to step through and no choice
    /// waiting.
    pub fn awaiting_input(&self) -> bool {
        !self.is_over() && !self.battle.level_up_pending() && self.pending_pace().is_none()
    }

    pub fn select_cell(&mut self, pos: Position) -> InputOutcome {
        if self.is_over() || self.battle.level_up_pending() {
            return InputOutcome::Ignored;
        }
        let outcome = self.engine.select_cell(pos);
        self.touch_unless_ignored(outcome)
    }

    pub fn request_swap(&mut self, first: Position, second: Position) -> InputOutcome {
        if self.is_over() || self.battle.level_up_pending() {
            return InputOutcome::Ignored;
        }
        let outcome = self.engine.request_swap(first, second);
        self.touch_unless_ignored(outcome)
    }

    pub fn advance(&mut self, rng: &mut SessionRng) -> Option<BattleStep> {
        if self.is_over() {
            return None;
        }

        if let Some(step) = self.engine.advance(rng, &mut self.battle) {
            if matches!(
                step,
                EngineStep::SwapReverted { .. } | EngineStep::Settled { .. }
            ) {
                self.enemy_turns_due += 1;
            }
            self.revision += 1;
            return Some(BattleStep::Engine(step));
        }

        if self.enemy_turn_ready() {
            self.enemy_turns_due -= 1;
            let damage = self.battle.enemy_attack(rng);
            self.revision += 1;
            return Some(BattleStep::EnemyAttack { damage });
        }

        None
    }

    pub fn use_skill(&mut self, skill: Skill) -> Result<(), String> {
        self.battle.use_skill(skill)?;
        self.revision += 1;
        Ok(())
    }

    pub fn choose_level_up(&mut self, choice: LevelUpChoice) -> Result<(), String> {
        self.battle.choose_level_up(choice)?;
        self.revision += 1;
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<(), String> {
        self.battle.retreat()?;
        self.revision += 1;
        Ok(())
    }

    pub fn hint(&self) -> Option<SwapCandidate> {
        if self.engine.is_processing() {
            return None;
        }
        hint(self.engine.board())
    }

    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.battle.take_events()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            campaign_level: self.campaign_level,
            board: self.engine.snapshot(),
            player: self.battle.player().clone(),
            enemy: self.battle.enemy().clone(),
            status: self.battle.status(),
            pending_pace: self.pending_pace(),
            enemy_turns_due: self.enemy_turns_due,
            revision: self.revision,
        }
    }

    /// `None` while the battle is still going.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        let status = self.battle.status();
        if status == BattleStatus::InProgress {
            return None;
        }
        Some(BattleOutcome {
            campaign_level: self.campaign_level,
            status,
            player: self.battle.player().clone(),
            enemy_name: self.battle.enemy().name.clone(),
            swaps_made: self.engine.swaps_made(),
        })
    }

    fn enemy_turn_ready(&self) -> bool {
        self.enemy_turns_due > 0 && self.engine.is_idle() && !self.battle.level_up_pending()
    }

    fn touch_unless_ignored(&mut self, outcome: InputOutcome) -> InputOutcome {
        if outcome != InputOutcome::Ignored {
            self.revision += 1;
        }
        outcome
    }
}
