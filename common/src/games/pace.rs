use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

/// A named wait between two engine steps. The engine only says which pace it
/// is waiting on; whoever drives it decides how long that is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pace {
    /// Swapped gems are on screen before the swap commits or reverts.
    SwapFeedback,
    /// Matched cells are shown as cleared before gravity runs.
    ClearAnimation,
    /// Gems are falling before the next match check.
    DropAnimation,
    /// The combo counter stays visible before resetting to zero.
    ComboFade,
    /// Wind-up before the enemy strikes back.
    EnemyTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingSettings {
    pub swap_feedback_ms: u64,
    pub clear_animation_ms: u64,
    pub drop_animation_ms: u64,
    pub combo_fade_ms: u64,
    pub enemy_turn_ms: u64,
}

const MAX_PACE_MS: u64 = 10_000;

impl PacingSettings {
    /// No waiting at all; used by tests and fast simulations.
    pub fn instant() -> Self {
        Self {
            swap_feedback_ms: 0,
            clear_animation_ms: 0,
            drop_animation_ms: 0,
            combo_fade_ms: 0,
            enemy_turn_ms: 0,
        }
    }

    pub fn duration(&self, pace: Pace) -> Duration {
        let ms = match pace {
            Pace::SwapFeedback => self.swap_feedback_ms,
            Pace::ClearAnimation => self.clear_animation_ms,
            Pace::DropAnimation => self.drop_animation_ms,
            Pace::ComboFade => self.combo_fade_ms,
            Pace::EnemyTurn => self.enemy_turn_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            swap_feedback_ms: 300,
            clear_animation_ms: 400,
            drop_animation_ms: 300,
            combo_fade_ms: 1500,
            enemy_turn_ms: 500,
        }
    }
}

impl Validate for PacingSettings {
    fn validate(&self) -> Result<(), String> {
        let fields = [
            ("swap_feedback_ms", self.swap_feedback_ms),
            ("clear_animation_ms", self.clear_animation_ms),
            ("drop_animation_ms", self.drop_animation_ms),
            ("combo_fade_ms", self.combo_fade_ms),
            ("enemy_turn_ms", self.enemy_turn_ms),
        ];
        for (name, value) in fields {
            if value > MAX_PACE_MS {
                return Err(format!(
                    "{} must be at most {} ms, got {}",
                    name, MAX_PACE_MS, value
                ));
            }
        }
        Ok(())
    }
}
