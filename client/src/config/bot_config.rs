use mystic_common::config::{Validate, ensure_in_range};
use mystic_common::games::match3::BotType;
use serde::{Deserialize, Serialize};

const MAX_THINK_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    pub bot_type: BotType,
    /// Pause before each bot decision, on top of the battle's own pacing.
    pub think_delay_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_type: BotType::Greedy,
            think_delay_ms: 200,
        }
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<(), String> {
        ensure_in_range("Bot think delay", self.think_delay_ms, 0, MAX_THINK_DELAY_MS)
    }
}
