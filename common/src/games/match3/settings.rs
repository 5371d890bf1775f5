use serde::{Deserialize, Serialize};

use super::types::{BOARD_SIZE, GemKind};
use crate::config::{Validate, ensure_in_range};

pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 16;
pub const MIN_PALETTE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match3Settings {
    pub board_size: usize,
    pub palette_size: usize,
    /// Regenerate the board when a cascade settles with no swap that matches.
    #[serde(default = "default_reshuffle")]
    pub reshuffle_when_stuck: bool,
}

fn default_reshuffle() -> bool {
    true
}

impl Match3Settings {
    pub fn palette(&self) -> &'static [GemKind] {
        GemKind::palette(self.palette_size)
    }
}

impl Default for Match3Settings {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            palette_size: GemKind::ALL.len(),
            reshuffle_when_stuck: true,
        }
    }
}

impl Validate for Match3Settings {
    fn validate(&self) -> Result<(), String> {
        ensure_in_range("Board size", self.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE)?;
        ensure_in_range(
            "Palette size",
            self.palette_size,
            MIN_PALETTE_SIZE,
            GemKind::ALL.len(),
        )?;
        Ok(())
    }
}
