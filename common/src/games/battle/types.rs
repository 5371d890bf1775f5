use serde::{Deserialize, Serialize};

use crate::games::Pace;
use crate::games::match3::{GemKind, Match3Snapshot};

pub const EXP_PER_GEM: u32 = 2;
pub const SHIELD_PER_GEM: u32 = 5;
pub const HEAL_PER_GEM: u32 = 3;
pub const CHARGE_PER_GEM: u32 = 10;
pub const MAX_CHARGE: u32 = 100;
pub const HEAL_SKILL_AMOUNT: u32 = 40;
/// Bash deals this many times the player's attack.
pub const BASH_ATTACK_MULTIPLIER: u32 = 4;
pub const LEVEL_UP_MAX_HP: u32 = 15;
pub const LEVEL_UP_ATTACK: u32 = 5;
pub const BASE_MAX_EXP: u32 = 100;
pub const MAX_EXP_PER_LEVEL: u32 = 25;
pub const CRIT_MULTIPLIER: f64 = 2.0;
/// Extra damage fraction per combo step past the first.
pub const COMBO_BONUS: f64 = 0.5;
/// A run of this many gems deals exactly the player's attack.
pub const GEMS_PER_ATTACK: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub level: u32,
    pub exp: u32,
    pub max_exp: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub shield: u32,
    pub skill_charge: u32,
    pub heal_charge: u32,
    pub level_up_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub is_boss: bool,
}

impl Enemy {
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    InProgress,
    Won { stars: u8 },
    Lost,
    Retreated,
}

impl BattleStatus {
    pub fn is_over(self) -> bool {
        self != BattleStatus::InProgress
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skill {
    Heal,
    Bash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpChoice {
    MaxHp,
    Attack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    PlayerStrike {
        damage: u32,
        combo: u32,
        kind: GemKind,
        critical: bool,
    },
    Healed {
        amount: u32,
    },
    Shielded {
        amount: u32,
    },
    Charged {
        skill_charge: u32,
        heal_charge: u32,
    },
    ExpGained {
        amount: u32,
    },
    LevelUpReady,
    LevelledUp {
        level: u32,
        choice: LevelUpChoice,
    },
    SkillUsed {
        skill: Skill,
        amount: u32,
    },
    EnemyStrike {
        damage: u32,
        absorbed: u32,
    },
    Victory {
        stars: u8,
    },
    Defeat,
    Retreated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleSnapshot {
    pub campaign_level: u32,
    pub board: Match3Snapshot,
    pub player: PlayerStats,
    pub enemy: Enemy,
    pub status: BattleStatus,
    pub pending_pace: Option<Pace>,
    pub enemy_turns_due: u32,
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub campaign_level: u32,
    pub status: BattleStatus,
    pub player: PlayerStats,
    pub enemy_name: String,
    pub swaps_made: u32,
}

impl BattleOutcome {
    pub fn stars(&self) -> Option<u8> {
        match self.status {
            BattleStatus::Won { stars } => Some(stars),
            _ => None,
        }
    }
}
