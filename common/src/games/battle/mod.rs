mod enemy;
mod game;
mod game_state;
mod session;
mod types;

pub use enemy::{ENEMY_NAMES, enemy_attack, enemy_max_hp};
pub use game::{BattleGame, BattleStep};
pub use game_state::{BattleState, match_damage, victory_stars};
pub use session::{BattleCommand, BattleSession, BattleSessionState};
pub use types::{
    BattleEvent, BattleOutcome, BattleSnapshot, BattleStatus, Enemy, LevelUpChoice, MAX_CHARGE,
    PlayerStats, Skill,
};
