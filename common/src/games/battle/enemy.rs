use super::types::Enemy;
use crate::games::SessionRng;
use crate::games::campaign::is_boss_level;

pub const ENEMY_NAMES: [&str; 8] = [
    "Shadow Stalker",
    "Void Weaver",
    "Flame Acolyte",
    "Frost Golem",
    "Ancient Treant",
    "Crystal Wyvern",
    "Abyssal Knight",
    "Spirit Wolf",
];

const BASE_HP: f64 = 100.0;
const HP_GROWTH: f64 = 1.15;
const BOSS_HP_MULTIPLIER: f64 = 2.5;
const BASE_ATTACK: f64 = 5.0;
const ATTACK_GROWTH: f64 = 1.1;
/// Enemy hits land somewhere in `[attack * MIN, attack * (MIN + SPREAD))`.
const ATTACK_ROLL_MIN: f64 = 0.8;
const ATTACK_ROLL_SPREAD: f64 = 0.4;

pub fn enemy_max_hp(level: u32) -> u32 {
    let exponent = i32::try_from(level).unwrap_or(i32::MAX);
    let base = (BASE_HP * HP_GROWTH.powi(exponent)).floor();
    let hp = if is_boss_level(level) {
        base * BOSS_HP_MULTIPLIER
    } else {
        base
    };
    hp.floor() as u32
}

pub fn enemy_attack(level: u32) -> u32 {
    let exponent = i32::try_from(level).unwrap_or(i32::MAX);
    (BASE_ATTACK * ATTACK_GROWTH.powi(exponent)).floor() as u32
}

impl Enemy {
    pub fn for_level(level: u32, rng: &mut SessionRng) -> Self {
        let name = rng.choose(&ENEMY_NAMES).copied().unwrap_or(ENEMY_NAMES[0]);
        let max_hp = enemy_max_hp(level);
        Self {
            name: name.to_string(),
            level,
            hp: max_hp,
            max_hp,
            attack: enemy_attack(level),
            is_boss: is_boss_level(level),
        }
    }

    pub fn roll_damage(&self, rng: &mut SessionRng) -> u32 {
        let factor = ATTACK_ROLL_MIN + rng.random_unit() * ATTACK_ROLL_SPREAD;
        (f64::from(self.attack) * factor).floor() as u32
    }
}
