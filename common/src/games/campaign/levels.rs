pub const LEVEL_COUNT: u32 = 50;
/// Every this-many levels the enemy is a boss.
pub const BOSS_INTERVAL: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    pub number: u32,
    pub is_boss: bool,
}

pub fn is_boss_level(level: u32) -> bool {
    level % BOSS_INTERVAL == 0
}

/// `None` outside `1..=LEVEL_COUNT`.
pub fn level_info(level: u32) -> Option<LevelInfo> {
    (1..=LEVEL_COUNT).contains(&level).then(|| LevelInfo {
        number: level,
        is_boss: is_boss_level(level),
    })
}

pub fn all_levels() -> impl Iterator<Item = LevelInfo> {
    (1..=LEVEL_COUNT).filter_map(level_info)
}
