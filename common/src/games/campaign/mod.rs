mod levels;
mod progress;

pub use levels::{BOSS_INTERVAL, LEVEL_COUNT, LevelInfo, all_levels, is_boss_level, level_info};
pub use progress::{
    CampaignProgress, EXP_PER_PROFILE_LEVEL, EXP_PER_STAR, GOLD_PER_STAR, MAX_STARS,
    PlayerProfile, SCORE_PER_STAR, WinReward,
};
