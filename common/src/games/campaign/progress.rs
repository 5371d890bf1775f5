use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::levels::{LEVEL_COUNT, level_info};

pub const MAX_STARS: u8 = 3;
pub const EXP_PER_STAR: u32 = 20;
pub const SCORE_PER_STAR: u64 = 500;
pub const GOLD_PER_STAR: u32 = 10;
/// Profile experience needed for one profile level.
pub const EXP_PER_PROFILE_LEVEL: u32 = 100;

/// Long-lived player stats carried from battle to battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub level: u32,
    pub exp: u32,
    pub gold: u32,
    pub score: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            level: 1,
            exp: 0,
            gold: 0,
            score: 0,
            hp: 100,
            max_hp: 100,
            attack: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinReward {
    pub exp: u32,
    pub score: u64,
    pub gold: u32,
    pub levels_gained: u32,
    pub newly_unlocked: Option<u32>,
    pub new_best: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgress {
    pub unlocked_level: u32,
    /// Best stars per completed level.
    pub stars: BTreeMap<u32, u8>,
    pub profile: PlayerProfile,
}

impl Default for CampaignProgress {
    fn default() -> Self {
        Self {
            unlocked_level: 1,
            stars: BTreeMap::new(),
            profile: PlayerProfile::default(),
        }
    }
}

impl CampaignProgress {
    pub fn can_play(&self, level: u32) -> bool {
        level_info(level).is_some() && level <= self.unlocked_level
    }

    pub fn stars_for(&self, level: u32) -> Option<u8> {
        self.stars.get(&level).copied()
    }

    pub fn completed_count(&self) -> usize {
        self.stars.len()
    }

    pub fn total_stars(&self) -> u32 {
        self.stars.values().map(|&stars| u32::from(stars)).sum()
    }

    /// Every level completed with full stars.
    pub fn is_perfect(&self) -> bool {
        self.stars.len() == LEVEL_COUNT as usize
            && self.stars.values().all(|&stars| stars == MAX_STARS)
    }

    pub fn record_win(&mut self, level: u32, stars: u8) -> Result<WinReward, String> {
        if !self.can_play(level) {
            return Err(format!(
                "Level {} is not playable (unlocked up to {})",
                level, self.unlocked_level
            ));
        }
        if !(1..=MAX_STARS).contains(&stars) {
            return Err(format!(
                "Stars must be between 1 and {}, got {}",
                MAX_STARS, stars
            ));
        }

        let star_count = u32::from(stars);
        let exp = EXP_PER_STAR * star_count;
        let score = SCORE_PER_STAR * u64::from(stars);
        let gold = GOLD_PER_STAR * star_count;

        let profile = &mut self.profile;
        let total_exp = profile.exp + exp;
        let levels_gained = total_exp / EXP_PER_PROFILE_LEVEL;
        profile.level += levels_gained;
        profile.exp = total_exp % EXP_PER_PROFILE_LEVEL;
        profile.score += score;
        profile.gold += gold;

        let previous = self.stars_for(level).unwrap_or(0);
        let new_best = stars > previous;
        self.stars.insert(level, previous.max(stars));

        let next = level + 1;
        let newly_unlocked = if next > self.unlocked_level && next <= LEVEL_COUNT {
            self.unlocked_level = next;
            Some(next)
        } else {
            None
        };

        Ok(WinReward {
            exp,
            score,
            gold,
            levels_gained,
            newly_unlocked,
            new_best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_campaign_starts_at_level_one() {
        let progress = CampaignProgress::default();

        assert!(progress.can_play(1));
        assert!(!progress.can_play(2));
        assert!(!progress.can_play(0));
        assert_eq!(progress.profile.attack, 10);
        assert_eq!(progress.profile.max_hp, 100);
    }

    #[test]
    fn test_win_unlocks_next_and_pays_rewards() {
        let mut progress = CampaignProgress::default();

        let reward = progress.record_win(1, 2).unwrap();

        assert_eq!(reward.exp, 40);
        assert_eq!(reward.score, 1000);
        assert_eq!(reward.gold, 20);
        assert_eq!(reward.newly_unlocked, Some(2));
        assert!(reward.new_best);
        assert_eq!(progress.unlocked_level, 2);
        assert_eq!(progress.stars_for(1), Some(2));
        assert_eq!(progress.profile.exp, 40);
        assert_eq!(progress.profile.gold, 20);
    }

    #[test]
    fn test_replay_keeps_best_stars_and_unlock() {
        let mut progress = CampaignProgress::default();
        progress.record_win(1, 3).unwrap();
        progress.record_win(2, 1).unwrap();

        let reward = progress.record_win(1, 1).unwrap();

        assert!(!reward.new_best);
        assert_eq!(reward.newly_unlocked, None);
        assert_eq!(progress.stars_for(1), Some(3));
        assert_eq!(progress.unlocked_level, 3);
        assert_eq!(progress.total_stars(), 4);
    }

    #[test]
    fn test_profile_exp_rolls_over_into_levels() {
        let mut progress = CampaignProgress::default();
        progress.profile.exp = 90;

        let reward = progress.record_win(1, 3).unwrap();

        assert_eq!(reward.levels_gained, 1);
        assert_eq!(progress.profile.level, 2);
        assert_eq!(progress.profile.exp, 50);
    }

    #[test]
    fn test_locked_level_is_rejected() {
        let mut progress = CampaignProgress::default();

        assert!(progress.record_win(3, 3).is_err());
        assert!(progress.record_win(51, 3).is_err());
        assert!(progress.record_win(1, 0).is_err());
        assert!(progress.record_win(1, 4).is_err());
        assert_eq!(progress, CampaignProgress::default());
    }

    #[test]
    fn test_last_level_does_not_unlock_past_end() {
        let mut progress = CampaignProgress {
            unlocked_level: LEVEL_COUNT,
            ..CampaignProgress::default()
        };

        let reward = progress.record_win(LEVEL_COUNT, 3).unwrap();

        assert_eq!(reward.newly_unlocked, None);
        assert_eq!(progress.unlocked_level, LEVEL_COUNT);
    }

    #[test]
    fn test_perfect_campaign() {
        let mut progress = CampaignProgress::default();
        for level in 1..=LEVEL_COUNT {
            progress.record_win(level, 3).unwrap();
        }
        assert!(progress.is_perfect());

        progress.stars.insert(7, 2);
        assert!(!progress.is_perfect());
        assert_eq!(progress.completed_count(), 50);
    }

    #[test]
    fn test_progress_survives_yaml_round_trip() {
        let mut progress = CampaignProgress::default();
        progress.record_win(1, 3).unwrap();

        let yaml = serde_yaml_ng::to_string(&progress).unwrap();
        let restored: CampaignProgress = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(restored, progress);
    }
}
