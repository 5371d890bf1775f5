use std::time::Duration;

use mystic_common::games::PacingSettings;
use mystic_common::games::battle::BattleStatus;
use mystic_common::games::campaign::{CampaignProgress, LEVEL_COUNT, level_info};
use mystic_common::games::match3::{BotType, Match3Settings};
use mystic_common::log;

use super::battle_runner::{BattlePlan, run_battle};
use crate::state::SharedState;

#[derive(Debug, Clone)]
pub struct CampaignPlan {
    pub start_level: u32,
    pub battles: u32,
    pub seed: u64,
    pub board: Match3Settings,
    pub pacing: PacingSettings,
    pub bot_type: BotType,
    pub think_delay: Duration,
}

/// Plays `battles` battles in a row, moving on after each win and retrying
/// after a loss. Progress lives in memory only.
pub async fn run_campaign(
    shared_state: &SharedState,
    plan: &CampaignPlan,
) -> Result<CampaignProgress, String> {
    let Some(start) = level_info(plan.start_level) else {
        return Err(format!(
            "Start level must be between 1 and {}, got {}",
            LEVEL_COUNT, plan.start_level
        ));
    };

    let mut progress = CampaignProgress {
        unlocked_level: start.number,
        ..CampaignProgress::default()
    };
    let mut level = start.number;

    for battle_index in 0..plan.battles {
        let battle_plan = BattlePlan {
            campaign_level: level,
            profile: progress.profile.clone(),
            board: plan.board,
            pacing: plan.pacing,
            bot_type: plan.bot_type,
            think_delay: plan.think_delay,
            seed: plan.seed.wrapping_add(u64::from(battle_index)),
        };

        let boss = if level_info(level).is_some_and(|info| info.is_boss) {
            " (boss)"
        } else {
            ""
        };
        log!("Battle {} at level {}{}", battle_index + 1, level, boss);

        let outcome = run_battle(shared_state, &battle_plan).await?;
        match outcome.status {
            BattleStatus::Won { stars } => {
                let reward = progress.record_win(level, stars)?;
                log!(
                    "Won level {} with {} stars: +{} exp, +{} score, +{} gold",
                    level,
                    stars,
                    reward.exp,
                    reward.score,
                    reward.gold
                );
                if let Some(unlocked) = reward.newly_unlocked {
                    level = unlocked;
                }
            }
            BattleStatus::Lost => log!("Lost level {} to {}", level, outcome.enemy_name),
            BattleStatus::Retreated => log!("Retreated from level {}", level),
            BattleStatus::InProgress => {}
        }
    }

    Ok(progress)
}
