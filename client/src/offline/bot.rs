use std::time::Duration;

use mystic_common::games::SessionRng;
use mystic_common::games::battle::{
    BattleCommand, BattleSnapshot, LevelUpChoice, MAX_CHARGE, Skill,
};
use mystic_common::games::match3::{Board, BotType, calculate_swap};
use mystic_common::{debug_log, log};
use tokio::sync::mpsc;

use crate::state::SharedState;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);
/// Polls on an unchanged snapshot before acting on it again.
const STALL_POLLS: u32 = 500;
/// Below this share of max hp the bot heals and levels max hp.
const LOW_HP_RATIO: f64 = 0.5;

fn is_low_hp(snapshot: &BattleSnapshot) -> bool {
    let player = &snapshot.player;
    f64::from(player.hp) < f64::from(player.max_hp) * LOW_HP_RATIO
}

/// What the bot does with a snapshot. `None` while the battle is busy or
/// over.
pub fn decide(
    snapshot: &BattleSnapshot,
    bot_type: BotType,
    rng: &mut SessionRng,
) -> Option<BattleCommand> {
    if snapshot.status.is_over() {
        return None;
    }

    let player = &snapshot.player;
    if player.level_up_pending {
        let choice = if is_low_hp(snapshot) {
            LevelUpChoice::MaxHp
        } else {
            LevelUpChoice::Attack
        };
        return Some(BattleCommand::ChooseLevelUp(choice));
    }

    if snapshot.pending_pace.is_some() || snapshot.board.processing {
        return None;
    }

    if player.heal_charge >= MAX_CHARGE && is_low_hp(snapshot) {
        return Some(BattleCommand::UseSkill(Skill::Heal));
    }
    if player.skill_charge >= MAX_CHARGE {
        return Some(BattleCommand::UseSkill(Skill::Bash));
    }

    let board = Board::from_cells(snapshot.board.size, snapshot.board.cells.clone()).ok()?;
    let command = match calculate_swap(bot_type, &board, rng) {
        Some(swap) => BattleCommand::Swap {
            first: swap.first,
            second: swap.second,
        },
        None => BattleCommand::Retreat,
    };
    Some(command)
}

pub async fn bot_task(
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<BattleCommand>,
    bot_type: BotType,
    think_delay: Duration,
    seed: u64,
) {
    let mut rng = SessionRng::new(seed);
    let mut acted_on: Option<u64> = None;
    let mut stalled = 0;

    loop {
        tokio::time::sleep(think_delay.max(MIN_POLL_INTERVAL)).await;

        if shared_state.outcome().is_some() {
            break;
        }
        let Some(snapshot) = shared_state.latest_snapshot() else {
            continue;
        };

        if acted_on == Some(snapshot.revision) {
            stalled += 1;
            if stalled < STALL_POLLS {
                continue;
            }
            debug_log!("Bot retrying on revision {}", snapshot.revision);
        }
        stalled = 0;

        let Some(command) = decide(&snapshot, bot_type, &mut rng) else {
            continue;
        };
        debug_log!("Bot sends {:?}", command);
        if command_tx.send(command).is_err() {
            log!("Battle stopped listening, bot exits");
            break;
        }
        acted_on = Some(snapshot.revision);
    }
}
