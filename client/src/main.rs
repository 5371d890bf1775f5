mod config;
mod offline;
mod state;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use mystic_common::games::PacingSettings;
use mystic_common::games::match3::BotType;
use mystic_common::{log, logger};

use config::get_config_manager;
use offline::{CampaignPlan, run_campaign};
use state::SharedState;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BotArg {
    Random,
    Greedy,
}

impl From<BotArg> for BotType {
    fn from(bot: BotArg) -> Self {
        match bot {
            BotArg::Random => BotType::Random,
            BotArg::Greedy => BotType::Greedy,
        }
    }
}

#[derive(Parser)]
#[command(name = "mystic_match")]
struct Args {
    /// Yaml config; defaults to mystic_match_config.yaml next to the binary.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    level: u32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    battles: u32,
    /// Overrides the bot from the config file.
    #[arg(long, value_enum)]
    bot: Option<BotArg>,
    /// Skip every pacing delay.
    #[arg(long)]
    fast: bool,
    #[arg(long)]
    use_log_prefix: bool,
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = get_config_manager(args.config.clone()).get_config()?;

    let prefix = if args.use_log_prefix {
        Some("MysticMatch".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, args.verbose || config.verbose_log);

    let seed = args.seed.unwrap_or_else(rand::random);
    let (pacing, think_delay) = if args.fast {
        (PacingSettings::instant(), Duration::ZERO)
    } else {
        (config.pacing, Duration::from_millis(config.bot.think_delay_ms))
    };
    let plan = CampaignPlan {
        start_level: args.level,
        battles: args.battles,
        seed,
        board: config.board,
        pacing,
        bot_type: args.bot.map(BotType::from).unwrap_or(config.bot.bot_type),
        think_delay,
    };
    log!(
        "Starting {} battle(s) from level {} with seed {} ({:?} bot)",
        plan.battles,
        plan.start_level,
        plan.seed,
        plan.bot_type
    );

    let shared_state = SharedState::new();
    let progress = run_campaign(&shared_state, &plan).await?;

    for event in shared_state.recent_events() {
        log!("{}", event);
    }
    log!(
        "Unlocked level {}, {} stars over {} levels, profile level {} ({} exp, {} gold, {} score)",
        progress.unlocked_level,
        progress.total_stars(),
        progress.completed_count(),
        progress.profile.level,
        progress.profile.exp,
        progress.profile.gold,
        progress.profile.score
    );

    Ok(())
}
