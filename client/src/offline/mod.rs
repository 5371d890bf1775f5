mod battle_runner;
mod bot;
mod broadcaster;
mod campaign_runner;

pub use campaign_runner::{CampaignPlan, run_campaign};
