mod bot_config;
mod client_config;

pub use bot_config::BotConfig;
pub use client_config::{ClientConfig, get_config_manager};
