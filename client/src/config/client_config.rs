use std::path::PathBuf;

use mystic_common::config::{
    ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
};
use mystic_common::games::PacingSettings;
use mystic_common::games::match3::Match3Settings;
use serde::{Deserialize, Serialize};

use super::BotConfig;

const CONFIG_FILE_NAME: &str = "mystic_match_config.yaml";

fn get_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Config next to the executable unless a path is given.
pub fn get_config_manager(
    path: Option<PathBuf>,
) -> ConfigManager<FileContentConfigProvider, ClientConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path.unwrap_or_else(get_config_path))
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub board: Match3Settings,
    pub pacing: PacingSettings,
    pub bot: BotConfig,
    #[serde(default)]
    pub verbose_log: bool,
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<(), String> {
        self.board.validate()?;
        self.pacing.validate()?;
        self.bot.validate()?;
        Ok(())
    }
}
