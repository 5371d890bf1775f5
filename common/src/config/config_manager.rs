use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads, validates and caches a config value behind a content provider.
pub struct ConfigManager<TProvider, TConfig, TSerializer = YamlConfigSerializer>
where
    TProvider: ConfigContentProvider,
    TSerializer: ConfigSerializer<TConfig>,
{
    provider: TProvider,
    serializer: TSerializer,
    cached: RwLock<Option<TConfig>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + Validate + Default + for<'de> Deserialize<'de> + Serialize,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path), YamlConfigSerializer)
    }
}

impl<TProvider, TConfig, TSerializer> ConfigManager<TProvider, TConfig, TSerializer>
where
    TProvider: ConfigContentProvider,
    TConfig: Clone + Validate + Default,
    TSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(provider: TProvider, serializer: TSerializer) -> Self {
        Self {
            provider,
            serializer,
            cached: RwLock::new(None),
        }
    }

    /// Returns the stored config, or the default when nothing is stored yet.
    /// A stored config that fails validation is an error, not a silent default.
    pub fn get_config(&self) -> Result<TConfig, String> {
        if let Some(config) = self.read_cache()? {
            return Ok(config);
        }

        let Some(content) = self.provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.serializer.deserialize(&content)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        self.write_cache(config.clone())?;
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let content = self.serializer.serialize(config)?;
        self.provider.set_config_content(&content)?;

        self.write_cache(config.clone())
    }

    /// Like `get_config`, but writes the default out when nothing is stored.
    pub fn get_or_create_config(&self) -> Result<TConfig, String> {
        if self.read_cache()?.is_none() && self.provider.get_config_content()?.is_none() {
            let config = TConfig::default();
            self.set_config(&config)?;
            return Ok(config);
        }
        self.get_config()
    }

    fn read_cache(&self) -> Result<Option<TConfig>, String> {
        self.cached
            .read()
            .map(|cached| cached.clone())
            .map_err(|_| "Config cache lock poisoned".to_string())
    }

    fn write_cache(&self, config: TConfig) -> Result<(), String> {
        let mut cached = self
            .cached
            .write()
            .map_err(|_| "Config cache lock poisoned".to_string())?;
        *cached = Some(config);
        Ok(())
    }
}
