/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub building: BuildingConfig,
    pub dispatch: DispatchConfig,
    pub spawn: SpawnConfig,
    pub render: RenderConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct BuildingConfig {
    pub floors: u8,
    pub capacity: usize,
    pub move_duration_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    pub auto_dispatch: bool,
    pub dispatch_delay_ms: u64,
    pub alight_duration_ms: u64,
    pub board_duration_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SpawnConfig {
    pub auto_spawn: bool,
    pub initial_passengers: usize,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub frame_interval_ms: u64,
    pub format: RenderFormat,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    Text,
    Json,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/***************************************/
/*              Defaults               */
/***************************************/
impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            floors: 10,
            capacity: 4,
            move_duration_ms: 1000,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            auto_dispatch: false,
            dispatch_delay_ms: 500,
            alight_duration_ms: 500,
            board_duration_ms: 300,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            auto_spawn: false,
            initial_passengers: 8,
            min_interval_ms: 4000,
            max_interval_ms: 10000,
            seed: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            frame_interval_ms: 50,
            format: RenderFormat::Text,
        }
    }
}

impl BuildingConfig {
    pub fn move_duration(&self) -> Duration {
        Duration::from_millis(self.move_duration_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floors < 1 {
            return Err(ConfigError::Invalid("building.floors must be at least 1".into()));
        }
        if self.capacity < 1 {
            return Err(ConfigError::Invalid("building.capacity must be at least 1".into()));
        }
        Ok(())
    }
}

impl DispatchConfig {
    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }

    pub fn alight_duration(&self) -> Duration {
        Duration::from_millis(self.alight_duration_ms)
    }

    pub fn board_duration(&self) -> Duration {
        Duration::from_millis(self.board_duration_ms)
    }
}

impl SpawnConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.building.validate()?;
        if self.spawn.min_interval_ms > self.spawn.max_interval_ms {
            return Err(ConfigError::Invalid(
                "spawn.min_interval_ms must not exceed spawn.max_interval_ms".into(),
            ));
        }
        if self.render.frame_interval_ms < 1 {
            return Err(ConfigError::Invalid("render.frame_interval_ms must be at least 1".into()));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.render.frame_interval_ms)
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(config_str) => parse_config(&config_str),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("No configuration file at {}, using default settings", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}
