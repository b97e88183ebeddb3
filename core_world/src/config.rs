use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::scalar::Scalar;

pub const BUILTIN_GAME_CONFIG: &str = include_str!("data/game_config.json");

/// On-disk representation of the game configuration. Converted to
/// [`GameConfig`] after parsing so the rest of the engine works with
/// fixed-point units and a validated tier table.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfigFile {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default = "default_spawn_probability")]
    pub spawn_probability: f64,
    #[serde(default)]
    pub value_tiers: Vec<ValueTier>,
    #[serde(default = "default_proximity_radius")]
    pub proximity_radius: u32,
    #[serde(default = "default_win_threshold")]
    pub win_threshold: u64,
    #[serde(default)]
    pub carry_capacity: CarryCapacity,
}

fn default_seed() -> u64 {
    1
}

fn default_cell_size() -> f64 {
    0.0001
}

fn default_spawn_probability() -> f64 {
    0.1
}

fn default_proximity_radius() -> u32 {
    3
}

fn default_win_threshold() -> u64 {
    16
}

/// One entry of the token value distribution. Weights are relative; the
/// sampler normalizes against their sum.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ValueTier {
    pub value: u64,
    pub weight: f64,
}

/// How many tokens the carry bag holds. `Single` is the canonical game;
/// `Unbounded` restores the grouped-crafting variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryCapacity {
    #[default]
    Single,
    Unbounded,
    Slots(u32),
}

impl CarryCapacity {
    pub fn slot_limit(self) -> Option<u32> {
        match self {
            CarryCapacity::Single => Some(1),
            CarryCapacity::Slots(slots) => Some(slots),
            CarryCapacity::Unbounded => None,
        }
    }
}

/// Validated runtime configuration shared by every system.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub seed: u64,
    pub cell_size: Scalar,
    pub spawn_probability: f64,
    pub value_tiers: Vec<ValueTier>,
    pub proximity_radius: u32,
    pub win_threshold: u64,
    pub carry_capacity: CarryCapacity,
}

impl GameConfig {
    fn from_file(file: GameConfigFile) -> Self {
        let cell_size = Scalar::from_f64(file.cell_size);
        let cell_size = if cell_size.is_positive() {
            cell_size
        } else {
            tracing::warn!(
                target: "waymark::config",
                cell_size = file.cell_size,
                "game_config.cell_size_invalid falling back to default"
            );
            Scalar::from_f64(default_cell_size())
        };
        let value_tiers = if file.value_tiers.is_empty() {
            default_value_tiers()
        } else {
            file.value_tiers
        };
        Self {
            seed: file.seed,
            cell_size,
            spawn_probability: file.spawn_probability.clamp(0.0, 1.0),
            value_tiers,
            proximity_radius: file.proximity_radius,
            win_threshold: file.win_threshold,
            carry_capacity: file.carry_capacity,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        read_game_config_from_str(BUILTIN_GAME_CONFIG).expect("builtin game config should parse")
    }
}

fn default_value_tiers() -> Vec<ValueTier> {
    vec![
        ValueTier {
            value: 1,
            weight: 0.6,
        },
        ValueTier {
            value: 2,
            weight: 0.3,
        },
        ValueTier {
            value: 3,
            weight: 0.07,
        },
        ValueTier {
            value: 4,
            weight: 0.025,
        },
        ValueTier {
            value: 5,
            weight: 0.005,
        },
    ]
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read game config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load the game configuration, honoring a `WAYMARK_CONFIG_PATH` override.
/// An unreadable or malformed override is logged and the builtin defaults
/// are used instead.
pub fn load_game_config_from_env() -> GameConfig {
    if let Some(path) = env::var("WAYMARK_CONFIG_PATH").ok().map(PathBuf::from) {
        match read_game_config_from_file(&path) {
            Ok(config) => return config,
            Err(err) => {
                tracing::warn!(
                    target: "waymark::config",
                    path = %path.display(),
                    error = %err,
                    "game_config.load_failed"
                );
            }
        }
    }

    read_game_config_from_str(BUILTIN_GAME_CONFIG).expect("builtin game config should parse")
}

fn read_game_config_from_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_game_config_from_str(&contents)
}

fn read_game_config_from_str(data: &str) -> Result<GameConfig, ConfigError> {
    let file: GameConfigFile = serde_json::from_str(data)?;
    Ok(GameConfig::from_file(file))
}
