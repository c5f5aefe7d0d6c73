use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::entities::ATTACK_DURATION_TICKS;

pub(crate) const CONFIG_FILE_NAME: &str = "game.json";
pub(crate) const SEED_ENV_VAR: &str = "PORTAL_QUEST_SEED";
const DEFAULT_RNG_SEED: u64 = 0x5EED_CAFE;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfig {
    #[serde(default = "default_unlock_threshold")]
    pub(crate) unlock_threshold: u32,
    #[serde(default = "default_rng_seed")]
    pub(crate) rng_seed: u64,
    #[serde(default)]
    pub(crate) player: PlayerConfig,
    #[serde(default)]
    pub(crate) portal: PortalConfig,
    #[serde(default)]
    pub(crate) sounds: SoundConfig,
    pub(crate) levels: Vec<LevelConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MovementSchemeConfig {
    Cardinal,
    EightWay,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct PlayerConfig {
    pub(crate) sheet: String,
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    pub(crate) frame_count: u32,
    pub(crate) frame_interval_ms: u64,
    pub(crate) movement: MovementSchemeConfig,
    pub(crate) attack_sheet: Option<String>,
    pub(crate) attack_frame_count: u32,
    pub(crate) attack_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sheet: "images/player.png".to_string(),
            frame_width: 64,
            frame_height: 64,
            frame_count: 4,
            frame_interval_ms: 200,
            movement: MovementSchemeConfig::Cardinal,
            attack_sheet: None,
            attack_frame_count: 4,
            attack_ticks: ATTACK_DURATION_TICKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct PortalConfig {
    pub(crate) sheet: String,
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    pub(crate) frame_count: u32,
    pub(crate) frame_interval_ms: u64,
    pub(crate) locked_alpha: f32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            sheet: "images/portal.png".to_string(),
            frame_width: 32,
            frame_height: 32,
            frame_count: 6,
            frame_interval_ms: 200,
            locked_alpha: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct SoundConfig {
    pub(crate) eat: String,
    pub(crate) ouch: String,
    pub(crate) honk: String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            eat: "sounds/eat.wav".to_string(),
            ouch: "sounds/ouch.wav".to_string(),
            honk: "sounds/honk.wav".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PointConfig {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelConfig {
    pub(crate) map: String,
    pub(crate) player_spawn: PointConfig,
    #[serde(default)]
    pub(crate) npcs: Vec<NpcConfig>,
    #[serde(default)]
    pub(crate) vehicles: Vec<VehicleConfig>,
    pub(crate) beneficial: ItemPoolConfig,
    pub(crate) harmful: ItemPoolConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PatrolAxisConfig {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StripConfig {
    pub(crate) row: u32,
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    pub(crate) frame_count: u32,
    pub(crate) frame_delay_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NpcConfig {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) image: String,
    pub(crate) range: f32,
    pub(crate) axis: PatrolAxisConfig,
    #[serde(default)]
    pub(crate) strip: Option<StripConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct VehicleConfig {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) sheet: String,
    pub(crate) frame_width: u32,
    pub(crate) frame_height: u32,
    pub(crate) frame_count: u32,
    pub(crate) max_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemPoolConfig {
    pub(crate) images: Vec<String>,
    pub(crate) count: u32,
}

fn default_unlock_threshold() -> u32 {
    9
}

fn default_rng_seed() -> u64 {
    DEFAULT_RNG_SEED
}

impl GameConfig {
    /// Three levels over the bundled maps.
    pub(crate) fn built_in() -> Self {
        let beneficial = || ItemPoolConfig {
            images: vec![
                "images/items/apple.png".to_string(),
                "images/items/cherry.png".to_string(),
                "images/items/melon.png".to_string(),
            ],
            count: 12,
        };
        let harmful = || ItemPoolConfig {
            images: vec![
                "images/items/mushroom.png".to_string(),
                "images/items/bomb.png".to_string(),
            ],
            count: 5,
        };
        let npc = |x: f32, y: f32, axis: PatrolAxisConfig, strip: Option<StripConfig>| NpcConfig {
            x,
            y,
            image: if strip.is_some() {
                "images/villager_sheet.png".to_string()
            } else {
                "images/villager.png".to_string()
            },
            range: 96.0,
            axis,
            strip,
        };
        let walker = Some(StripConfig {
            row: 1,
            frame_width: 64,
            frame_height: 64,
            frame_count: 4,
            frame_delay_ticks: 10,
        });
        let limo = |x: f32, y: f32| VehicleConfig {
            x,
            y,
            sheet: "images/vehicles/limo.png".to_string(),
            frame_width: 140,
            frame_height: 140,
            frame_count: 7,
            max_speed: 3.0,
        };
        let police = |x: f32, y: f32| VehicleConfig {
            x,
            y,
            sheet: "images/vehicles/police.png".to_string(),
            frame_width: 70,
            frame_height: 70,
            frame_count: 10,
            max_speed: 4.0,
        };

        Self {
            unlock_threshold: default_unlock_threshold(),
            rng_seed: default_rng_seed(),
            player: PlayerConfig::default(),
            portal: PortalConfig::default(),
            sounds: SoundConfig::default(),
            levels: vec![
                LevelConfig {
                    map: "maps/level1.tmx".to_string(),
                    player_spawn: PointConfig { x: 96.0, y: 96.0 },
                    npcs: vec![npc(640.0, 320.0, PatrolAxisConfig::Horizontal, None)],
                    vehicles: vec![limo(900.0, 700.0)],
                    beneficial: beneficial(),
                    harmful: harmful(),
                },
                LevelConfig {
                    map: "maps/level2.tmx".to_string(),
                    player_spawn: PointConfig { x: 96.0, y: 96.0 },
                    npcs: vec![
                        npc(512.0, 512.0, PatrolAxisConfig::Vertical, walker),
                        npc(1024.0, 256.0, PatrolAxisConfig::Horizontal, None),
                    ],
                    vehicles: vec![limo(900.0, 700.0), police(300.0, 1200.0)],
                    beneficial: beneficial(),
                    harmful: harmful(),
                },
                LevelConfig {
                    map: "maps/level3.tmx".to_string(),
                    player_spawn: PointConfig { x: 96.0, y: 96.0 },
                    npcs: vec![
                        npc(400.0, 800.0, PatrolAxisConfig::Horizontal, walker),
                        npc(1200.0, 400.0, PatrolAxisConfig::Vertical, walker),
                    ],
                    vehicles: vec![
                        police(900.0, 700.0),
                        police(300.0, 1200.0),
                        limo(1400.0, 300.0),
                    ],
                    beneficial: beneficial(),
                    harmful: harmful(),
                },
            ],
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".to_string()));
        }
        for (index, level) in self.levels.iter().enumerate() {
            for (pool_name, pool) in [("beneficial", &level.beneficial), ("harmful", &level.harmful)] {
                if pool.count > 0 && pool.images.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "levels[{index}].{pool_name}: count is {} but no images are listed",
                        pool.count
                    )));
                }
            }
            if level.beneficial.count < self.unlock_threshold {
                warn!(
                    level = index + 1,
                    beneficial = level.beneficial.count,
                    unlock_threshold = self.unlock_threshold,
                    "config_portal_unreachable"
                );
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_config(raw: &str) -> Result<GameConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = serde_path_to_error::deserialize::<_, GameConfig>(&mut deserializer).map_err(
        |error| {
            let path = error.path().to_string();
            ConfigError::Parse {
                path,
                source: error.into_inner(),
            }
        },
    )?;
    config.validate()?;
    Ok(config)
}

/// Reads `game.json` from the asset directory, falling back to the built-in config
/// when the file does not exist.
pub(crate) fn load_config(assets_dir: &Path) -> Result<GameConfig, ConfigError> {
    let path = assets_dir.join(CONFIG_FILE_NAME);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config_file_missing_using_built_in");
            return Ok(GameConfig::built_in());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    let config = parse_config(&raw)?;
    info!(
        path = %path.display(),
        levels = config.levels.len(),
        "config_loaded"
    );
    Ok(config)
}

/// Applies `PORTAL_QUEST_SEED` when it holds a valid integer; anything else is ignored with a warning.
pub(crate) fn apply_seed_override(config: &mut GameConfig, raw: Option<&str>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.trim().parse::<u64>() {
        Ok(seed) => {
            info!(seed, "rng_seed_overridden");
            config.rng_seed = seed;
        }
        Err(_) => {
            warn!(
                var = SEED_ENV_VAR,
                value = raw,
                "invalid_seed_env_using_config_seed"
            );
        }
    }
}
