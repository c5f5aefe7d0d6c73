mod config;
mod entities;
mod events;
mod level;
mod scene;

#[cfg(test)]
mod tests;

use engine::{AssetProvider, Scene};

pub(crate) use config::{apply_seed_override, load_config, ConfigError, SEED_ENV_VAR};
pub(crate) use level::LevelLoadError;

use config::GameConfig;
use events::{LogAudioSink, SoundBank};
use level::LevelCatalog;
use scene::GameplayScene;

/// Loads every level up front and hands back the scene the loop drives.
pub(crate) fn build_scene(
    config: GameConfig,
    provider: &mut dyn AssetProvider,
) -> Result<Box<dyn Scene>, LevelLoadError> {
    let sounds = SoundBank::load(&config.sounds, provider);
    let catalog = LevelCatalog::load(config, provider)?;
    Ok(Box::new(GameplayScene::new(
        catalog,
        sounds,
        Box::new(LogAudioSink),
    )))
}
