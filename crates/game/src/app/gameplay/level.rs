use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use engine::{
    parse_map_description, resolve_relative, AnimatedSprite, AssetError, AssetProvider, FrameTimer,
    Image, ImageRegion, MapFormatError, Rect, SheetLayout, TileMap, Vec2,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

use super::config::{
    GameConfig, ItemPoolConfig, MovementSchemeConfig, NpcConfig, PatrolAxisConfig,
};
use super::entities::{
    AttackAnimation, Item, ItemKind, MovementScheme, Npc, NpcVisual, PatrolAxis, Player,
    SheetConfig, Vehicle, ITEM_SIZE, PLAYER_HITBOX_INSET, PLAYER_SIZE,
};

/// Gap between the portal and the far corner of the map, on top of the item size.
pub(crate) const PORTAL_CORNER_MARGIN: f32 = 64.0;
const MAX_PLACEMENT_ATTEMPTS: u32 = 32;
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Error)]
pub(crate) enum LevelLoadError {
    #[error("failed to load map {path} for level {level}: {source}")]
    MapUnreadable {
        level: usize,
        path: String,
        #[source]
        source: AssetError,
    },
    #[error("failed to parse map {path} for level {level}: {source}")]
    MapInvalid {
        level: usize,
        path: String,
        #[source]
        source: MapFormatError,
    },
}

/// Everything a level needs, loaded once at start-up so switching levels cannot fail.
#[derive(Debug)]
pub(crate) struct LevelCatalog {
    config: GameConfig,
    maps: Vec<Arc<TileMap>>,
    images: HashMap<String, Arc<Image>>,
    placeholder: Arc<Image>,
}

/// One loaded level: its map and freshly spawned entities.
#[derive(Debug)]
pub(crate) struct Level {
    pub(crate) index: usize,
    pub(crate) tile_map: Arc<TileMap>,
    pub(crate) spawn: Vec2,
    pub(crate) npcs: Vec<Npc>,
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) items: Vec<Item>,
    pub(crate) portal: Item,
}

impl Level {
    pub(crate) fn world_size(&self) -> (f32, f32) {
        (self.tile_map.width() as f32, self.tile_map.height() as f32)
    }
}

impl LevelCatalog {
    pub(crate) fn load(
        config: GameConfig,
        provider: &mut dyn AssetProvider,
    ) -> Result<Self, LevelLoadError> {
        let mut maps = Vec::with_capacity(config.levels.len());
        for (index, level) in config.levels.iter().enumerate() {
            maps.push(Arc::new(load_tile_map(index + 1, &level.map, provider)?));
        }

        let mut images = HashMap::new();
        for path in referenced_images(&config) {
            images
                .entry(path.clone())
                .or_insert_with(|| provider.load_image(&path));
        }

        info!(
            levels = maps.len(),
            images = images.len(),
            "level_catalog_loaded"
        );
        Ok(Self {
            config,
            maps,
            images,
            placeholder: Arc::new(Image::placeholder()),
        })
    }

    pub(crate) fn config(&self) -> &GameConfig {
        &self.config
    }

    pub(crate) fn level_count(&self) -> usize {
        self.maps.len()
    }

    fn image(&self, path: &str) -> ImageRegion {
        let image = self.images.get(path).unwrap_or(&self.placeholder);
        ImageRegion::full(Arc::clone(image))
    }

    pub(crate) fn build_player(&self) -> Player {
        let player = &self.config.player;
        let interval = FrameTimer::Interval(Duration::from_millis(player.frame_interval_ms));
        let sprite = AnimatedSprite::new(
            self.image(&player.sheet),
            player.frame_width,
            player.frame_height,
            player.frame_count,
            interval,
        );
        let scheme = match player.movement {
            MovementSchemeConfig::Cardinal => MovementScheme::Cardinal,
            MovementSchemeConfig::EightWay => MovementScheme::EightWay {
                attack: player.attack_sheet.as_ref().map(|sheet| AttackAnimation {
                    sprite: AnimatedSprite::new(
                        self.image(sheet),
                        player.frame_width,
                        player.frame_height,
                        player.attack_frame_count,
                        interval,
                    ),
                    duration_ticks: player.attack_ticks,
                }),
            },
        };
        let spawn = self
            .config
            .levels
            .first()
            .map(|level| Vec2::new(level.player_spawn.x, level.player_spawn.y))
            .unwrap_or_default();
        Player::new(spawn, sprite, scheme)
    }

    /// Spawns level `index` (zero-based). The same seed always yields the same layout.
    pub(crate) fn build_level(&self, index: usize, seed: u64) -> Level {
        let index = index.min(self.maps.len().saturating_sub(1));
        let level = &self.config.levels[index];
        let tile_map = Arc::clone(&self.maps[index]);
        let (world_width, world_height) = (tile_map.width() as f32, tile_map.height() as f32);
        let spawn = Vec2::new(level.player_spawn.x, level.player_spawn.y);
        let spawn_hitbox = Rect::new(spawn.x, spawn.y, PLAYER_SIZE, PLAYER_SIZE).inset(PLAYER_HITBOX_INSET);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let npcs = level.npcs.iter().map(|npc| self.build_npc(npc)).collect();
        let vehicles = level
            .vehicles
            .iter()
            .enumerate()
            .map(|(vehicle_index, vehicle)| {
                Vehicle::new(
                    Vec2::new(vehicle.x, vehicle.y),
                    self.image(&vehicle.sheet),
                    SheetConfig {
                        frame_width: vehicle.frame_width,
                        frame_height: vehicle.frame_height,
                        frame_count: vehicle.frame_count,
                    },
                    vehicle.max_speed,
                    ChaCha8Rng::seed_from_u64(derive_seed(seed, vehicle_index as u64 + 1)),
                )
            })
            .collect();

        let mut items = Vec::new();
        for (kind, pool) in [
            (ItemKind::Beneficial, &level.beneficial),
            (ItemKind::Harmful, &level.harmful),
        ] {
            self.spawn_pool(
                &mut items,
                &mut rng,
                kind,
                pool,
                (world_width, world_height),
                &spawn_hitbox,
            );
        }

        let portal = Item::portal(
            Vec2::new(
                (world_width - ITEM_SIZE - PORTAL_CORNER_MARGIN).max(0.0),
                (world_height - ITEM_SIZE - PORTAL_CORNER_MARGIN).max(0.0),
            ),
            self.portal_sprite(),
        );

        debug!(
            level = index + 1,
            seed,
            npcs = level.npcs.len(),
            vehicles = level.vehicles.len(),
            items = items.len(),
            "level_built"
        );
        Level {
            index,
            tile_map,
            spawn,
            npcs,
            vehicles,
            items,
            portal,
        }
    }

    fn build_npc(&self, npc: &NpcConfig) -> Npc {
        let image = self.image(&npc.image);
        let visual = match npc.strip {
            Some(strip) => NpcVisual::Animated(
                AnimatedSprite::new(
                    image,
                    strip.frame_width,
                    strip.frame_height,
                    strip.frame_count,
                    FrameTimer::Ticks(strip.frame_delay_ticks),
                )
                .with_layout(SheetLayout::Row(strip.row)),
            ),
            None => NpcVisual::Static(image),
        };
        let axis = match npc.axis {
            PatrolAxisConfig::Horizontal => PatrolAxis::Horizontal,
            PatrolAxisConfig::Vertical => PatrolAxis::Vertical,
        };
        Npc::new(Vec2::new(npc.x, npc.y), npc.range, axis, visual)
    }

    fn portal_sprite(&self) -> AnimatedSprite {
        let portal = &self.config.portal;
        AnimatedSprite::new(
            self.image(&portal.sheet),
            portal.frame_width,
            portal.frame_height,
            portal.frame_count,
            FrameTimer::Interval(Duration::from_millis(portal.frame_interval_ms)),
        )
    }

    fn spawn_pool(
        &self,
        items: &mut Vec<Item>,
        rng: &mut ChaCha8Rng,
        kind: ItemKind,
        pool: &ItemPoolConfig,
        world_size: (f32, f32),
        avoid: &Rect,
    ) {
        if pool.images.is_empty() {
            return;
        }
        for _ in 0..pool.count {
            let image_path = &pool.images[rng.random_range(0..pool.images.len())];
            let position = random_item_position(rng, world_size, avoid);
            items.push(Item::new(kind, position, self.image(image_path)));
        }
    }
}

fn load_tile_map(
    level: usize,
    path: &str,
    provider: &mut dyn AssetProvider,
) -> Result<TileMap, LevelLoadError> {
    let bytes = provider
        .load_map_description(path)
        .map_err(|source| LevelLoadError::MapUnreadable {
            level,
            path: path.to_string(),
            source,
        })?;
    let description =
        parse_map_description(&bytes).map_err(|source| LevelLoadError::MapInvalid {
            level,
            path: path.to_string(),
            source,
        })?;

    let mut images = HashMap::new();
    for source in description.image_sources() {
        let image = provider.load_image(&resolve_relative(path, &source));
        images.insert(source, image);
    }
    let tile_map = TileMap::new(description, &images);
    info!(
        level,
        map = path,
        width = tile_map.width(),
        height = tile_map.height(),
        "level_map_loaded"
    );
    Ok(tile_map)
}

fn referenced_images(config: &GameConfig) -> Vec<String> {
    let mut paths = vec![config.player.sheet.clone(), config.portal.sheet.clone()];
    paths.extend(config.player.attack_sheet.clone());
    for level in &config.levels {
        paths.extend(level.npcs.iter().map(|npc| npc.image.clone()));
        paths.extend(level.vehicles.iter().map(|vehicle| vehicle.sheet.clone()));
        paths.extend(level.beneficial.images.iter().cloned());
        paths.extend(level.harmful.images.iter().cloned());
    }
    paths
}

/// Uniform position for an item box inside the world, re-rolled while it covers `avoid`.
fn random_item_position(rng: &mut ChaCha8Rng, (world_width, world_height): (f32, f32), avoid: &Rect) -> Vec2 {
    let max_x = (world_width - ITEM_SIZE).max(0.0);
    let max_y = (world_height - ITEM_SIZE).max(0.0);
    let mut candidate = Vec2::default();
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        candidate = Vec2::new(rng.random::<f32>() * max_x, rng.random::<f32>() * max_y);
        let bounds = Rect::new(candidate.x, candidate.y, ITEM_SIZE, ITEM_SIZE);
        if !bounds.overlaps(avoid) {
            return candidate;
        }
    }
    candidate
}

pub(crate) fn derive_seed(base: u64, salt: u64) -> u64 {
    base.wrapping_add(salt.wrapping_mul(SEED_STRIDE))
}

