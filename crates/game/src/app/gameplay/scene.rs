use std::time::Duration;

use engine::{Camera, InputAction, InputSnapshot, RenderTarget, Scene, SceneCommand, Surface};
use tracing::info;

use super::events::{AudioSink, GameEvent, SoundBank};
use super::entities::{ItemKind, Player};
use super::level::{derive_seed, Level, LevelCatalog};

const WORLD_CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];
const GAME_OVER_TINT: [u8; 4] = [120, 0, 0, 140];
const HAZARD_TINT: [u8; 4] = [160, 90, 0, 140];
const GAME_WON_TINT: [u8; 4] = [0, 110, 40, 140];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameState {
    Playing,
    GameOver,
    Hazard,
    GameWon,
}

impl GameState {
    pub(crate) fn is_frozen(self) -> bool {
        self != GameState::Playing
    }

    fn label(self) -> &'static str {
        match self {
            GameState::Playing => "playing",
            GameState::GameOver => "game over",
            GameState::Hazard => "hit by a vehicle",
            GameState::GameWon => "you win",
        }
    }

    fn tint(self) -> Option<[u8; 4]> {
        match self {
            GameState::Playing => None,
            GameState::GameOver => Some(GAME_OVER_TINT),
            GameState::Hazard => Some(HAZARD_TINT),
            GameState::GameWon => Some(GAME_WON_TINT),
        }
    }
}

/// Owns the current level, every entity and the camera; advances them once per tick.
pub(crate) struct GameplayScene {
    catalog: LevelCatalog,
    sounds: SoundBank,
    audio: Box<dyn AudioSink>,
    pub(crate) level: Level,
    pub(crate) player: Player,
    camera: Camera,
    world: Surface,
    state: GameState,
    pub(crate) items_collected: u32,
    portal_unlocked: bool,
    levels_loaded: u64,
    events: Vec<GameEvent>,
}

impl GameplayScene {
    pub(crate) fn new(
        catalog: LevelCatalog,
        sounds: SoundBank,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let seed = derive_seed(catalog.config().rng_seed, 0);
        let level = catalog.build_level(0, seed);
        let player = catalog.build_player();
        let mut scene = Self {
            catalog,
            sounds,
            audio,
            level,
            player,
            camera: Camera::default(),
            world: Surface::new(0, 0),
            state: GameState::Playing,
            items_collected: 0,
            portal_unlocked: false,
            levels_loaded: 1,
            events: Vec::new(),
        };
        scene.place_player_at_spawn();
        info!(
            level = 1,
            levels = scene.catalog.level_count(),
            seed,
            "level_loaded"
        );
        scene
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn portal_unlocked(&self) -> bool {
        self.portal_unlocked
    }

    #[cfg(test)]
    /// Zero-based index of the level being played.
    pub(crate) fn level_index(&self) -> usize {
        self.level.index
    }

    #[cfg(test)]
    pub(crate) fn camera(&self) -> &Camera {
        &self.camera
    }

    #[cfg(test)]
    /// Events recorded during the most recent tick.
    pub(crate) fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[cfg(test)]
    pub(crate) fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn tick_playing(&mut self, input: &InputSnapshot, dt: Duration) {
        let (world_width, world_height) = self.level.world_size();
        self.player.update(input, world_width, world_height, dt);
        for npc in &mut self.level.npcs {
            npc.update(dt);
        }
        for vehicle in &mut self.level.vehicles {
            vehicle.update(world_width, world_height, dt);
        }
        self.level.portal.update(dt);
        self.camera.set_follow(self.player.center());

        let hitbox = self.player.hitbox();
        let threshold = self.catalog.config().unlock_threshold;
        let mut touched_harmful = false;
        let mut beneficial = 0;
        for item in &mut self.level.items {
            if !item.check_collision(&hitbox) {
                continue;
            }
            item.collect();
            match item.kind() {
                ItemKind::Beneficial => beneficial += 1,
                ItemKind::Harmful => {
                    touched_harmful = true;
                    break;
                }
                ItemKind::Portal => {}
            }
        }
        for _ in 0..beneficial {
            self.items_collected += 1;
            self.emit(GameEvent::ItemCollected {
                total: self.items_collected,
            });
            if !self.portal_unlocked && self.items_collected >= threshold {
                self.portal_unlocked = true;
                self.emit(GameEvent::PortalUnlocked);
            }
        }
        if touched_harmful {
            self.state = GameState::GameOver;
            self.emit(GameEvent::HarmfulItemTouched);
            return;
        }

        if self
            .level
            .vehicles
            .iter()
            .any(|vehicle| vehicle.bounds().overlaps(&hitbox))
        {
            self.state = GameState::Hazard;
            self.emit(GameEvent::VehicleHit);
            return;
        }

        if self.portal_unlocked && self.level.portal.check_collision(&hitbox) {
            let next = self.level.index + 1;
            if next < self.catalog.level_count() {
                self.load_level(next);
                self.emit(GameEvent::LevelAdvanced { level: next + 1 });
            } else {
                self.state = GameState::GameWon;
                self.emit(GameEvent::GameWon);
            }
        }
    }

    fn restart(&mut self) {
        self.load_level(0);
        self.state = GameState::Playing;
        self.emit(GameEvent::Restarted);
    }

    /// Replaces the map and every entity, zeroes the counters and re-centres the camera.
    fn load_level(&mut self, index: usize) {
        let seed = derive_seed(self.catalog.config().rng_seed, self.levels_loaded);
        self.levels_loaded = self.levels_loaded.wrapping_add(1);
        self.level = self.catalog.build_level(index, seed);
        self.items_collected = 0;
        self.portal_unlocked = false;
        self.camera.reset();
        self.place_player_at_spawn();
        info!(level = index + 1, seed, "level_loaded");
    }

    fn place_player_at_spawn(&mut self) {
        self.player.respawn(self.level.spawn);
        self.camera.set_follow(self.player.center());
    }

    fn emit(&mut self, event: GameEvent) {
        let level = self.level.index + 1;
        match event {
            GameEvent::ItemCollected { total } => info!(level, total, "item_collected"),
            GameEvent::PortalUnlocked => info!(level, "portal_unlocked"),
            GameEvent::HarmfulItemTouched => info!(level, "harmful_item_touched"),
            GameEvent::VehicleHit => info!(level, "vehicle_hit"),
            GameEvent::LevelAdvanced { level } => info!(level, "level_advanced"),
            GameEvent::GameWon => info!(level, "game_won"),
            GameEvent::Restarted => info!("game_restarted"),
        }
        if let Some(cue) = event.sound_cue() {
            self.audio.play(cue, self.sounds.get(cue));
        }
        self.events.push(event);
    }

    fn draw_world(&mut self) {
        let (world_width, world_height) = (self.level.tile_map.width(), self.level.tile_map.height());
        if self.world.width() != world_width || self.world.height() != world_height {
            self.world = Surface::new(world_width, world_height);
        }
        let visible = self.camera.visible_rect(world_width, world_height);
        self.world.set_clip(Some(visible));
        self.world.clear(WORLD_CLEAR_COLOR);

        let world = &mut self.world;
        self.level.tile_map.draw(&mut *world, 0.0, 0.0);
        for item in &self.level.items {
            item.draw(&mut *world);
        }
        if self.portal_unlocked {
            self.level.portal.draw(&mut *world);
        } else {
            self.level
                .portal
                .draw_with_alpha(&mut *world, self.catalog.config().portal.locked_alpha);
        }
        for npc in &self.level.npcs {
            npc.draw(&mut *world);
        }
        for vehicle in &self.level.vehicles {
            vehicle.draw(&mut *world);
        }
        self.player.draw(world);
    }
}

impl Scene for GameplayScene {
    fn update(&mut self, fixed_dt: Duration, input: &InputSnapshot) -> SceneCommand {
        self.events.clear();
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        if self.state.is_frozen() {
            if input.is_down(InputAction::Restart) {
                self.restart();
            }
        } else {
            self.tick_playing(input, fixed_dt);
        }

        SceneCommand::None
    }

    fn render(&mut self, screen: &mut Surface) {
        self.draw_world();
        self.camera.draw(&self.world, screen);
        if let Some(tint) = self.state.tint() {
            let bounds = screen.bounds();
            screen.fill_rect(bounds, tint);
        }
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!(
            "Portal Quest | level {}/{} | items {}/{} | {}",
            self.level.index + 1,
            self.catalog.level_count(),
            self.items_collected,
            self.catalog.config().unlock_threshold,
            self.state.label()
        ))
    }
}
