use std::cell::RefCell;
use std::f32::consts::FRAC_1_SQRT_2;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use engine::{
    AnimatedSprite, FrameTimer, Image, ImageRegion, InputAction, InputSnapshot,
    MemoryAssetProvider, Rect, Scene, SceneCommand, Surface, Vec2,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::{GameConfig, PointConfig};
use super::entities::{
    AttackAnimation, Facing, Item, ItemKind, MovementScheme, Npc, NpcVisual, PatrolAxis, Player,
    SheetConfig, Vehicle, ATTACK_DURATION_TICKS, ITEM_SIZE, NPC_SIZE, PLAYER_HITBOX_INSET,
    PLAYER_SIZE, PLAYER_SPEED, VEHICLE_SIZE,
};
use super::events::{AudioSink, GameEvent, LogAudioSink, SoundBank, SoundCue};
use super::level::{LevelCatalog, LevelLoadError, PORTAL_CORNER_MARGIN};
use super::scene::{GameState, GameplayScene};

const DT: Duration = Duration::from_micros(16_667);
const GROUND: [u8; 4] = [20, 160, 40, 255];
const MAP_TILES: u32 = 20;
const WORLD: f32 = (MAP_TILES * 64) as f32;

fn tmx_map(width: u32, height: u32) -> String {
    let cells = vec!["1"; (width * height) as usize].join(",");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" width="{width}" height="{height}" tilewidth="64" tileheight="64" infinite="0">
 <tileset firstgid="1" name="ground" tilewidth="64" tileheight="64" tilecount="1" columns="1">
  <image source="../images/ground.png" width="64" height="64"/>
 </tileset>
 <layer id="1" name="ground" width="{width}" height="{height}">
  <data encoding="csv">{cells}</data>
 </layer>
</map>"#
    )
}

fn empty_levels_config(level_count: usize) -> GameConfig {
    let mut config = GameConfig::built_in();
    config.levels.truncate(level_count);
    for (index, level) in config.levels.iter_mut().enumerate() {
        level.map = format!("maps/test{}.tmx", index + 1);
        level.npcs.clear();
        level.vehicles.clear();
        level.beneficial.count = 0;
        level.harmful.count = 0;
    }
    config
}

fn provider_for(config: &GameConfig) -> MemoryAssetProvider {
    let mut provider =
        MemoryAssetProvider::new().with_image("images/ground.png", Image::solid(64, 64, GROUND));
    for level in &config.levels {
        provider.insert_file(level.map.clone(), tmx_map(MAP_TILES, MAP_TILES));
    }
    provider
}

fn scene_with(config: GameConfig) -> GameplayScene {
    let mut provider = provider_for(&config);
    let catalog = LevelCatalog::load(config, &mut provider).expect("catalog");
    GameplayScene::new(catalog, SoundBank::default(), Box::new(LogAudioSink))
}

fn region() -> ImageRegion {
    ImageRegion::full(Arc::new(Image::solid(32, 32, [250, 220, 0, 255])))
}

fn walk_sprite() -> AnimatedSprite {
    let sheet = ImageRegion::full(Arc::new(Image::solid(256, 512, [0, 0, 255, 255])));
    AnimatedSprite::new(
        sheet,
        64,
        64,
        4,
        FrameTimer::Interval(Duration::from_millis(200)),
    )
}

fn player_at(x: f32, y: f32, scheme: MovementScheme) -> Player {
    Player::new(Vec2::new(x, y), walk_sprite(), scheme)
}

fn input(actions: &[InputAction]) -> InputSnapshot {
    let mut snapshot = InputSnapshot::empty();
    for action in actions {
        snapshot = snapshot.with_action_down(*action, true);
    }
    snapshot
}

fn idle_tick(scene: &mut GameplayScene) -> SceneCommand {
    scene.update(DT, &InputSnapshot::empty())
}

fn item_under_player(scene: &GameplayScene, kind: ItemKind) -> Item {
    Item::new(kind, scene.player.position, region())
}

#[test]
fn beneficial_item_at_player_position_is_collected_in_one_tick() {
    let mut scene = scene_with(empty_levels_config(3));
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    assert_eq!(scene.items_collected, 0);

    assert_eq!(idle_tick(&mut scene), SceneCommand::None);

    assert!(scene.level.items[0].is_collected());
    assert_eq!(scene.items_collected, 1);
    assert_eq!(scene.events(), &[GameEvent::ItemCollected { total: 1 }]);
    assert_eq!(scene.state(), GameState::Playing);
}

#[test]
fn collected_item_never_collides_again() {
    let mut scene = scene_with(empty_levels_config(3));
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    idle_tick(&mut scene);
    idle_tick(&mut scene);
    idle_tick(&mut scene);
    assert_eq!(scene.items_collected, 1);
    assert!(scene.events().is_empty());
}

#[test]
fn ninth_item_unlocks_portal_and_stays_unlocked() {
    let mut scene = scene_with(empty_levels_config(3));
    scene.items_collected = 8;
    idle_tick(&mut scene);
    assert!(!scene.portal_unlocked());

    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    idle_tick(&mut scene);

    assert!(scene.portal_unlocked());
    assert_eq!(
        scene.events(),
        &[GameEvent::ItemCollected { total: 9 }, GameEvent::PortalUnlocked]
    );

    for _ in 0..10 {
        idle_tick(&mut scene);
    }
    assert!(scene.portal_unlocked());
}

#[test]
fn locked_portal_does_not_advance_level() {
    let mut scene = scene_with(empty_levels_config(3));
    scene.level.portal.position = scene.player.position;
    idle_tick(&mut scene);
    assert_eq!(scene.level_index(), 0);
    assert_eq!(scene.state(), GameState::Playing);
}

#[test]
fn harmful_item_freezes_game_until_restart() {
    let mut scene = scene_with(empty_levels_config(3));
    let harmful = item_under_player(&scene, ItemKind::Harmful);
    scene.level.items.push(harmful);
    idle_tick(&mut scene);
    assert_eq!(scene.state(), GameState::GameOver);
    assert_eq!(scene.events(), &[GameEvent::HarmfulItemTouched]);

    let frozen_position = scene.player.position;
    let beneficial = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(beneficial);
    scene.update(DT, &input(&[InputAction::MoveRight, InputAction::MoveDown]));

    assert_eq!(scene.state(), GameState::GameOver);
    assert_eq!(scene.player.position, frozen_position);
    assert!(!scene.level.items[1].is_collected());
    assert_eq!(scene.items_collected, 0);
}

#[test]
fn vehicle_overlapping_player_hitbox_is_a_hazard() {
    let mut scene = scene_with(empty_levels_config(3));
    let vehicle = Vehicle::new(
        scene.player.position,
        region(),
        SheetConfig {
            frame_width: 32,
            frame_height: 32,
            frame_count: 1,
        },
        0.0,
        ChaCha8Rng::seed_from_u64(3),
    );
    scene.level.vehicles.push(vehicle);
    idle_tick(&mut scene);
    assert_eq!(scene.state(), GameState::Hazard);
    assert_eq!(scene.events(), &[GameEvent::VehicleHit]);
}

#[test]
fn vehicle_touching_only_the_visual_box_is_not_a_hit() {
    let mut scene = scene_with(empty_levels_config(3));
    let bounds = scene.player.bounds();
    let vehicle = Vehicle::new(
        Vec2::new(bounds.x + PLAYER_SIZE - PLAYER_HITBOX_INSET, bounds.y),
        region(),
        SheetConfig {
            frame_width: 32,
            frame_height: 32,
            frame_count: 1,
        },
        0.0,
        ChaCha8Rng::seed_from_u64(3),
    );
    scene.level.vehicles.push(vehicle);
    idle_tick(&mut scene);
    assert_eq!(scene.state(), GameState::Playing);
}

#[test]
fn unlocked_portal_loads_next_level_and_moves_player_to_its_spawn() {
    let mut config = empty_levels_config(3);
    config.levels[1].player_spawn = PointConfig { x: 300.0, y: 200.0 };
    let mut scene = scene_with(config);

    scene.items_collected = 8;
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    scene.level.portal.position = scene.player.position;
    idle_tick(&mut scene);

    assert_eq!(scene.level_index(), 1);
    assert_eq!(scene.state(), GameState::Playing);
    assert_eq!(scene.items_collected, 0);
    assert!(!scene.portal_unlocked());
    assert!(scene.level.items.is_empty());
    assert_eq!(scene.player.position, Vec2::new(300.0, 200.0));
    assert_eq!(scene.camera().follow(), scene.player.center());
    assert_eq!(
        scene.events().last(),
        Some(&GameEvent::LevelAdvanced { level: 2 })
    );
}

#[test]
fn portal_on_final_level_wins_the_game() {
    let mut scene = scene_with(empty_levels_config(1));
    scene.items_collected = 8;
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    scene.level.portal.position = scene.player.position;
    idle_tick(&mut scene);

    assert_eq!(scene.state(), GameState::GameWon);
    assert_eq!(scene.events().last(), Some(&GameEvent::GameWon));
}

#[test]
fn restart_returns_to_first_level_with_zeroed_counters() {
    let mut config = empty_levels_config(3);
    config.levels[1].player_spawn = PointConfig { x: 300.0, y: 200.0 };
    let mut scene = scene_with(config);
    scene.items_collected = 8;
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    scene.level.portal.position = scene.player.position;
    idle_tick(&mut scene);
    assert_eq!(scene.level_index(), 1);

    let harmful = item_under_player(&scene, ItemKind::Harmful);
    scene.level.items.push(harmful);
    idle_tick(&mut scene);
    assert_eq!(scene.state(), GameState::GameOver);

    scene.update(DT, &input(&[InputAction::Restart]));
    assert_eq!(scene.state(), GameState::Playing);
    assert_eq!(scene.level_index(), 0);
    assert_eq!(scene.items_collected, 0);
    assert!(!scene.portal_unlocked());
    assert_eq!(scene.player.position, Vec2::new(96.0, 96.0));
    assert_eq!(scene.events(), &[GameEvent::Restarted]);
}

#[test]
fn restart_is_ignored_while_playing() {
    let mut scene = scene_with(empty_levels_config(3));
    let far_item = Item::new(ItemKind::Beneficial, Vec2::new(900.0, 900.0), region());
    scene.level.items.push(far_item);
    scene.update(DT, &input(&[InputAction::Restart]));
    scene.update(DT, &input(&[InputAction::Restart]));
    assert_eq!(scene.level.items.len(), 1);
    assert!(scene.events().is_empty());
}

#[test]
fn camera_follows_player_center_each_tick() {
    let mut scene = scene_with(empty_levels_config(3));
    for _ in 0..5 {
        scene.update(DT, &input(&[InputAction::MoveRight]));
    }
    assert_eq!(scene.camera().follow(), scene.player.center());
}

#[test]
fn render_shows_ground_and_tints_when_frozen() {
    let mut scene = scene_with(empty_levels_config(3));
    let mut screen = Surface::new(800, 600);
    scene.render(&mut screen);
    assert_eq!(screen.pixel(0, 0), Some(GROUND));
    assert_eq!(screen.pixel(799, 599), Some(GROUND));

    let harmful = item_under_player(&scene, ItemKind::Harmful);
    scene.level.items.push(harmful);
    idle_tick(&mut scene);
    scene.render(&mut screen);
    assert_ne!(screen.pixel(0, 0), Some(GROUND));
}

#[test]
fn debug_title_reports_progress() {
    let mut scene = scene_with(empty_levels_config(3));
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    idle_tick(&mut scene);
    let title = scene.debug_title().expect("title");
    assert!(title.contains("level 1/3"), "title={title}");
    assert!(title.contains("items 1/9"), "title={title}");
    assert!(title.contains("playing"), "title={title}");
}

#[test]
fn drained_events_are_gone() {
    let mut scene = scene_with(empty_levels_config(3));
    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    idle_tick(&mut scene);
    assert_eq!(scene.drain_events().len(), 1);
    assert!(scene.events().is_empty());
}

#[test]
fn sound_cues_follow_events() {
    assert_eq!(
        GameEvent::ItemCollected { total: 1 }.sound_cue(),
        Some(SoundCue::Eat)
    );
    assert_eq!(GameEvent::HarmfulItemTouched.sound_cue(), Some(SoundCue::Ouch));
    assert_eq!(GameEvent::VehicleHit.sound_cue(), Some(SoundCue::Honk));
    assert_eq!(GameEvent::PortalUnlocked.sound_cue(), None);

    let config = GameConfig::built_in();
    let mut provider = MemoryAssetProvider::new().with_file(config.sounds.eat.clone(), vec![1, 2, 3]);
    let sounds = SoundBank::load(&config.sounds, &mut provider);
    assert_eq!(sounds.get(SoundCue::Eat), Some(&[1u8, 2, 3][..]));
    assert_eq!(sounds.get(SoundCue::Honk), None);
}

#[derive(Clone, Default)]
struct RecordingSink {
    played: Rc<RefCell<Vec<(SoundCue, Option<Vec<u8>>)>>>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: SoundCue, sound: Option<&[u8]>) {
        self.played.borrow_mut().push((cue, sound.map(<[u8]>::to_vec)));
    }
}

#[test]
fn fired_cues_reach_the_audio_sink_with_loaded_bytes() {
    let config = empty_levels_config(3);
    let mut provider =
        provider_for(&config).with_file(config.sounds.eat.clone(), vec![7, 7]);
    let sounds = SoundBank::load(&config.sounds, &mut provider);
    let catalog = LevelCatalog::load(config, &mut provider).expect("catalog");
    let sink = RecordingSink::default();
    let mut scene = GameplayScene::new(catalog, sounds, Box::new(sink.clone()));

    let item = item_under_player(&scene, ItemKind::Beneficial);
    scene.level.items.push(item);
    idle_tick(&mut scene);
    let item = item_under_player(&scene, ItemKind::Harmful);
    scene.level.items.push(item);
    idle_tick(&mut scene);

    assert_eq!(
        *sink.played.borrow(),
        vec![(SoundCue::Eat, Some(vec![7, 7])), (SoundCue::Ouch, None)]
    );
}

#[test]
fn level_items_are_placed_inside_world_and_off_the_spawn() {
    let mut config = GameConfig::built_in();
    for (index, level) in config.levels.iter_mut().enumerate() {
        level.map = format!("maps/test{}.tmx", index + 1);
    }
    let mut provider = provider_for(&config);
    let catalog = LevelCatalog::load(config, &mut provider).expect("catalog");

    let level = catalog.build_level(0, 42);
    let spawn_hitbox =
        Rect::new(level.spawn.x, level.spawn.y, PLAYER_SIZE, PLAYER_SIZE).inset(PLAYER_HITBOX_INSET);
    let beneficial = level
        .items
        .iter()
        .filter(|item| item.kind() == ItemKind::Beneficial)
        .count();
    let harmful = level
        .items
        .iter()
        .filter(|item| item.kind() == ItemKind::Harmful)
        .count();
    assert_eq!((beneficial, harmful), (12, 5));
    for item in &level.items {
        let bounds = item.bounds();
        assert!(bounds.x >= 0.0 && bounds.x + ITEM_SIZE <= WORLD, "{bounds:?}");
        assert!(bounds.y >= 0.0 && bounds.y + ITEM_SIZE <= WORLD, "{bounds:?}");
        assert!(!bounds.overlaps(&spawn_hitbox), "{bounds:?}");
    }

    let corner = WORLD - ITEM_SIZE - PORTAL_CORNER_MARGIN;
    assert_eq!(level.portal.position, Vec2::new(corner, corner));
    assert_eq!(level.portal.kind(), ItemKind::Portal);
    assert!(!level.npcs.is_empty());
    assert!(!level.vehicles.is_empty());
}

#[test]
fn same_seed_builds_same_layout() {
    let mut config = GameConfig::built_in();
    for (index, level) in config.levels.iter_mut().enumerate() {
        level.map = format!("maps/test{}.tmx", index + 1);
    }
    let mut provider = provider_for(&config);
    let catalog = LevelCatalog::load(config, &mut provider).expect("catalog");

    let first = catalog.build_level(1, 7);
    let second = catalog.build_level(1, 7);
    let positions = |level: &super::level::Level| {
        level
            .items
            .iter()
            .map(|item| item.position)
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(&first), positions(&second));
    let velocities = |level: &super::level::Level| {
        level
            .vehicles
            .iter()
            .map(|vehicle| vehicle.velocity)
            .collect::<Vec<_>>()
    };
    assert_eq!(velocities(&first), velocities(&second));
    assert_ne!(positions(&first), positions(&catalog.build_level(1, 8)));
}

#[test]
fn malformed_map_aborts_catalog_load() {
    let config = empty_levels_config(2);
    let mut provider = provider_for(&config);
    provider.insert_file("maps/test2.tmx", "<map width=\"2\"");
    let error = LevelCatalog::load(config, &mut provider).expect_err("malformed map");
    match error {
        LevelLoadError::MapInvalid { level, path, .. } => {
            assert_eq!(level, 2);
            assert_eq!(path, "maps/test2.tmx");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_map_aborts_catalog_load() {
    let config = empty_levels_config(1);
    let mut provider = MemoryAssetProvider::new();
    let error = LevelCatalog::load(config, &mut provider).expect_err("missing map");
    assert!(matches!(error, LevelLoadError::MapUnreadable { level: 1, .. }));
}

#[test]
fn build_scene_wires_catalog_and_sounds() {
    let config = empty_levels_config(3);
    let mut provider = provider_for(&config);
    let mut scene = super::build_scene(config, &mut provider).expect("scene");
    assert_eq!(
        scene.update(DT, &InputSnapshot::empty()),
        SceneCommand::None
    );
    assert!(scene
        .debug_title()
        .is_some_and(|title| title.starts_with("Portal Quest")));
}

#[test]
fn vehicle_crossing_left_edge_flips_only_x_velocity() {
    let mut vehicle = Vehicle::new(
        Vec2::new(1.0, 300.0),
        region(),
        SheetConfig {
            frame_width: 32,
            frame_height: 32,
            frame_count: 1,
        },
        4.0,
        ChaCha8Rng::seed_from_u64(11),
    );
    vehicle.velocity = Vec2::new(-3.0, 2.0);
    vehicle.heading_ticks_remaining = 200;

    vehicle.update(WORLD, WORLD, DT);

    assert_eq!(vehicle.position.x, 0.0);
    assert_eq!(vehicle.position.y, 302.0);
    assert_eq!(vehicle.velocity, Vec2::new(3.0, 2.0));
    assert_eq!(vehicle.heading_ticks_remaining, 59);
}

#[test]
fn vehicle_crossing_bottom_edge_flips_only_y_velocity() {
    let mut vehicle = Vehicle::new(
        Vec2::new(300.0, WORLD - VEHICLE_SIZE - 1.0),
        region(),
        SheetConfig {
            frame_width: 32,
            frame_height: 32,
            frame_count: 1,
        },
        4.0,
        ChaCha8Rng::seed_from_u64(11),
    );
    vehicle.velocity = Vec2::new(1.5, 3.0);
    vehicle.heading_ticks_remaining = 200;

    vehicle.update(WORLD, WORLD, DT);

    assert_eq!(vehicle.position.y, WORLD - VEHICLE_SIZE);
    assert_eq!(vehicle.velocity, Vec2::new(1.5, -3.0));
}

#[test]
fn vehicle_heading_change_respects_speed_band() {
    let mut vehicle = Vehicle::new(
        Vec2::new(500.0, 500.0),
        region(),
        SheetConfig {
            frame_width: 32,
            frame_height: 32,
            frame_count: 1,
        },
        4.0,
        ChaCha8Rng::seed_from_u64(5),
    );
    for _ in 0..50 {
        vehicle.change_heading();
        let speed = vehicle.velocity.x.hypot(vehicle.velocity.y);
        assert!(speed >= 2.0 - 1e-4 && speed <= 4.0 + 1e-4, "speed={speed}");
        assert!((120..300).contains(&vehicle.heading_ticks_remaining));
    }
    assert_eq!(vehicle.max_speed(), 4.0);
}

#[test]
fn vehicle_frames_advance_every_eight_ticks() {
    let sheet = ImageRegion::full(Arc::new(Image::solid(320, 32, [9, 9, 9, 255])));
    let mut vehicle = Vehicle::new(
        Vec2::new(500.0, 500.0),
        sheet,
        SheetConfig {
            frame_width: 32,
            frame_height: 32,
            frame_count: 10,
        },
        0.0,
        ChaCha8Rng::seed_from_u64(5),
    );
    for _ in 0..7 {
        vehicle.update(WORLD, WORLD, DT);
    }
    assert_eq!(vehicle.current_frame(), 0);
    vehicle.update(WORLD, WORLD, DT);
    assert_eq!(vehicle.current_frame(), 1);
}

#[test]
fn npc_patrol_reverses_at_range_in_both_directions() {
    let mut npc = Npc::new(
        Vec2::new(100.0, 50.0),
        3.0,
        PatrolAxis::Horizontal,
        NpcVisual::Static(region()),
    );
    for _ in 0..3 {
        npc.update(DT);
    }
    assert_eq!(npc.position.x, 103.0);
    assert_eq!(npc.direction(), -1.0);

    for _ in 0..6 {
        npc.update(DT);
    }
    assert_eq!(npc.position.x, 97.0);
    assert_eq!(npc.direction(), 1.0);
    assert_eq!(npc.position.y, 50.0);
    assert_eq!(npc.bounds().w, NPC_SIZE);
}

#[test]
fn vertical_npc_moves_only_along_y() {
    let sheet = ImageRegion::full(Arc::new(Image::solid(256, 128, [1, 2, 3, 255])));
    let sprite = AnimatedSprite::new(sheet, 64, 64, 4, FrameTimer::Ticks(2));
    let mut npc = Npc::new(
        Vec2::new(10.0, 10.0),
        5.0,
        PatrolAxis::Vertical,
        NpcVisual::Animated(sprite),
    );
    for _ in 0..5 {
        npc.update(DT);
    }
    assert_eq!(npc.position, Vec2::new(10.0, 15.0));
    assert_eq!(npc.direction(), -1.0);
}

#[test]
fn eight_way_diagonal_keeps_axis_speed() {
    let mut player = player_at(200.0, 200.0, MovementScheme::EightWay { attack: None });
    player.update(
        &input(&[InputAction::MoveUp, InputAction::MoveRight]),
        WORLD,
        WORLD,
        DT,
    );
    let dx = player.position.x - 200.0;
    let dy = player.position.y - 200.0;
    assert!((dx - PLAYER_SPEED * FRAC_1_SQRT_2).abs() < 1e-4);
    assert!((dy + PLAYER_SPEED * FRAC_1_SQRT_2).abs() < 1e-4);
    assert!((dx.hypot(dy) - PLAYER_SPEED).abs() < 1e-4);
    assert_eq!(player.facing(), Facing::UpRight);
}

#[test]
fn cardinal_prefers_left_and_up_and_faces_last_axis() {
    let mut player = player_at(200.0, 200.0, MovementScheme::Cardinal);
    player.update(
        &input(&[
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::MoveUp,
            InputAction::MoveDown,
        ]),
        WORLD,
        WORLD,
        DT,
    );
    assert_eq!(player.position, Vec2::new(197.0, 197.0));
    assert_eq!(player.facing(), Facing::Up);
    assert!(player.is_moving());
}

#[test]
fn player_is_clamped_to_world() {
    let mut player = player_at(1.0, 1.0, MovementScheme::Cardinal);
    player.update(
        &input(&[InputAction::MoveLeft, InputAction::MoveUp]),
        WORLD,
        WORLD,
        DT,
    );
    assert_eq!(player.position, Vec2::new(0.0, 0.0));

    let mut player = player_at(WORLD - PLAYER_SIZE - 1.0, WORLD - PLAYER_SIZE - 1.0, MovementScheme::Cardinal);
    player.update(
        &input(&[InputAction::MoveRight, InputAction::MoveDown]),
        WORLD,
        WORLD,
        DT,
    );
    assert_eq!(
        player.position,
        Vec2::new(WORLD - PLAYER_SIZE, WORLD - PLAYER_SIZE)
    );
}

#[test]
fn idle_player_rests_on_first_frame() {
    let mut player = player_at(200.0, 200.0, MovementScheme::Cardinal);
    for _ in 0..30 {
        player.update(&input(&[InputAction::MoveRight]), WORLD, WORLD, DT);
    }
    assert!(player.current_frame() > 0);

    player.update(&InputSnapshot::empty(), WORLD, WORLD, DT);
    assert_eq!(player.current_frame(), 0);
    assert!(!player.is_moving());
    assert_eq!(player.facing(), Facing::Right);
}

#[test]
fn attack_suppresses_movement_and_cannot_retrigger_early() {
    let attack_sheet = ImageRegion::full(Arc::new(Image::solid(256, 512, [200, 0, 0, 255])));
    let attack = AttackAnimation {
        sprite: AnimatedSprite::new(
            attack_sheet,
            64,
            64,
            4,
            FrameTimer::Interval(Duration::from_millis(200)),
        ),
        duration_ticks: ATTACK_DURATION_TICKS,
    };
    let mut player = player_at(
        200.0,
        200.0,
        MovementScheme::EightWay {
            attack: Some(attack),
        },
    );

    let attack_and_move = input(&[InputAction::Attack, InputAction::MoveRight]);
    for _ in 0..ATTACK_DURATION_TICKS {
        player.update(&attack_and_move, WORLD, WORLD, DT);
        assert!(player.is_attacking());
        assert_eq!(player.position, Vec2::new(200.0, 200.0));
    }

    player.update(&input(&[InputAction::MoveRight]), WORLD, WORLD, DT);
    assert!(!player.is_attacking());
    assert_eq!(player.position, Vec2::new(203.0, 200.0));
}

#[test]
fn attack_without_animation_is_ignored() {
    let mut player = player_at(200.0, 200.0, MovementScheme::EightWay { attack: None });
    player.update(
        &input(&[InputAction::Attack, InputAction::MoveDown]),
        WORLD,
        WORLD,
        DT,
    );
    assert!(!player.is_attacking());
    assert_eq!(player.position, Vec2::new(200.0, 203.0));
}

#[test]
fn respawn_resets_facing_and_motion() {
    let mut player = player_at(200.0, 200.0, MovementScheme::Cardinal);
    player.update(&input(&[InputAction::MoveLeft]), WORLD, WORLD, DT);
    player.respawn(Vec2::new(10.0, 20.0));
    assert_eq!(player.position, Vec2::new(10.0, 20.0));
    assert_eq!(player.facing(), Facing::Down);
    assert!(!player.is_moving());
    assert_eq!(
        player.hitbox(),
        Rect::new(
            10.0 + PLAYER_HITBOX_INSET,
            20.0 + PLAYER_HITBOX_INSET,
            PLAYER_SIZE - 2.0 * PLAYER_HITBOX_INSET,
            PLAYER_SIZE - 2.0 * PLAYER_HITBOX_INSET
        )
    );
}

#[test]
fn portal_animates_and_collected_items_report_no_frame_change() {
    let sheet = ImageRegion::full(Arc::new(Image::solid(192, 32, [0, 90, 200, 255])));
    let sprite = AnimatedSprite::new(
        sheet,
        32,
        32,
        6,
        FrameTimer::Interval(Duration::from_millis(200)),
    );
    let mut portal = Item::portal(Vec2::new(0.0, 0.0), sprite);
    for _ in 0..13 {
        portal.update(DT);
    }
    assert_eq!(portal.current_frame(), Some(1));

    let mut apple = Item::new(ItemKind::Beneficial, Vec2::new(0.0, 0.0), region());
    assert_eq!(apple.current_frame(), None);
    apple.collect();
    assert!(!apple.check_collision(&Rect::new(0.0, 0.0, 10.0, 10.0)));
}
