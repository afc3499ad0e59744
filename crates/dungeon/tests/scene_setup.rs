//! Integration tests for dungeon setup against the headless engine
//!
//! Events are pumped the way a host does it: advance the clock, drain the
//! queue, hand every event to the dungeon.

use std::path::{Path, PathBuf};
use std::time::Duration;

use approx::assert_relative_eq;
use dungeon::{Dungeon, DungeonConfig, DungeonError, Footstep, InitStep, MeshRoles, ScriptedRandom, ThreadRandom};
use dungeon_engine::audio::backend::{AudioBackend, ClipInfo, SilentBackend, VoiceHandle};
use dungeon_engine::audio::AudioError;
use dungeon_engine::events::{EngineEvent, KeyCode};
use dungeon_engine::headless::EngineCall;
use dungeon_engine::scene::{BlendMode, LightKind, SceneDescription, ShadowFilter};
use dungeon_engine::{HeadlessEngine, SceneEngine};

const FRAME: Duration = Duration::from_millis(16);

fn dungeon_scene() -> SceneDescription {
    SceneDescription::default()
        .with_camera("camera", [0.0, 2.0, 0.0])
        .with_light("default", 1.0)
        .with_mesh("torch", [4.0, 2.0, 0.0])
        .with_mesh("torch01", [-4.0, 2.0, 0.0])
        .with_mesh("floor_01", [0.0, 0.0, 0.0])
        .with_mesh("wall_collider", [0.0, 1.0, 5.0])
        .with_mesh("shadow_caster_1", [1.0, 0.5, 1.0])
        .with_mesh("pillar", [2.0, 0.0, 2.0])
}

fn loaded_engine(scene: &SceneDescription) -> HeadlessEngine {
    let mut engine = HeadlessEngine::new();
    engine.load_scene_description(scene);
    engine
}

/// Advance one frame and dispatch every queued event
fn pump(engine: &mut HeadlessEngine, dungeon: &mut Dungeon, dt: Duration) -> Vec<EngineEvent> {
    engine.advance(dt);
    let events = engine.poll_events();
    for event in &events {
        dungeon.handle_event(engine, event).unwrap();
    }
    events
}

/// Engine with the scene loaded and the dungeon set up
fn set_up(dungeon: &mut Dungeon) -> HeadlessEngine {
    let mut engine = loaded_engine(&dungeon_scene());
    for event in engine.poll_events() {
        dungeon.handle_event(&mut engine, &event).unwrap();
    }
    assert!(dungeon.is_initialized());
    engine
}

/// Silent output that cannot start looping playback
struct NoLoopBackend(SilentBackend);

impl AudioBackend for NoLoopBackend {
    fn name(&self) -> &'static str {
        "no-loop"
    }

    fn load_clip(&mut self, path: &Path) -> Result<ClipInfo, AudioError> {
        self.0.load_clip(path)
    }

    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> Result<VoiceHandle, AudioError> {
        if looping {
            return Err(AudioError::PlaybackFailed("no device".to_string()));
        }
        self.0.play(path, volume, looping)
    }

    fn set_volume(&mut self, voice: VoiceHandle, volume: f32) -> Result<(), AudioError> {
        self.0.set_volume(voice, volume)
    }

    fn stop(&mut self, voice: VoiceHandle) -> Result<(), AudioError> {
        self.0.stop(voice)
    }

    fn stop_all(&mut self) {
        self.0.stop_all();
    }
}

fn walking_dungeon(roll: f32) -> (HeadlessEngine, Dungeon) {
    let mut dungeon = Dungeon::new(DungeonConfig::default()).with_random(ScriptedRandom::constant(roll));
    let mut engine = set_up(&mut dungeon);
    assert!(engine.press_key(KeyCode::UP));
    pump(&mut engine, &mut dungeon, FRAME);
    (engine, dungeon)
}

#[test]
fn test_setup_steps_run_once_in_order() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let engine = set_up(&mut dungeon);
    assert_eq!(dungeon.last_init_steps(), InitStep::ORDER);

    let journal = engine.journal();
    let camera = journal.first(|c| *c == EngineCall::AttachCameraControl).unwrap();
    let ambient = journal.first(|c| *c == EngineCall::AddLight(LightKind::Hemispheric)).unwrap();
    let flicker = journal.first(|c| *c == EngineCall::SetInterval).unwrap();
    let particles = journal.first(|c| matches!(c, EngineCall::CreateParticleSystem(_))).unwrap();
    let shadows = journal.first(|c| *c == EngineCall::CreateShadowGenerator).unwrap();
    let gravity = journal.first(|c| *c == EngineCall::SetGravity).unwrap();
    let sounds = journal.first(|c| matches!(c, EngineCall::CreateSound(_))).unwrap();

    assert!(camera < ambient);
    assert!(ambient < flicker && flicker < particles);
    assert!(particles < shadows);
    assert!(shadows < gravity);
    assert!(gravity < sounds);
    let last_sound = journal.last(|c| matches!(c, EngineCall::CreateSound(_))).unwrap();
    assert_eq!(journal.calls()[last_sound], EngineCall::CreateSound("fire2".to_string()));

    assert_eq!(journal.count(|c| *c == EngineCall::AttachCameraControl), 1);
    assert_eq!(journal.count(|c| *c == EngineCall::SetInterval), 1);
    assert_eq!(journal.count(|c| *c == EngineCall::CreateShadowGenerator), 1);
    assert_eq!(journal.count(|c| *c == EngineCall::SetGravity), 1);
    assert_eq!(journal.count(|c| matches!(c, EngineCall::CreateSound(_))), 5);
}

#[test]
fn test_second_load_event_replaces_previous_setup() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let mut engine = set_up(&mut dungeon);
    dungeon.handle_event(&mut engine, &EngineEvent::SceneLoaded).unwrap();

    assert_eq!(dungeon.init_count(), 2);
    assert_eq!(engine.active_intervals(), 1);
    assert_eq!(engine.particle_system_count(), 2);
    assert_eq!(engine.listener_count(), 3);
    assert_eq!(dungeon.scene_listeners().len(), 3);
    assert_eq!(engine.sound_count(), 5);
    assert_eq!(engine.lights().len(), 4);
    assert_eq!(engine.shadow_generators().count(), 1);
}

#[test]
fn test_scene_reload_sets_up_fresh_scene() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let mut engine = set_up(&mut dungeon);
    let first_interval = dungeon.flicker_interval().unwrap();

    engine.load_scene_description(&dungeon_scene());
    for event in engine.poll_events() {
        dungeon.handle_event(&mut engine, &event).unwrap();
    }

    assert_ne!(dungeon.flicker_interval(), Some(first_interval));
    assert_eq!(engine.active_intervals(), 1);
    assert_eq!(engine.particle_system_count(), 2);
    assert_eq!(engine.listener_count(), 3);
}

#[test]
fn test_torch_lights_and_particles() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let engine = set_up(&mut dungeon);

    let torch = engine.mesh_by_name("torch").unwrap();
    let torch01 = engine.mesh_by_name("torch01").unwrap();

    let lights: Vec<_> = dungeon.torch_lights().iter().map(|&id| engine.light(id).unwrap()).collect();
    assert_eq!(lights.len(), 2);
    assert_eq!(lights[0].kind, LightKind::Point);
    assert_eq!(lights[0].position, engine.mesh(torch).unwrap().position);
    assert_eq!(lights[1].position, engine.mesh(torch01).unwrap().position);
    assert_relative_eq!(lights[0].diffuse.x, 1.0);
    assert_relative_eq!(lights[0].diffuse.y, 123.0 / 255.0);
    assert_relative_eq!(lights[0].diffuse.z, 63.0 / 255.0);

    let systems: Vec<_> = dungeon
        .particle_systems()
        .iter()
        .map(|&id| engine.particle_system(id).unwrap())
        .collect();
    assert_eq!(systems.len(), 2);
    assert_eq!(systems[0].desc.emitter, torch);
    assert_eq!(systems[1].desc.emitter, torch01);
    for system in systems {
        assert!(system.running);
        assert_eq!(system.desc.capacity, 2000);
        assert_eq!(system.desc.blend_mode, BlendMode::Standard);
        assert_eq!(system.desc.texture, PathBuf::from("particles/flame.png"));
        assert_relative_eq!(system.desc.emit_rate, 75.0);
    }
}

#[test]
fn test_meshes_classified_by_name() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let engine = set_up(&mut dungeon);

    let floor = engine.mesh_by_name("floor_01").unwrap();
    let collider = engine.mesh_by_name("wall_collider").unwrap();
    let caster = engine.mesh_by_name("shadow_caster_1").unwrap();
    let pillar = engine.mesh_by_name("pillar").unwrap();

    assert!(engine.mesh(floor).unwrap().receive_shadows);
    assert!(!engine.mesh(collider).unwrap().visible);
    assert!(engine.mesh(pillar).unwrap().visible);
    assert!(!engine.mesh(pillar).unwrap().receive_shadows);
    assert_eq!(dungeon.mesh_roles(pillar), Some(MeshRoles::empty()));

    let generator = engine.shadow_generator(dungeon.shadow_generator().unwrap()).unwrap();
    assert_eq!(generator.render_list, vec![caster]);
    assert_eq!(generator.settings.resolution, 512);
    assert_eq!(generator.settings.filter, ShadowFilter::BlurVariance);
    assert_eq!(engine.light(generator.light).unwrap().kind, LightKind::Directional);
}

#[test]
fn test_collisions_configure_camera_and_world() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let engine = set_up(&mut dungeon);

    let physics = engine.physics();
    assert!(physics.collisions_enabled);
    assert_relative_eq!(physics.gravity.y, -9.81);

    let camera = engine.camera(engine.active_camera().unwrap()).unwrap();
    assert!(camera.control_attached);
    assert!(camera.collision.apply_gravity);
    assert!(camera.collision.check_collisions);
    assert_relative_eq!(camera.collision.ellipsoid.y, 2.0);
}

#[test]
fn test_movement_keys_toggle_walking() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let mut engine = set_up(&mut dungeon);

    engine.press_key(KeyCode::ENTER);
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(!dungeon.is_walking());

    engine.press_key(KeyCode::RIGHT);
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(dungeon.is_walking());

    engine.release_key(KeyCode::ENTER);
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(dungeon.is_walking());

    engine.release_key(KeyCode::RIGHT);
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(!dungeon.is_walking());
}

#[test]
fn test_roll_at_threshold_plays_regular_step() {
    let (engine, dungeon) = walking_dungeon(0.2);
    assert!(engine.is_sound_playing(dungeon.footstep_sound(Footstep::First).unwrap()));
    assert!(!engine.is_sound_playing(dungeon.footstep_sound(Footstep::Variation).unwrap()));
}

#[test]
fn test_low_roll_plays_variation_step() {
    let (engine, dungeon) = walking_dungeon(0.1);
    assert!(engine.is_sound_playing(dungeon.footstep_sound(Footstep::Variation).unwrap()));
    assert!(!engine.is_sound_playing(dungeon.footstep_sound(Footstep::First).unwrap()));
}

#[test]
fn test_footsteps_alternate_as_clips_end() {
    let (mut engine, mut dungeon) = walking_dungeon(0.9);
    let step1 = dungeon.footstep_sound(Footstep::First).unwrap();
    let step2 = dungeon.footstep_sound(Footstep::Second).unwrap();
    assert!(engine.is_sound_playing(step1));
    assert!(!dungeon.second_step_due());

    // A playing footstep blocks the next one
    pump(&mut engine, &mut dungeon, FRAME);
    assert_eq!(engine.sound(step1).unwrap().play_count, 1);

    engine.finish_sound(step1).unwrap();
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(dungeon.second_step_due());
    assert!(engine.is_sound_playing(step2));

    engine.finish_sound(step2).unwrap();
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(!dungeon.second_step_due());
    assert!(engine.is_sound_playing(step1));
    assert_eq!(engine.sound(step1).unwrap().play_count, 2);
}

#[test]
fn test_variation_step_resets_to_first_step() {
    // flicker delta, then footstep rolls
    let rolls = ScriptedRandom::new(vec![0.5, 0.9, 0.1, 0.9]);
    let mut dungeon = Dungeon::new(DungeonConfig::default()).with_random(rolls);
    let mut engine = set_up(&mut dungeon);
    assert!(engine.clear_interval(dungeon.flicker_interval().unwrap()));
    let step1 = dungeon.footstep_sound(Footstep::First).unwrap();
    let step3 = dungeon.footstep_sound(Footstep::Variation).unwrap();

    engine.press_key(KeyCode::UP);
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(engine.is_sound_playing(step1));

    engine.finish_sound(step1).unwrap();
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(engine.is_sound_playing(step3));
    assert!(dungeon.second_step_due());

    engine.finish_sound(step3).unwrap();
    let events = pump(&mut engine, &mut dungeon, FRAME);
    assert!(events.contains(&EngineEvent::SoundEnded(step3)));
    assert!(!dungeon.second_step_due());
    assert!(engine.is_sound_playing(step1));
    assert_eq!(engine.sound(step1).unwrap().play_count, 2);
}

#[test]
fn test_no_footsteps_when_standing_still() {
    let mut dungeon = Dungeon::new(DungeonConfig::default()).with_random(ScriptedRandom::constant(0.9));
    let mut engine = set_up(&mut dungeon);
    for _ in 0..10 {
        pump(&mut engine, &mut dungeon, FRAME);
    }
    for step in Footstep::ALL {
        assert!(!engine.is_sound_playing(dungeon.footstep_sound(step).unwrap()));
    }
}

#[test]
fn test_fire_sounds_loop_at_torches() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let engine = set_up(&mut dungeon);
    let torch = engine.mesh(engine.mesh_by_name("torch").unwrap()).unwrap().position;

    assert_eq!(dungeon.fire_sounds().len(), 2);
    let fire = engine.sound(dungeon.fire_sounds()[0]).unwrap();
    assert!(fire.playing);
    assert!(fire.desc.options.looping);
    assert!(fire.desc.options.spatial);
    assert_eq!(fire.position, torch);
    assert_eq!(engine.sound_by_name("fire"), Some(dungeon.fire_sounds()[0]));

    // Camera is 4 units from the torch: 0.2 * (1 - 3 / 19)
    let gain = engine.sound_gain(dungeon.fire_sounds()[0]).unwrap();
    assert_relative_eq!(gain, 0.2 * 16.0 / 19.0, epsilon = 1e-6);
}

#[test]
fn test_flicker_stays_near_baseline() {
    let mut dungeon = Dungeon::new(DungeonConfig::default()).with_random(ThreadRandom::seeded(3));
    let mut engine = set_up(&mut dungeon);
    let torches = dungeon.torch_lights().to_vec();

    let mut changed = false;
    for _ in 0..200 {
        pump(&mut engine, &mut dungeon, Duration::from_millis(50));
        for &light in &torches {
            let intensity = engine.light(light).unwrap().intensity;
            assert!((intensity - 0.5).abs() <= 0.05 + 1e-4, "intensity {intensity}");
            changed |= (intensity - 0.5).abs() > f32::EPSILON;
        }
    }
    assert!(changed);
}

#[test]
fn test_cancelled_flicker_stops_ticking() {
    let mut dungeon = Dungeon::new(DungeonConfig::default());
    let mut engine = set_up(&mut dungeon);
    let interval = dungeon.flicker_interval().unwrap();
    assert!(engine.clear_interval(interval));

    let torch = dungeon.torch_lights()[0];
    let before = engine.light(torch).unwrap().intensity;
    let events = pump(&mut engine, &mut dungeon, Duration::from_millis(500));
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::Interval(_))));
    assert_eq!(engine.light(torch).unwrap().intensity, before);
}

#[test]
fn test_missing_torch_fails_without_leaks() {
    let scene = SceneDescription::default()
        .with_camera("camera", [0.0, 2.0, 0.0])
        .with_light("default", 1.0)
        .with_mesh("torch", [4.0, 2.0, 0.0])
        .with_mesh("floor_01", [0.0, 0.0, 0.0]);
    let mut engine = loaded_engine(&scene);
    let mut dungeon = Dungeon::new(DungeonConfig::default());

    let err = dungeon.handle_event(&mut engine, &EngineEvent::SceneLoaded).unwrap_err();
    assert!(matches!(err, DungeonError::MeshNotFound(ref name) if name == "torch01"));

    assert!(!dungeon.is_initialized());
    assert_eq!(dungeon.last_init_steps(), [InitStep::Camera]);
    assert_eq!(engine.active_intervals(), 0);
    assert_eq!(engine.listener_count(), 0);
    assert_eq!(engine.particle_system_count(), 0);
    assert!(engine.lights().is_empty());
    let camera = engine.camera(engine.active_camera().unwrap()).unwrap();
    assert!(!camera.control_attached);
}

#[test]
fn test_failed_fire_playback_releases_everything() {
    let mut engine = HeadlessEngine::with_audio_backend(Box::new(NoLoopBackend(SilentBackend::new())));
    engine.load_scene_description(&dungeon_scene());
    let mut dungeon = Dungeon::new(DungeonConfig::default());

    let err = dungeon.initialize(&mut engine).unwrap_err();
    assert!(matches!(err, DungeonError::Engine(_)));
    assert!(!dungeon.is_initialized());
    assert_eq!(dungeon.last_init_steps().last(), Some(&InitStep::Collisions));

    assert_eq!(engine.sound_count(), 0);
    assert_eq!(engine.active_intervals(), 0);
    assert_eq!(engine.listener_count(), 0);
    assert_eq!(engine.particle_system_count(), 0);
    assert_eq!(engine.shadow_generators().count(), 0);
    assert!(engine.lights().is_empty());
}

#[test]
fn test_scene_without_camera_is_rejected() {
    let scene = SceneDescription::default().with_mesh("torch", [0.0; 3]).with_mesh("torch01", [1.0; 3]);
    let mut engine = loaded_engine(&scene);
    let mut dungeon = Dungeon::new(DungeonConfig::default());

    let err = dungeon.initialize(&mut engine).unwrap_err();
    assert!(matches!(err, DungeonError::NoActiveCamera));
    assert!(dungeon.last_init_steps().is_empty());
}

#[test]
fn test_open_loads_packaged_scene_and_forwards_resizes() {
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets");
    let mut engine = HeadlessEngine::new().with_asset_root(assets);
    let mut dungeon = Dungeon::new(DungeonConfig::default());

    dungeon.open(&mut engine).unwrap();
    assert!(engine.is_ready());
    pump(&mut engine, &mut dungeon, FRAME);
    assert!(dungeon.is_initialized());
    // resize hook plus the three scene listeners
    assert_eq!(engine.listener_count(), 4);

    assert!(engine.resize_window(800, 600));
    pump(&mut engine, &mut dungeon, FRAME);
    assert_eq!(engine.surface_size(), (800, 600));

    dungeon.dispose(&mut engine);
    assert_eq!(engine.listener_count(), 0);
    assert_eq!(engine.active_intervals(), 0);
}
