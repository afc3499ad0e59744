//! Dungeon demo application
//!
//! Loads the dungeon scene into the headless engine, runs the setup on scene
//! load and simulates a short walk through the room: movement keys are
//! pressed and released on fixed frames, and the window is resized once.

use std::path::PathBuf;

use dungeon::{Dungeon, DungeonConfig, Footstep};
use dungeon_engine::audio::backend::{AudioBackend, SilentBackend};
use dungeon_engine::config::Config;
use dungeon_engine::events::KeyCode;
use dungeon_engine::foundation::logging;
use dungeon_engine::foundation::time::Timer;
use dungeon_engine::headless::EngineCall;
use dungeon_engine::{HeadlessEngine, SceneEngine};

/// Input injected on a given frame
#[derive(Debug, Clone, Copy)]
enum ScriptedInput {
    Press(KeyCode),
    Release(KeyCode),
    Resize(u32, u32),
}

/// Walk forward, try a non-movement key, back up, resize the window
const WALK_SCRIPT: &[(u32, ScriptedInput)] = &[
    (60, ScriptedInput::Press(KeyCode::UP)),
    (120, ScriptedInput::Resize(1024, 768)),
    (240, ScriptedInput::Release(KeyCode::UP)),
    (300, ScriptedInput::Press(KeyCode::LEFT)),
    (310, ScriptedInput::Release(KeyCode::LEFT)),
    (320, ScriptedInput::Press(KeyCode::DOWN)),
    (480, ScriptedInput::Release(KeyCode::DOWN)),
];

struct DungeonApp {
    engine: HeadlessEngine,
    dungeon: Dungeon,
    config: DungeonConfig,
}

impl DungeonApp {
    fn new(config: DungeonConfig) -> Self {
        log::info!("Creating headless engine (assets: {})", config.assets.root.display());
        let engine = HeadlessEngine::with_audio_backend(audio_backend()).with_asset_root(&config.assets.root);
        let dungeon = Dungeon::new(config.clone());
        Self { engine, dungeon, config }
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        for asset in dungeon::assets::missing(&self.config) {
            log::warn!("Missing {:?} asset: {}", asset.kind, asset.path.display());
        }

        self.dungeon.open(&mut self.engine)?;
        if !self.engine.is_ready() {
            log::warn!("Scene not ready after load");
        }

        let frame_time = self.config.app.frame_time();
        let mut timer = Timer::new();
        log::info!(
            "Running {} frames at {} fps",
            self.config.app.frames,
            self.config.app.target_fps
        );

        for frame in 0..self.config.app.frames {
            for (_, input) in WALK_SCRIPT.iter().filter(|(at, _)| *at == frame) {
                self.inject(*input);
            }

            self.engine.advance(frame_time);
            for event in self.engine.poll_events() {
                self.dungeon.handle_event(&mut self.engine, &event)?;
            }
            timer.update();
        }

        self.report(timer.average_fps());
        self.dungeon.dispose(&mut self.engine);
        Ok(())
    }

    fn inject(&mut self, input: ScriptedInput) {
        log::debug!("Input: {input:?}");
        match input {
            ScriptedInput::Press(code) => {
                self.engine.press_key(code);
            }
            ScriptedInput::Release(code) => {
                self.engine.release_key(code);
            }
            ScriptedInput::Resize(width, height) => {
                self.engine.resize_window(width, height);
            }
        }
    }

    fn report(&self, average_fps: f32) {
        let journal = self.engine.journal();
        let steps = journal.count(|c| matches!(c, EngineCall::PlaySound(name) if name.starts_with("step")));
        let flickers = journal.count(|c| *c == EngineCall::SetLightIntensity) / 2;

        log::info!("Simulated {} frames ({average_fps:.0} fps wall clock)", self.engine.frame());
        log::info!("Footsteps played: {steps}, flicker ticks: {flickers}");
        log::info!("Render surface: {:?}", self.engine.surface_size());

        for &light in self.dungeon.torch_lights() {
            if let Ok(light) = self.engine.light(light) {
                log::info!("Torch light '{}' intensity {:.3}", light.name, light.intensity);
            }
        }
        for system in self.dungeon.particle_systems() {
            if let Some(state) = self.engine.particle_system(*system) {
                log::info!("Particle system '{}' emitted {:.0}", state.desc.name, state.emitted);
            }
        }
        if let Some(step) = self.dungeon.footstep_sound(Footstep::First) {
            if let Some(sound) = self.engine.sound(step) {
                log::debug!("'{}' started {} time(s)", sound.desc.name, sound.play_count);
            }
        }
    }
}

#[cfg(feature = "rodio-audio")]
fn audio_backend() -> Box<dyn AudioBackend> {
    use dungeon_engine::audio::backend::rodio_backend::RodioBackend;

    match RodioBackend::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("Audio output unavailable, running silent: {e}");
            Box::new(SilentBackend::new())
        }
    }
}

#[cfg(not(feature = "rodio-audio"))]
fn audio_backend() -> Box<dyn AudioBackend> {
    Box::new(SilentBackend::new())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook for better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {panic_info}");
    }));

    let config_path = std::env::args().nth(1).map_or_else(|| PathBuf::from("dungeon.toml"), PathBuf::from);
    let config = match DungeonConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logging::init_with_level("info");
            log::error!("Failed to load {}: {e}", config_path.display());
            return Err(e.into());
        }
    };

    logging::init_with_level(&config.app.log_level);
    log::info!("Starting dungeon demo");

    let mut app = DungeonApp::new(config);
    match app.run() {
        Ok(()) => {
            log::info!("Dungeon demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Dungeon demo failed: {e}");
            Err(e)
        }
    }
}
