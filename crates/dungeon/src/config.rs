//! Dungeon configuration
//!
//! Defaults reproduce the tuned values of the torch-lit dungeon, so the scene
//! looks and sounds the same whether or not a config file is supplied.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use dungeon_engine::config::Config;
use dungeon_engine::events::KeyCode;
use serde::{Deserialize, Serialize};

/// Dungeon configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Asset locations
    pub assets: AssetsConfig,

    /// Ambient and torch lights
    pub lights: LightsConfig,

    /// Torch fire particles
    pub particles: ParticlesConfig,

    /// Shadow map
    pub shadows: ShadowsConfig,

    /// Gravity and camera collision
    pub collisions: CollisionsConfig,

    /// Footsteps and fire ambience
    pub audio: AudioConfig,

    /// Demo host settings
    pub app: AppConfig,
}

impl Config for DungeonConfig {}

/// Asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory every other asset path is relative to
    pub root: PathBuf,

    /// Scene description file
    pub scene: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            scene: PathBuf::from("dungeon.ron"),
        }
    }
}

/// Light configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    /// Ambient hemispheric light intensity
    pub ambient_intensity: f32,

    /// Mesh names the torch lights sit on
    pub torch_meshes: [String; 2],

    /// Torch light intensity before flickering
    pub torch_intensity: f32,

    /// Torch light color (0-255 per channel)
    pub torch_color: [u8; 3],

    /// Torch light range
    pub torch_range: f32,

    /// Flicker period in milliseconds
    pub flicker_interval_ms: u64,

    /// Largest intensity change per flicker tick
    pub flicker_max_delta: f32,
}

impl LightsConfig {
    /// Flicker period
    pub fn flicker_interval(&self) -> Duration {
        Duration::from_millis(self.flicker_interval_ms)
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.2,
            torch_meshes: ["torch".to_string(), "torch01".to_string()],
            torch_intensity: 0.5,
            torch_color: [255, 123, 63],
            torch_range: 30.0,
            flicker_interval_ms: 50,
            flicker_max_delta: 0.05,
        }
    }
}

/// Fire particle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlesConfig {
    /// Maximum live particles per system
    pub capacity: usize,

    /// Particle texture, relative to the asset root
    pub texture: PathBuf,

    /// Particle size range
    pub size: (f32, f32),

    /// Particle lifetime range in seconds
    pub lifetime: (f32, f32),

    /// Emit box minimum corner, relative to the emitter
    pub emit_box_min: [f32; 3],

    /// Emit box maximum corner, relative to the emitter
    pub emit_box_max: [f32; 3],

    /// Particles per second
    pub emit_rate: f32,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            capacity: 2000,
            texture: PathBuf::from("particles/flame.png"),
            size: (0.8, 1.2),
            lifetime: (0.3, 1.5),
            emit_box_min: [-0.1, 0.0, -0.1],
            emit_box_max: [0.1, 0.1, 0.1],
            emit_rate: 75.0,
        }
    }
}

/// Shadow configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowsConfig {
    /// Name marker of meshes that receive shadows
    pub receiver_marker: String,

    /// Name marker of meshes that cast shadows
    pub caster_marker: String,

    /// Shadow light direction
    pub light_direction: [f32; 3],

    /// Shadow light intensity
    pub light_intensity: f32,

    /// Shadow map resolution (power of two)
    pub resolution: u32,
}

impl Default for ShadowsConfig {
    fn default() -> Self {
        Self {
            receiver_marker: "floor".to_string(),
            caster_marker: "shadow".to_string(),
            light_direction: [0.0, -0.5, -0.3],
            light_intensity: 0.5,
            resolution: 512,
        }
    }
}

/// Collision configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionsConfig {
    /// World gravity
    pub gravity: [f32; 3],

    /// Camera collision ellipsoid radii
    pub camera_ellipsoid: [f32; 3],

    /// Name marker of invisible collider meshes
    pub collider_marker: String,
}

impl Default for CollisionsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, dungeon_engine::physics::EARTH_GRAVITY, 0.0],
            camera_ellipsoid: [1.0, 2.0, 1.0],
            collider_marker: "collider".to_string(),
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Footstep clips: first, second and occasional variation
    pub footsteps: [PathBuf; 3],

    /// Chance of the variation footstep on each step
    pub step3_probability: f32,

    /// Lowest movement key code
    pub movement_key_min: u32,

    /// Highest movement key code
    pub movement_key_max: u32,

    /// Looping fire clips, one per torch
    pub fire: [PathBuf; 2],

    /// Fire volume (0.0 - 1.0)
    pub fire_volume: f32,

    /// Distance at which the fire becomes silent
    pub fire_max_distance: f32,
}

impl AudioConfig {
    /// Key codes that count as movement
    pub fn movement_keys(&self) -> RangeInclusive<KeyCode> {
        KeyCode(self.movement_key_min)..=KeyCode(self.movement_key_max)
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            footsteps: [
                PathBuf::from("sounds/step1.wav"),
                PathBuf::from("sounds/step2.wav"),
                PathBuf::from("sounds/step3.wav"),
            ],
            step3_probability: 0.2,
            movement_key_min: KeyCode::UP.0,
            movement_key_max: KeyCode::DOWN.0,
            fire: [PathBuf::from("sounds/fire1.wav"), PathBuf::from("sounds/fire2.wav")],
            fire_volume: 0.2,
            fire_max_distance: 20.0,
        }
    }
}

/// Demo host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Simulated frames per second
    pub target_fps: u32,

    /// Frames to run before exiting
    pub frames: u32,
}

impl AppConfig {
    /// Simulated frame length
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: 60,
            frames: 600,
        }
    }
}
