//! The capability surface a scene script drives
//!
//! [`SceneEngine`] is everything the dungeon setup is allowed to touch: lights,
//! meshes, particle systems, shadow generators, physics switches, sounds,
//! repeating intervals and event listeners. Implementations own every object
//! and hand out generational handles.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::audio::{AudioError, SoundDesc};
use crate::events::{EngineEvent, ListenerKind};
use crate::foundation::math::Vec3;
use crate::physics::CameraCollision;
use crate::scene::{
    Camera, CameraId, IntervalId, Light, LightId, ListenerId, Mesh, MeshId, ParticleSystemDesc,
    ParticleSystemId, ShadowGeneratorId, ShadowMapSettings, SoundId,
};

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A handle refers to an object that no longer exists
    #[error("stale {0} handle")]
    StaleHandle(&'static str),

    /// A request carried unusable values
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The scene could not be loaded
    #[error("scene load failed: {0}")]
    SceneLoad(String),

    /// Audio backend failure
    #[error("audio error: {0}")]
    Audio(#[from] AudioError),
}

/// Scene capabilities exposed by an engine
pub trait SceneEngine {
    // --- Scene ---

    /// Start loading a scene file; [`EngineEvent::SceneLoaded`] is queued once it is ready
    fn load_scene(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Whether a loaded scene is ready for setup
    fn is_ready(&self) -> bool;

    // --- Camera ---

    /// The camera currently rendering the scene
    fn active_camera(&self) -> Option<CameraId>;

    /// Read a camera
    fn camera(&self, id: CameraId) -> Result<&Camera, EngineError>;

    /// Let user input drive the camera
    fn attach_camera_control(&mut self, id: CameraId) -> Result<(), EngineError>;

    /// Stop user input from driving the camera
    fn detach_camera_control(&mut self, id: CameraId) -> Result<(), EngineError>;

    /// Set gravity/collision behaviour of a camera
    fn set_camera_collision(&mut self, id: CameraId, collision: CameraCollision) -> Result<(), EngineError>;

    // --- Lights ---

    /// All lights in the scene
    fn lights(&self) -> Vec<LightId>;

    /// Read a light
    fn light(&self, id: LightId) -> Result<&Light, EngineError>;

    /// Add a light to the scene
    fn add_light(&mut self, light: Light) -> LightId;

    /// Remove and destroy a light
    fn dispose_light(&mut self, id: LightId) -> Result<(), EngineError>;

    /// Change a light's intensity
    fn set_light_intensity(&mut self, id: LightId, intensity: f32) -> Result<(), EngineError>;

    // --- Meshes ---

    /// All meshes in the scene
    fn meshes(&self) -> Vec<MeshId>;

    /// Read a mesh
    fn mesh(&self, id: MeshId) -> Result<&Mesh, EngineError>;

    /// First mesh with exactly this name
    fn mesh_by_name(&self, name: &str) -> Option<MeshId>;

    /// Toggle shadow receiving on a mesh
    fn set_receive_shadows(&mut self, id: MeshId, receive: bool) -> Result<(), EngineError>;

    /// Toggle mesh visibility
    fn set_mesh_visible(&mut self, id: MeshId, visible: bool) -> Result<(), EngineError>;

    // --- Particles ---

    /// Build a (stopped) particle system
    fn create_particle_system(&mut self, desc: ParticleSystemDesc) -> Result<ParticleSystemId, EngineError>;

    /// Start emitting
    fn start_particle_system(&mut self, id: ParticleSystemId) -> Result<(), EngineError>;

    /// Stop and destroy a particle system
    fn dispose_particle_system(&mut self, id: ParticleSystemId) -> Result<(), EngineError>;

    // --- Shadows ---

    /// Build a shadow-map generator rendering from `light`
    fn create_shadow_generator(
        &mut self,
        light: LightId,
        settings: ShadowMapSettings,
    ) -> Result<ShadowGeneratorId, EngineError>;

    /// Add a mesh to the generator's render list
    fn add_shadow_caster(&mut self, generator: ShadowGeneratorId, mesh: MeshId) -> Result<(), EngineError>;

    /// Destroy a shadow generator
    fn dispose_shadow_generator(&mut self, id: ShadowGeneratorId) -> Result<(), EngineError>;

    // --- Physics ---

    /// Set world gravity
    fn set_gravity(&mut self, gravity: Vec3);

    /// Globally enable or disable collision checking
    fn set_collisions_enabled(&mut self, enabled: bool);

    // --- Audio ---

    /// Load a sound (and start it when `autoplay` is set)
    fn create_sound(&mut self, desc: SoundDesc) -> Result<SoundId, EngineError>;

    /// Start playing a sound from the beginning
    fn play_sound(&mut self, id: SoundId) -> Result<(), EngineError>;

    /// Whether a sound is currently playing
    fn is_sound_playing(&self, id: SoundId) -> bool;

    /// Move a spatial sound
    fn set_sound_position(&mut self, id: SoundId, position: Vec3) -> Result<(), EngineError>;

    /// Stop and destroy a sound
    fn dispose_sound(&mut self, id: SoundId) -> Result<(), EngineError>;

    // --- Scheduling and events ---

    /// Fire [`EngineEvent::Interval`] every `period` until cleared
    fn set_interval(&mut self, period: Duration) -> IntervalId;

    /// Cancel an interval; returns `false` if it was not active
    fn clear_interval(&mut self, id: IntervalId) -> bool;

    /// Subscribe to a kind of event
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Unsubscribe; returns `false` if it was not registered
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Resize the render surface
    fn resize(&mut self, width: u32, height: u32);

    /// Take all pending events
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}
