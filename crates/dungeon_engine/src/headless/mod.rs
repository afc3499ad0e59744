//! In-memory engine without a GPU or audio device
//!
//! `HeadlessEngine` implements [`SceneEngine`] by keeping scene state in
//! slot maps and simulating time: intervals fire, non-looping sounds end after
//! their clip length, started particle systems accumulate emitted particles,
//! and a before-render event is raised once per frame. Window input is
//! injected with [`HeadlessEngine::press_key`] and friends.
//!
//! Every capability call is appended to a [`Journal`], which is what
//! sequencing tests inspect.

pub mod journal;

use std::path::{Path, PathBuf};
use std::time::Duration;

use slotmap::SlotMap;

use crate::audio::backend::{AudioBackend, ClipInfo, SilentBackend, VoiceHandle};
use crate::audio::{SoundDesc, SpatialAudio, SpatialConfig};
use crate::engine::{EngineError, SceneEngine};
use crate::events::{EngineEvent, EventQueue, KeyCode, ListenerKind};
use crate::foundation::math::{vec3, Vec3};
use crate::foundation::time::IntervalTimer;
use crate::physics::{CameraCollision, PhysicsSettings};
use crate::scene::{
    Camera, CameraId, IntervalId, Light, LightId, ListenerId, Mesh, MeshId, ParticleSystemDesc,
    ParticleSystemId, SceneDescription, ShadowGeneratorId, ShadowMapSettings, SoundId,
};

pub use journal::{EngineCall, Journal};

/// Default render surface size
const DEFAULT_SURFACE: (u32, u32) = (1280, 720);

/// Simulated particle system
#[derive(Debug, Clone)]
pub struct ParticleSystemState {
    /// Creation parameters
    pub desc: ParticleSystemDesc,
    /// Whether the system is emitting
    pub running: bool,
    /// Particles emitted since start
    pub emitted: f64,
}

/// Simulated shadow-map generator
#[derive(Debug, Clone)]
pub struct ShadowGeneratorState {
    /// Light the map renders from
    pub light: LightId,
    /// Map settings
    pub settings: ShadowMapSettings,
    /// Meshes drawn into the map
    pub render_list: Vec<MeshId>,
}

/// Simulated sound
#[derive(Debug, Clone)]
pub struct SoundState {
    /// Creation parameters
    pub desc: SoundDesc,
    /// Clip metadata reported by the backend
    pub clip: ClipInfo,
    /// World position (spatial sounds)
    pub position: Vec3,
    /// Whether the sound is playing
    pub playing: bool,
    /// Time into the current pass
    pub elapsed: Duration,
    /// Times playback was started
    pub play_count: u32,
    voice: Option<VoiceHandle>,
}

/// Engine that simulates a scene in memory
pub struct HeadlessEngine {
    asset_root: PathBuf,
    cameras: SlotMap<CameraId, Camera>,
    active_camera: Option<CameraId>,
    lights: SlotMap<LightId, Light>,
    meshes: SlotMap<MeshId, Mesh>,
    particle_systems: SlotMap<ParticleSystemId, ParticleSystemState>,
    shadow_generators: SlotMap<ShadowGeneratorId, ShadowGeneratorState>,
    sounds: SlotMap<SoundId, SoundState>,
    intervals: SlotMap<IntervalId, IntervalTimer>,
    events: EventQueue,
    physics: PhysicsSettings,
    audio: Box<dyn AudioBackend>,
    surface: (u32, u32),
    frame: u64,
    ready: bool,
    journal: Journal,
}

impl HeadlessEngine {
    /// Create an empty engine with the silent audio backend
    pub fn new() -> Self {
        Self::with_audio_backend(Box::new(SilentBackend::new()))
    }

    /// Create an empty engine with a specific audio backend
    pub fn with_audio_backend(audio: Box<dyn AudioBackend>) -> Self {
        log::debug!("Headless engine using '{}' audio backend", audio.name());
        Self {
            asset_root: PathBuf::from("."),
            cameras: SlotMap::with_key(),
            active_camera: None,
            lights: SlotMap::with_key(),
            meshes: SlotMap::with_key(),
            particle_systems: SlotMap::with_key(),
            shadow_generators: SlotMap::with_key(),
            sounds: SlotMap::with_key(),
            intervals: SlotMap::with_key(),
            events: EventQueue::new(),
            physics: PhysicsSettings::default(),
            audio,
            surface: DEFAULT_SURFACE,
            frame: 0,
            ready: false,
            journal: Journal::default(),
        }
    }

    /// Resolve asset paths (scene files, clips) against `root`
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Replace the current scene with `scene` and queue [`EngineEvent::SceneLoaded`]
    ///
    /// Every scene object of the previous scene is dropped, so handles to them
    /// turn stale. Intervals and listeners belong to the host window and stay
    /// registered; pending events are discarded.
    pub fn load_scene_description(&mut self, scene: &SceneDescription) {
        self.unload();

        if let Some(camera) = &scene.camera {
            let id = self.cameras.insert(Camera {
                name: camera.name.clone(),
                position: vec3(camera.position),
                control_attached: false,
                collision: CameraCollision::default(),
            });
            self.active_camera = Some(id);
        }
        for light in &scene.lights {
            self.lights.insert(Light::hemispheric(light.name.clone(), Vec3::y(), light.intensity));
        }
        for mesh in &scene.meshes {
            self.meshes.insert(Mesh::new(mesh.name.clone(), vec3(mesh.position)));
        }

        log::info!(
            "Scene loaded: {} mesh(es), {} light(s), camera: {}",
            self.meshes.len(),
            self.lights.len(),
            self.active_camera.is_some()
        );
        self.ready = true;
        self.events.push(EngineEvent::SceneLoaded);
    }

    fn unload(&mut self) {
        self.audio.stop_all();
        self.cameras.clear();
        self.active_camera = None;
        self.lights.clear();
        self.meshes.clear();
        self.particle_systems.clear();
        self.shadow_generators.clear();
        self.sounds.clear();
        self.events.clear_pending();
        self.physics = PhysicsSettings::default();
        self.ready = false;
    }

    /// Advance simulated time by `dt` and queue the resulting events
    ///
    /// Order within one call: interval ticks, sound endings, then a single
    /// before-render event.
    pub fn advance(&mut self, dt: Duration) {
        for (id, timer) in &mut self.intervals {
            for _ in 0..timer.advance(dt) {
                self.events.push(EngineEvent::Interval(id));
            }
        }

        for (id, sound) in &mut self.sounds {
            if !sound.playing {
                continue;
            }
            sound.elapsed += dt;
            if sound.elapsed < sound.clip.length {
                continue;
            }
            if sound.desc.options.looping {
                let length = sound.clip.length.as_nanos().max(1);
                let wrapped = sound.elapsed.as_nanos() % length;
                sound.elapsed = Duration::from_nanos(u64::try_from(wrapped).unwrap_or(0));
            } else {
                sound.playing = false;
                sound.elapsed = Duration::ZERO;
                if let Some(voice) = sound.voice.take() {
                    stop_voice(self.audio.as_mut(), voice);
                }
                self.events.push(EngineEvent::SoundEnded(id));
            }
        }

        let seconds = dt.as_secs_f64();
        for system in self.particle_systems.values_mut().filter(|s| s.running) {
            system.emitted += f64::from(system.desc.emit_rate) * seconds;
        }

        self.frame += 1;
        self.events.push(EngineEvent::BeforeRender);
    }

    /// Inject a key press (queued only while a key-down listener exists)
    pub fn press_key(&mut self, code: KeyCode) -> bool {
        self.events.push(EngineEvent::KeyDown(code))
    }

    /// Inject a key release (queued only while a key-up listener exists)
    pub fn release_key(&mut self, code: KeyCode) -> bool {
        self.events.push(EngineEvent::KeyUp(code))
    }

    /// Inject a window resize (queued only while a resize listener exists)
    pub fn resize_window(&mut self, width: u32, height: u32) -> bool {
        self.events.push(EngineEvent::Resized { width, height })
    }

    /// End a playing sound now, as if its clip ran out
    pub fn finish_sound(&mut self, id: SoundId) -> Result<(), EngineError> {
        let sound = self.sounds.get_mut(id).ok_or(EngineError::StaleHandle("sound"))?;
        if sound.playing {
            sound.playing = false;
            sound.elapsed = Duration::ZERO;
            if let Some(voice) = sound.voice.take() {
                stop_voice(self.audio.as_mut(), voice);
            }
            self.events.push(EngineEvent::SoundEnded(id));
        }
        Ok(())
    }

    /// Gain a listener at the active camera would hear for a sound
    pub fn sound_gain(&self, id: SoundId) -> Option<f32> {
        let sound = self.sounds.get(id)?;
        Some(self.gain_for(sound))
    }

    fn gain_for(&self, sound: &SoundState) -> f32 {
        let options = sound.desc.options;
        if !options.spatial {
            return options.volume;
        }
        let mut spatial = SpatialAudio::new(SpatialConfig::with_max_distance(options.max_distance));
        if let Some(camera) = self.active_camera.and_then(|id| self.cameras.get(id)) {
            spatial.set_listener_position(camera.position);
        }
        options.volume * spatial.calculate_attenuation(sound.position)
    }

    fn start_sound(&mut self, id: SoundId) -> Result<(), EngineError> {
        let sound = self.sounds.get(id).ok_or(EngineError::StaleHandle("sound"))?;
        let gain = self.gain_for(sound);
        let path = self.asset_root.join(&sound.desc.path);
        let looping = sound.desc.options.looping;
        let previous = sound.voice;

        if let Some(voice) = previous {
            stop_voice(self.audio.as_mut(), voice);
        }
        let voice = self.audio.play(&path, gain, looping)?;

        let sound = self.sounds.get_mut(id).ok_or(EngineError::StaleHandle("sound"))?;
        sound.voice = Some(voice);
        sound.playing = true;
        sound.elapsed = Duration::ZERO;
        sound.play_count += 1;
        self.journal.record(EngineCall::PlaySound(sound.desc.name.clone()));
        Ok(())
    }

    /// Frames simulated so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current render surface size
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    /// Scene-wide physics switches
    pub fn physics(&self) -> PhysicsSettings {
        self.physics
    }

    /// Read a particle system
    pub fn particle_system(&self, id: ParticleSystemId) -> Option<&ParticleSystemState> {
        self.particle_systems.get(id)
    }

    /// Number of live particle systems
    pub fn particle_system_count(&self) -> usize {
        self.particle_systems.len()
    }

    /// Read a shadow generator
    pub fn shadow_generator(&self, id: ShadowGeneratorId) -> Option<&ShadowGeneratorState> {
        self.shadow_generators.get(id)
    }

    /// Iterate over live shadow generators
    pub fn shadow_generators(&self) -> impl Iterator<Item = (ShadowGeneratorId, &ShadowGeneratorState)> {
        self.shadow_generators.iter()
    }

    /// Read a sound
    pub fn sound(&self, id: SoundId) -> Option<&SoundState> {
        self.sounds.get(id)
    }

    /// Find a sound by name
    pub fn sound_by_name(&self, name: &str) -> Option<SoundId> {
        self.sounds.iter().find(|(_, s)| s.desc.name == name).map(|(id, _)| id)
    }

    /// Number of live sounds
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Number of active intervals
    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    /// Whether anyone listens for `kind`
    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.events.has_listener(kind)
    }

    /// Capability call log
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn mesh_name(&self, id: MeshId) -> String {
        self.meshes.get(id).map(|m| m.name.clone()).unwrap_or_default()
    }
}

/// Stop a voice, tolerating one the backend already released
fn stop_voice(audio: &mut dyn AudioBackend, voice: VoiceHandle) {
    if let Err(err) = audio.stop(voice) {
        log::debug!("Voice {voice:?} already stopped: {err}");
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneEngine for HeadlessEngine {
    fn load_scene(&mut self, path: &Path) -> Result<(), EngineError> {
        self.journal.record(EngineCall::LoadScene);
        let full_path = self.asset_root.join(path);
        let scene = SceneDescription::load(&full_path)?;
        self.load_scene_description(&scene);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn active_camera(&self) -> Option<CameraId> {
        self.active_camera
    }

    fn camera(&self, id: CameraId) -> Result<&Camera, EngineError> {
        self.cameras.get(id).ok_or(EngineError::StaleHandle("camera"))
    }

    fn attach_camera_control(&mut self, id: CameraId) -> Result<(), EngineError> {
        let camera = self.cameras.get_mut(id).ok_or(EngineError::StaleHandle("camera"))?;
        camera.control_attached = true;
        self.journal.record(EngineCall::AttachCameraControl);
        Ok(())
    }

    fn detach_camera_control(&mut self, id: CameraId) -> Result<(), EngineError> {
        let camera = self.cameras.get_mut(id).ok_or(EngineError::StaleHandle("camera"))?;
        camera.control_attached = false;
        self.journal.record(EngineCall::DetachCameraControl);
        Ok(())
    }

    fn set_camera_collision(&mut self, id: CameraId, collision: CameraCollision) -> Result<(), EngineError> {
        let camera = self.cameras.get_mut(id).ok_or(EngineError::StaleHandle("camera"))?;
        camera.collision = collision;
        self.journal.record(EngineCall::SetCameraCollision);
        Ok(())
    }

    fn lights(&self) -> Vec<LightId> {
        self.lights.keys().collect()
    }

    fn light(&self, id: LightId) -> Result<&Light, EngineError> {
        self.lights.get(id).ok_or(EngineError::StaleHandle("light"))
    }

    fn add_light(&mut self, light: Light) -> LightId {
        self.journal.record(EngineCall::AddLight(light.kind));
        self.lights.insert(light)
    }

    fn dispose_light(&mut self, id: LightId) -> Result<(), EngineError> {
        self.lights.remove(id).ok_or(EngineError::StaleHandle("light"))?;
        self.journal.record(EngineCall::DisposeLight);
        Ok(())
    }

    fn set_light_intensity(&mut self, id: LightId, intensity: f32) -> Result<(), EngineError> {
        let light = self.lights.get_mut(id).ok_or(EngineError::StaleHandle("light"))?;
        light.intensity = intensity;
        self.journal.record(EngineCall::SetLightIntensity);
        Ok(())
    }

    fn meshes(&self) -> Vec<MeshId> {
        self.meshes.keys().collect()
    }

    fn mesh(&self, id: MeshId) -> Result<&Mesh, EngineError> {
        self.meshes.get(id).ok_or(EngineError::StaleHandle("mesh"))
    }

    fn mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.meshes.iter().find(|(_, m)| m.name == name).map(|(id, _)| id)
    }

    fn set_receive_shadows(&mut self, id: MeshId, receive: bool) -> Result<(), EngineError> {
        let mesh = self.meshes.get_mut(id).ok_or(EngineError::StaleHandle("mesh"))?;
        mesh.receive_shadows = receive;
        let name = mesh.name.clone();
        self.journal.record(EngineCall::SetReceiveShadows(name));
        Ok(())
    }

    fn set_mesh_visible(&mut self, id: MeshId, visible: bool) -> Result<(), EngineError> {
        let mesh = self.meshes.get_mut(id).ok_or(EngineError::StaleHandle("mesh"))?;
        mesh.visible = visible;
        let name = mesh.name.clone();
        self.journal.record(EngineCall::SetMeshVisible(name));
        Ok(())
    }

    fn create_particle_system(&mut self, desc: ParticleSystemDesc) -> Result<ParticleSystemId, EngineError> {
        if !self.meshes.contains_key(desc.emitter) {
            return Err(EngineError::StaleHandle("mesh"));
        }
        desc.validate().map_err(EngineError::InvalidParameter)?;
        self.journal.record(EngineCall::CreateParticleSystem(desc.name.clone()));
        Ok(self.particle_systems.insert(ParticleSystemState {
            desc,
            running: false,
            emitted: 0.0,
        }))
    }

    fn start_particle_system(&mut self, id: ParticleSystemId) -> Result<(), EngineError> {
        let system = self.particle_systems.get_mut(id).ok_or(EngineError::StaleHandle("particle system"))?;
        system.running = true;
        self.journal.record(EngineCall::StartParticleSystem);
        Ok(())
    }

    fn dispose_particle_system(&mut self, id: ParticleSystemId) -> Result<(), EngineError> {
        self.particle_systems.remove(id).ok_or(EngineError::StaleHandle("particle system"))?;
        self.journal.record(EngineCall::DisposeParticleSystem);
        Ok(())
    }

    fn create_shadow_generator(
        &mut self,
        light: LightId,
        settings: ShadowMapSettings,
    ) -> Result<ShadowGeneratorId, EngineError> {
        if !self.lights.contains_key(light) {
            return Err(EngineError::StaleHandle("light"));
        }
        if settings.resolution == 0 || !settings.resolution.is_power_of_two() {
            return Err(EngineError::InvalidParameter(format!(
                "shadow map resolution {} is not a power of two",
                settings.resolution
            )));
        }
        self.journal.record(EngineCall::CreateShadowGenerator);
        Ok(self.shadow_generators.insert(ShadowGeneratorState {
            light,
            settings,
            render_list: Vec::new(),
        }))
    }

    fn add_shadow_caster(&mut self, generator: ShadowGeneratorId, mesh: MeshId) -> Result<(), EngineError> {
        if !self.meshes.contains_key(mesh) {
            return Err(EngineError::StaleHandle("mesh"));
        }
        let name = self.mesh_name(mesh);
        let state = self
            .shadow_generators
            .get_mut(generator)
            .ok_or(EngineError::StaleHandle("shadow generator"))?;
        state.render_list.push(mesh);
        self.journal.record(EngineCall::AddShadowCaster(name));
        Ok(())
    }

    fn dispose_shadow_generator(&mut self, id: ShadowGeneratorId) -> Result<(), EngineError> {
        self.shadow_generators.remove(id).ok_or(EngineError::StaleHandle("shadow generator"))?;
        self.journal.record(EngineCall::DisposeShadowGenerator);
        Ok(())
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.physics.gravity = gravity;
        self.journal.record(EngineCall::SetGravity);
    }

    fn set_collisions_enabled(&mut self, enabled: bool) {
        self.physics.collisions_enabled = enabled;
        self.journal.record(EngineCall::SetCollisionsEnabled(enabled));
    }

    fn create_sound(&mut self, desc: SoundDesc) -> Result<SoundId, EngineError> {
        if !(0.0..=1.0).contains(&desc.options.volume) {
            return Err(EngineError::InvalidParameter(format!(
                "sound '{}' volume {} outside 0..=1",
                desc.name, desc.options.volume
            )));
        }
        let clip = self.audio.load_clip(&self.asset_root.join(&desc.path))?;
        let autoplay = desc.options.autoplay;
        self.journal.record(EngineCall::CreateSound(desc.name.clone()));
        let id = self.sounds.insert(SoundState {
            desc,
            clip,
            position: Vec3::zeros(),
            playing: false,
            elapsed: Duration::ZERO,
            play_count: 0,
            voice: None,
        });
        if autoplay {
            if let Err(err) = self.start_sound(id) {
                self.sounds.remove(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    fn play_sound(&mut self, id: SoundId) -> Result<(), EngineError> {
        self.start_sound(id)
    }

    fn is_sound_playing(&self, id: SoundId) -> bool {
        self.sounds.get(id).is_some_and(|s| s.playing)
    }

    fn set_sound_position(&mut self, id: SoundId, position: Vec3) -> Result<(), EngineError> {
        let sound = self.sounds.get_mut(id).ok_or(EngineError::StaleHandle("sound"))?;
        sound.position = position;
        self.journal.record(EngineCall::SetSoundPosition);

        if let Some(voice) = sound.voice {
            let sound = &self.sounds[id];
            let gain = self.gain_for(sound);
            self.audio.set_volume(voice, gain)?;
        }
        Ok(())
    }

    fn dispose_sound(&mut self, id: SoundId) -> Result<(), EngineError> {
        let sound = self.sounds.remove(id).ok_or(EngineError::StaleHandle("sound"))?;
        if let Some(voice) = sound.voice {
            stop_voice(self.audio.as_mut(), voice);
        }
        self.journal.record(EngineCall::DisposeSound);
        Ok(())
    }

    fn set_interval(&mut self, period: Duration) -> IntervalId {
        self.journal.record(EngineCall::SetInterval);
        self.intervals.insert(IntervalTimer::new(period))
    }

    fn clear_interval(&mut self, id: IntervalId) -> bool {
        let removed = self.intervals.remove(id).is_some();
        if removed {
            self.journal.record(EngineCall::ClearInterval);
        }
        removed
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.journal.record(EngineCall::AddListener(kind));
        self.events.add_listener(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.events.remove_listener(id);
        if removed {
            self.journal.record(EngineCall::RemoveListener);
        }
        removed
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface = (width.max(1), height.max(1));
        self.journal.record(EngineCall::Resize);
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, SoundOptions};
    use crate::scene::LightKind;

    /// Silent backend whose looping playback always fails
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

    fn scene() -> SceneDescription {
        SceneDescription::default()
            .with_camera("camera", [0.0, 2.0, 0.0])
            .with_light("default", 1.0)
            .with_mesh("torch", [3.0, 2.0, 0.0])
            .with_mesh("floor_01", [0.0, 0.0, 0.0])
    }

    fn loaded() -> HeadlessEngine {
        let mut engine = HeadlessEngine::with_audio_backend(Box::new(SilentBackend::with_clip_length(
            Duration::from_millis(100),
        )));
        engine.load_scene_description(&scene());
        assert_eq!(engine.poll_events(), vec![EngineEvent::SceneLoaded]);
        engine
    }

    #[test]
    fn test_load_scene_populates_state() {
        let engine = loaded();
        assert!(engine.is_ready());
        assert!(engine.active_camera().is_some());
        assert_eq!(engine.lights().len(), 1);
        assert_eq!(engine.light(engine.lights()[0]).unwrap().kind, LightKind::Hemispheric);
        assert!(engine.mesh_by_name("torch").is_some());
        assert!(engine.mesh_by_name("torch01").is_none());
    }

    #[test]
    fn test_disposed_light_handle_is_stale() {
        let mut engine = loaded();
        let id = engine.lights()[0];
        engine.dispose_light(id).unwrap();
        assert!(matches!(engine.dispose_light(id), Err(EngineError::StaleHandle("light"))));
        assert!(engine.lights().is_empty());
    }

    #[test]
    fn test_interval_fires_until_cleared() {
        let mut engine = loaded();
        let interval = engine.set_interval(Duration::from_millis(50));
        engine.advance(Duration::from_millis(100));
        let ticks = engine
            .poll_events()
            .into_iter()
            .filter(|e| *e == EngineEvent::Interval(interval))
            .count();
        assert_eq!(ticks, 2);

        assert!(engine.clear_interval(interval));
        assert!(!engine.clear_interval(interval));
        engine.advance(Duration::from_millis(100));
        assert!(engine.poll_events().is_empty());
    }

    #[test]
    fn test_before_render_requires_listener() {
        let mut engine = loaded();
        engine.advance(Duration::from_millis(16));
        assert!(engine.poll_events().is_empty());

        engine.add_listener(ListenerKind::BeforeRender);
        engine.advance(Duration::from_millis(16));
        assert_eq!(engine.poll_events(), vec![EngineEvent::BeforeRender]);
    }

    #[test]
    fn test_one_shot_sound_ends_after_clip_length() {
        let mut engine = loaded();
        let id = engine.create_sound(SoundDesc::new("step1", "sounds/step1.wav")).unwrap();
        assert!(!engine.is_sound_playing(id));

        engine.play_sound(id).unwrap();
        assert!(engine.is_sound_playing(id));

        engine.advance(Duration::from_millis(60));
        assert!(engine.poll_events().is_empty());
        engine.advance(Duration::from_millis(60));
        assert_eq!(engine.poll_events(), vec![EngineEvent::SoundEnded(id)]);
        assert!(!engine.is_sound_playing(id));
    }

    #[test]
    fn test_looping_sound_never_ends() {
        let mut engine = loaded();
        let options = SoundOptions { looping: true, autoplay: true, ..SoundOptions::default() };
        let id = engine
            .create_sound(SoundDesc::new("fire", "sounds/fire1.wav").with_options(options))
            .unwrap();
        assert!(engine.is_sound_playing(id));
        engine.advance(Duration::from_millis(1050));
        assert!(engine.poll_events().is_empty());
        assert!(engine.is_sound_playing(id));
    }

    #[test]
    fn test_failed_autoplay_keeps_no_sound() {
        let mut engine = HeadlessEngine::with_audio_backend(Box::new(NoLoopBackend(SilentBackend::new())));
        engine.load_scene_description(&scene());

        let options = SoundOptions { looping: true, autoplay: true, ..SoundOptions::default() };
        let result = engine.create_sound(SoundDesc::new("fire", "sounds/fire1.wav").with_options(options));
        assert!(matches!(result, Err(EngineError::Audio(AudioError::PlaybackFailed(_)))));
        assert_eq!(engine.sound_count(), 0);
        assert!(engine.sound_by_name("fire").is_none());

        let step = engine.create_sound(SoundDesc::new("step1", "sounds/step1.wav")).unwrap();
        engine.play_sound(step).unwrap();
        assert_eq!(engine.sound_by_name("step1"), Some(step));
    }

    #[test]
    fn test_spatial_gain_uses_camera_distance() {
        let mut engine = loaded();
        let options = SoundOptions { spatial: true, max_distance: 20.0, volume: 0.2, ..SoundOptions::default() };
        let id = engine
            .create_sound(SoundDesc::new("fire", "sounds/fire1.wav").with_options(options))
            .unwrap();
        engine.set_sound_position(id, Vec3::new(0.0, 2.0, 0.5)).unwrap();
        assert!((engine.sound_gain(id).unwrap() - 0.2).abs() < 1e-6);

        engine.set_sound_position(id, Vec3::new(0.0, 2.0, 40.0)).unwrap();
        assert_eq!(engine.sound_gain(id).unwrap(), 0.0);
    }

    #[test]
    fn test_particle_system_requires_live_emitter() {
        let mut engine = loaded();
        let torch = engine.mesh_by_name("torch").unwrap();
        let desc = ParticleSystemDesc::new("particles", 2000, "particles/flame.png", torch).with_emit_rate(75.0);
        let id = engine.create_particle_system(desc.clone()).unwrap();
        engine.start_particle_system(id).unwrap();
        engine.advance(Duration::from_secs(2));
        assert!((engine.particle_system(id).unwrap().emitted - 150.0).abs() < 1e-6);

        engine.load_scene_description(&scene());
        assert!(matches!(
            engine.create_particle_system(desc),
            Err(EngineError::StaleHandle("mesh"))
        ));
    }

    #[test]
    fn test_shadow_generator_rejects_odd_resolution() {
        let mut engine = loaded();
        let light = engine.add_light(Light::directional("dl", Vec3::new(0.0, -1.0, 0.0), 0.5));
        assert!(engine.create_shadow_generator(light, ShadowMapSettings::new(500)).is_err());

        let generator = engine.create_shadow_generator(light, ShadowMapSettings::new(512)).unwrap();
        let floor = engine.mesh_by_name("floor_01").unwrap();
        engine.add_shadow_caster(generator, floor).unwrap();
        assert_eq!(engine.shadow_generator(generator).unwrap().render_list, vec![floor]);
    }

    #[test]
    fn test_reload_keeps_listeners_and_intervals() {
        let mut engine = loaded();
        let light = engine.lights()[0];
        engine.add_listener(ListenerKind::Resize);
        let interval = engine.set_interval(Duration::from_millis(50));

        engine.load_scene_description(&scene());
        assert!(matches!(engine.light(light), Err(EngineError::StaleHandle("light"))));
        assert_eq!(engine.listener_count(), 1);
        assert_eq!(engine.active_intervals(), 1);
        assert!(engine.clear_interval(interval));
    }

    #[test]
    fn test_key_events_are_gated() {
        let mut engine = loaded();
        assert!(!engine.press_key(KeyCode::UP));
        let listener = engine.add_listener(ListenerKind::KeyDown);
        assert!(engine.press_key(KeyCode::UP));
        assert!(engine.remove_listener(listener));
        assert!(!engine.press_key(KeyCode::UP));
        assert_eq!(engine.poll_events(), vec![EngineEvent::KeyDown(KeyCode::UP)]);
    }
}
