//! Scene initializer for the torch-lit dungeon
//!
//! [`Dungeon`] reacts to engine events. When the scene finishes loading it
//! runs the setup steps in [`InitStep::ORDER`]; afterwards it drives the
//! torch flicker from its interval and the footsteps from the frame tick and
//! movement keys. Every engine object it creates is tracked so it can be
//! released again on [`Dungeon::dispose`], on a failed setup, or before the
//! next setup after a reload.

use dungeon_engine::audio::{SoundDesc, SoundOptions};
use dungeon_engine::events::{EngineEvent, KeyCode, ListenerKind};
use dungeon_engine::foundation::math::{color_from_ints, vec3, Vec3};
use dungeon_engine::physics::CameraCollision;
use dungeon_engine::scene::{
    BlendMode, CameraId, IntervalId, Light, LightId, ListenerId, MeshId, ParticleSystemDesc,
    ParticleSystemId, ShadowFilter, ShadowGeneratorId, ShadowMapSettings, SoundId,
};
use dungeon_engine::{EngineError, SceneEngine};

use crate::classify::{MeshRoles, RoleMarkers};
use crate::config::DungeonConfig;
use crate::error::{DungeonError, DungeonResult};
use crate::flicker::FlickerState;
use crate::footsteps::{Footstep, FootstepCycle, MovementState};
use crate::random::{RandomSource, ThreadRandom};

/// One step of scene setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitStep {
    /// Bind input to the active camera
    Camera,
    /// Replace default lights with ambient and flickering torch lights
    Lights,
    /// Fire particles on the torches
    Particles,
    /// Shadow receivers, casters and the shadow map
    Shadows,
    /// Gravity, camera collision and hidden colliders
    Collisions,
    /// Footsteps and fire ambience
    Audio,
}

impl InitStep {
    /// Setup order; later steps rely on state from earlier ones
    pub const ORDER: [Self; 6] = [
        Self::Camera,
        Self::Lights,
        Self::Particles,
        Self::Shadows,
        Self::Collisions,
        Self::Audio,
    ];
}

/// Engine objects and per-scene state created by one setup run
#[derive(Debug)]
struct SceneResources {
    camera: Option<CameraId>,
    roles: Vec<(MeshId, MeshRoles)>,
    torches: Vec<(MeshId, Vec3)>,
    lights: Vec<LightId>,
    torch_lights: Vec<LightId>,
    flicker: Option<(IntervalId, FlickerState)>,
    particle_systems: Vec<ParticleSystemId>,
    shadow_generator: Option<ShadowGeneratorId>,
    footsteps: Vec<SoundId>,
    fires: Vec<SoundId>,
    listeners: Vec<ListenerId>,
    movement: MovementState,
    cycle: FootstepCycle,
}

impl SceneResources {
    fn new(movement: MovementState) -> Self {
        Self {
            camera: None,
            roles: Vec::new(),
            torches: Vec::new(),
            lights: Vec::new(),
            torch_lights: Vec::new(),
            flicker: None,
            particle_systems: Vec::new(),
            shadow_generator: None,
            footsteps: Vec::new(),
            fires: Vec::new(),
            listeners: Vec::new(),
            movement,
            cycle: FootstepCycle::default(),
        }
    }

    fn with_role(&self, role: MeshRoles) -> impl Iterator<Item = MeshId> + '_ {
        self.roles
            .iter()
            .filter(move |(_, roles)| roles.contains(role))
            .map(|(id, _)| *id)
    }

    /// Release everything this setup run created
    fn release(self, engine: &mut dyn SceneEngine) {
        if let Some((interval, _)) = self.flicker {
            engine.clear_interval(interval);
        }
        for listener in self.listeners {
            engine.remove_listener(listener);
        }
        for sound in self.fires.into_iter().chain(self.footsteps) {
            released("sound", engine.dispose_sound(sound));
        }
        if let Some(generator) = self.shadow_generator {
            released("shadow generator", engine.dispose_shadow_generator(generator));
        }
        for system in self.particle_systems {
            released("particle system", engine.dispose_particle_system(system));
        }
        for light in self.lights {
            released("light", engine.dispose_light(light));
        }
        if let Some(camera) = self.camera {
            released("camera control", engine.detach_camera_control(camera));
        }
    }
}

/// Log a failed release; stale handles mean the engine already dropped the object
fn released(what: &str, result: Result<(), EngineError>) {
    match result {
        Ok(()) => {}
        Err(EngineError::StaleHandle(_)) => log::debug!("{what} already released by the engine"),
        Err(err) => log::warn!("Failed to release {what}: {err}"),
    }
}

/// Dungeon scene initializer and event handler
pub struct Dungeon {
    config: DungeonConfig,
    markers: RoleMarkers,
    rng: Box<dyn RandomSource>,
    resize_listener: Option<ListenerId>,
    scene: Option<SceneResources>,
    last_init_steps: Vec<InitStep>,
    init_count: u32,
}

impl Dungeon {
    /// Create an initializer using OS-seeded randomness
    pub fn new(config: DungeonConfig) -> Self {
        let markers = RoleMarkers::new(
            config.shadows.receiver_marker.clone(),
            config.shadows.caster_marker.clone(),
            config.collisions.collider_marker.clone(),
        );
        Self {
            config,
            markers,
            rng: Box::new(ThreadRandom::new()),
            resize_listener: None,
            scene: None,
            last_init_steps: Vec::new(),
            init_count: 0,
        }
    }

    /// Replace the random source (flicker and footstep rolls)
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Hook window resizes and start loading the configured scene
    ///
    /// Setup runs later, when [`EngineEvent::SceneLoaded`] is handed to
    /// [`Dungeon::handle_event`].
    pub fn open(&mut self, engine: &mut dyn SceneEngine) -> DungeonResult<()> {
        if self.resize_listener.is_none() {
            self.resize_listener = Some(engine.add_listener(ListenerKind::Resize));
        }
        log::info!("Loading scene {}", self.config.assets.scene.display());
        engine.load_scene(&self.config.assets.scene)?;
        Ok(())
    }

    /// React to one engine event
    pub fn handle_event(&mut self, engine: &mut dyn SceneEngine, event: &EngineEvent) -> DungeonResult<()> {
        match *event {
            EngineEvent::SceneLoaded => self.initialize(engine),
            EngineEvent::Resized { width, height } => {
                log::debug!("Resizing render surface to {width}x{height}");
                engine.resize(width, height);
                Ok(())
            }
            EngineEvent::Interval(interval) => self.flicker(engine, interval),
            EngineEvent::BeforeRender => self.step_if_walking(engine),
            EngineEvent::KeyDown(code) => {
                self.on_key(code, true);
                Ok(())
            }
            EngineEvent::KeyUp(code) => {
                self.on_key(code, false);
                Ok(())
            }
            EngineEvent::SoundEnded(sound) => {
                self.on_sound_ended(sound);
                Ok(())
            }
        }
    }

    /// Run every setup step in order
    ///
    /// A previous setup is torn down first. If a step fails, whatever the
    /// earlier steps created is released before the error is returned.
    pub fn initialize(&mut self, engine: &mut dyn SceneEngine) -> DungeonResult<()> {
        if let Some(previous) = self.scene.take() {
            log::info!("Scene reloaded, tearing down previous setup");
            previous.release(engine);
        }
        self.last_init_steps.clear();

        let mut resources = SceneResources::new(MovementState::new(self.config.audio.movement_keys()));
        resources.roles = engine
            .meshes()
            .into_iter()
            .filter_map(|id| engine.mesh(id).ok().map(|mesh| (id, self.markers.classify(&mesh.name))))
            .collect();

        for step in InitStep::ORDER {
            log::debug!("Dungeon setup step: {step:?}");
            if let Err(err) = self.run_step(step, engine, &mut resources) {
                log::warn!("Dungeon setup failed at {step:?}: {err}");
                resources.release(engine);
                return Err(err);
            }
            self.last_init_steps.push(step);
        }

        self.init_count += 1;
        log::info!(
            "Dungeon ready: {} light(s), {} particle system(s), {} sound(s)",
            resources.lights.len(),
            resources.particle_systems.len(),
            resources.footsteps.len() + resources.fires.len()
        );
        self.scene = Some(resources);
        Ok(())
    }

    /// Release every engine object this initializer created
    pub fn dispose(&mut self, engine: &mut dyn SceneEngine) {
        if let Some(resources) = self.scene.take() {
            resources.release(engine);
        }
        if let Some(listener) = self.resize_listener.take() {
            engine.remove_listener(listener);
        }
        log::info!("Dungeon disposed");
    }

    fn run_step(
        &mut self,
        step: InitStep,
        engine: &mut dyn SceneEngine,
        res: &mut SceneResources,
    ) -> DungeonResult<()> {
        match step {
            InitStep::Camera => self.init_camera(engine, res),
            InitStep::Lights => self.init_lights(engine, res),
            InitStep::Particles => self.init_particles(engine, res),
            InitStep::Shadows => self.init_shadows(engine, res),
            InitStep::Collisions => self.init_collisions(engine, res),
            InitStep::Audio => self.init_audio(engine, res),
        }
    }

    fn init_camera(&mut self, engine: &mut dyn SceneEngine, res: &mut SceneResources) -> DungeonResult<()> {
        let camera = engine.active_camera().ok_or(DungeonError::NoActiveCamera)?;
        engine.attach_camera_control(camera)?;
        res.camera = Some(camera);
        Ok(())
    }

    fn init_lights(&mut self, engine: &mut dyn SceneEngine, res: &mut SceneResources) -> DungeonResult<()> {
        let cfg = &self.config.lights;

        for light in engine.lights() {
            engine.dispose_light(light)?;
        }

        let ambient = engine.add_light(Light::hemispheric("hemi", Vec3::y(), cfg.ambient_intensity));
        res.lights.push(ambient);

        for name in &cfg.torch_meshes {
            let mesh = engine
                .mesh_by_name(name)
                .ok_or_else(|| DungeonError::MeshNotFound(name.clone()))?;
            res.torches.push((mesh, engine.mesh(mesh)?.position));
        }

        let [r, g, b] = cfg.torch_color;
        for (i, (_, position)) in res.torches.iter().enumerate() {
            let light = engine.add_light(Light::point(
                format!("pl{}", i + 1),
                *position,
                color_from_ints(r, g, b),
                cfg.torch_intensity,
                cfg.torch_range,
            ));
            res.lights.push(light);
            res.torch_lights.push(light);
        }

        let flicker = FlickerState::new(cfg.flicker_max_delta, self.rng.as_mut());
        let interval = engine.set_interval(cfg.flicker_interval());
        res.flicker = Some((interval, flicker));
        Ok(())
    }

    fn init_particles(&mut self, engine: &mut dyn SceneEngine, res: &mut SceneResources) -> DungeonResult<()> {
        let cfg = &self.config.particles;
        let Some(&(first_torch, _)) = res.torches.first() else {
            return Ok(());
        };

        let fire = ParticleSystemDesc::new("particles", cfg.capacity, cfg.texture.clone(), first_torch)
            .with_blend_mode(BlendMode::Standard)
            .with_size(cfg.size.0, cfg.size.1)
            .with_lifetime(cfg.lifetime.0, cfg.lifetime.1)
            .with_emit_box(vec3(cfg.emit_box_min), vec3(cfg.emit_box_max))
            .with_emit_rate(cfg.emit_rate);

        for (i, (torch, _)) in res.torches.iter().enumerate() {
            let desc = if i == 0 {
                fire.clone()
            } else {
                fire.clone_for(format!("particles{i:02}"), *torch)
            };
            let system = engine.create_particle_system(desc)?;
            res.particle_systems.push(system);
            engine.start_particle_system(system)?;
        }
        Ok(())
    }

    fn init_shadows(&mut self, engine: &mut dyn SceneEngine, res: &mut SceneResources) -> DungeonResult<()> {
        let cfg = &self.config.shadows;

        for mesh in res.with_role(MeshRoles::RECEIVER) {
            engine.set_receive_shadows(mesh, true)?;
        }

        let light = engine.add_light(Light::directional("light", vec3(cfg.light_direction), cfg.light_intensity));
        res.lights.push(light);

        let settings = ShadowMapSettings::new(cfg.resolution).with_filter(ShadowFilter::BlurVariance);
        let generator = engine.create_shadow_generator(light, settings)?;
        res.shadow_generator = Some(generator);

        for mesh in res.with_role(MeshRoles::CASTER) {
            engine.add_shadow_caster(generator, mesh)?;
        }
        Ok(())
    }

    fn init_collisions(&mut self, engine: &mut dyn SceneEngine, res: &mut SceneResources) -> DungeonResult<()> {
        let cfg = &self.config.collisions;
        engine.set_gravity(vec3(cfg.gravity));
        engine.set_collisions_enabled(true);

        let camera = res.camera.ok_or(DungeonError::NoActiveCamera)?;
        engine.set_camera_collision(camera, CameraCollision::grounded(vec3(cfg.camera_ellipsoid)))?;

        for mesh in res.with_role(MeshRoles::COLLIDER) {
            engine.set_mesh_visible(mesh, false)?;
        }
        Ok(())
    }

    fn init_audio(&mut self, engine: &mut dyn SceneEngine, res: &mut SceneResources) -> DungeonResult<()> {
        let cfg = &self.config.audio;

        for (i, path) in cfg.footsteps.iter().enumerate() {
            let sound = engine.create_sound(SoundDesc::new(format!("step{}", i + 1), path.clone()))?;
            res.footsteps.push(sound);
        }

        res.listeners.push(engine.add_listener(ListenerKind::BeforeRender));
        res.listeners.push(engine.add_listener(ListenerKind::KeyDown));
        res.listeners.push(engine.add_listener(ListenerKind::KeyUp));

        let fire = SoundOptions {
            looping: true,
            autoplay: true,
            spatial: true,
            max_distance: cfg.fire_max_distance,
            volume: cfg.fire_volume,
        };
        for (i, (path, (_, position))) in cfg.fire.iter().zip(&res.torches).enumerate() {
            let name = if i == 0 { "fire".to_string() } else { format!("fire{}", i + 1) };
            let sound = engine.create_sound(SoundDesc::new(name, path.clone()).with_options(fire))?;
            res.fires.push(sound);
            engine.set_sound_position(sound, *position)?;
        }
        Ok(())
    }

    fn flicker(&mut self, engine: &mut dyn SceneEngine, interval: IntervalId) -> DungeonResult<()> {
        let Some(res) = self.scene.as_mut() else {
            return Ok(());
        };
        let Some((active, flicker)) = res.flicker.as_mut() else {
            return Ok(());
        };
        if *active != interval {
            return Ok(());
        }

        let delta = flicker.step(self.rng.as_mut());
        for &light in &res.torch_lights {
            let intensity = engine.light(light)?.intensity;
            engine.set_light_intensity(light, intensity + delta)?;
        }
        Ok(())
    }

    fn step_if_walking(&mut self, engine: &mut dyn SceneEngine) -> DungeonResult<()> {
        let Some(res) = self.scene.as_ref() else {
            return Ok(());
        };
        if !res.movement.is_walking() || res.footsteps.iter().any(|&s| engine.is_sound_playing(s)) {
            return Ok(());
        }

        let roll = self.rng.next_unit();
        let step = res.cycle.select(roll, self.config.audio.step3_probability);
        if let Some(&sound) = res.footsteps.get(step.index()) {
            log::trace!("Footstep {step:?} (roll {roll:.3})");
            engine.play_sound(sound)?;
        }
        Ok(())
    }

    fn on_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(res) = self.scene.as_mut() {
            if pressed {
                res.movement.key_down(code);
            } else {
                res.movement.key_up(code);
            }
        }
    }

    fn on_sound_ended(&mut self, sound: SoundId) {
        if let Some(res) = self.scene.as_mut() {
            if let Some(index) = res.footsteps.iter().position(|&s| s == sound) {
                res.cycle.on_finished(Footstep::ALL[index]);
            }
        }
    }

    /// Whether setup has completed and not been disposed
    pub fn is_initialized(&self) -> bool {
        self.scene.is_some()
    }

    /// Steps completed by the latest setup run
    pub fn last_init_steps(&self) -> &[InitStep] {
        &self.last_init_steps
    }

    /// Number of successful setup runs
    pub fn init_count(&self) -> u32 {
        self.init_count
    }

    /// Whether a movement key is held
    pub fn is_walking(&self) -> bool {
        self.scene.as_ref().is_some_and(|res| res.movement.is_walking())
    }

    /// Whether the second regular footstep is due next
    pub fn second_step_due(&self) -> bool {
        self.scene.as_ref().is_some_and(|res| res.cycle.second_due())
    }

    /// Sound playing a footstep clip
    pub fn footstep_sound(&self, step: Footstep) -> Option<SoundId> {
        self.scene.as_ref()?.footsteps.get(step.index()).copied()
    }

    /// Looping fire sounds, one per torch
    pub fn fire_sounds(&self) -> &[SoundId] {
        self.scene.as_ref().map(|res| res.fires.as_slice()).unwrap_or_default()
    }

    /// Flickering torch lights
    pub fn torch_lights(&self) -> &[LightId] {
        self.scene.as_ref().map(|res| res.torch_lights.as_slice()).unwrap_or_default()
    }

    /// Torch fire particle systems
    pub fn particle_systems(&self) -> &[ParticleSystemId] {
        self.scene.as_ref().map(|res| res.particle_systems.as_slice()).unwrap_or_default()
    }

    /// Shadow-map generator
    pub fn shadow_generator(&self) -> Option<ShadowGeneratorId> {
        self.scene.as_ref()?.shadow_generator
    }

    /// Interval driving the torch flicker
    pub fn flicker_interval(&self) -> Option<IntervalId> {
        self.scene.as_ref()?.flicker.map(|(interval, _)| interval)
    }

    /// Listeners registered by setup (excluding the resize hook)
    pub fn scene_listeners(&self) -> &[ListenerId] {
        self.scene.as_ref().map(|res| res.listeners.as_slice()).unwrap_or_default()
    }

    /// Roles resolved for each mesh by the latest setup
    pub fn mesh_roles(&self, mesh: MeshId) -> Option<MeshRoles> {
        self.scene
            .as_ref()?
            .roles
            .iter()
            .find(|(id, _)| *id == mesh)
            .map(|(_, roles)| *roles)
    }

    /// Active configuration
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }
}
