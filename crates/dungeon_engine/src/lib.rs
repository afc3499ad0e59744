//! # Dungeon Engine
//!
//! A small scene engine exposing the capabilities a scene script needs:
//! lights, meshes, particle systems, shadow maps, camera physics, spatial
//! sounds, repeating intervals and input/frame events.
//!
//! ## Features
//!
//! - **Capability trait**: [`SceneEngine`] is the only surface scene code touches
//! - **Generational handles**: objects are owned by the engine, stale handles are errors
//! - **Pull-based events**: the host advances time and drains [`EngineEvent`]s
//! - **Headless engine**: [`HeadlessEngine`] simulates everything in memory
//! - **Pluggable audio**: silent by default, rodio behind the `rodio-audio` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use dungeon_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = HeadlessEngine::new().with_asset_root("assets");
//!     engine.load_scene(Path::new("dungeon.ron"))?;
//!
//!     loop {
//!         engine.advance(Duration::from_millis(16));
//!         for event in engine.poll_events() {
//!             // React to events
//!         }
//!     }
//! }
//! ```

pub mod audio;
pub mod config;
pub mod engine;
pub mod events;
pub mod foundation;
pub mod headless;
pub mod physics;
pub mod scene;

pub use engine::{EngineError, SceneEngine};
pub use headless::HeadlessEngine;

/// Common imports for scene code
pub mod prelude {
    pub use crate::audio::{SoundDesc, SoundOptions};
    pub use crate::config::{Config, ConfigError};
    pub use crate::engine::{EngineError, SceneEngine};
    pub use crate::events::{EngineEvent, KeyCode, ListenerKind};
    pub use crate::foundation::math::{color_from_ints, vec3, Bounds, Color3, Vec3};
    pub use crate::headless::HeadlessEngine;
    pub use crate::physics::{CameraCollision, PhysicsSettings};
    pub use crate::scene::*;
}
