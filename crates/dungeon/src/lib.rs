//! # Dungeon
//!
//! A torch-lit dungeon scene set up on top of [`dungeon_engine`]: flickering
//! torch lights, fire particles, blurred shadows, a gravity-bound camera,
//! footsteps that follow the movement keys and crackling fire ambience.
//!
//! The host loads the scene through [`Dungeon::open`] and then feeds every
//! engine event to [`Dungeon::handle_event`]:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use dungeon::{Dungeon, DungeonConfig};
//! use dungeon_engine::{HeadlessEngine, SceneEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DungeonConfig::default();
//!     let mut engine = HeadlessEngine::new().with_asset_root(&config.assets.root);
//!     let mut dungeon = Dungeon::new(config);
//!     dungeon.open(&mut engine)?;
//!
//!     loop {
//!         engine.advance(Duration::from_millis(16));
//!         for event in engine.poll_events() {
//!             dungeon.handle_event(&mut engine, &event)?;
//!         }
//!     }
//! }
//! ```

pub mod assets;
pub mod classify;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod flicker;
pub mod footsteps;
pub mod random;

pub use classify::{MeshRoles, RoleMarkers};
pub use config::DungeonConfig;
pub use dungeon::{Dungeon, InitStep};
pub use error::{DungeonError, DungeonResult};
pub use footsteps::Footstep;
pub use random::{RandomSource, ScriptedRandom, ThreadRandom};
