//! Dungeon setup errors

use dungeon_engine::EngineError;
use thiserror::Error;

/// Errors raised while setting up or driving the dungeon scene
#[derive(Error, Debug)]
pub enum DungeonError {
    /// A named mesh the scene depends on is missing
    #[error("mesh '{0}' not found in scene")]
    MeshNotFound(String),

    /// The scene has no active camera to bind
    #[error("scene has no active camera")]
    NoActiveCamera,

    /// An engine capability call failed
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Result alias for dungeon operations
pub type DungeonResult<T> = Result<T, DungeonError>;
