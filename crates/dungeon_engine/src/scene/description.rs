//! Scene description files
//!
//! A scene file lists the camera, the lights the level ships with and the
//! meshes (by name and position). It stands in for the packaged scene an
//! engine would load from disk.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::EngineError;

/// Camera entry of a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    /// Camera name
    pub name: String,
    /// World position
    pub position: [f32; 3],
}

/// Light entry of a scene file (always loaded as a hemispheric default light)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    /// Light name
    pub name: String,
    /// Light intensity
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

fn default_intensity() -> f32 {
    1.0
}

/// Mesh entry of a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDescription {
    /// Mesh name
    pub name: String,
    /// World position
    #[serde(default)]
    pub position: [f32; 3],
}

/// Complete scene file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Active camera
    #[serde(default)]
    pub camera: Option<CameraDescription>,
    /// Lights present before any setup runs
    #[serde(default)]
    pub lights: Vec<LightDescription>,
    /// Scene meshes
    #[serde(default)]
    pub meshes: Vec<MeshDescription>,
}

impl SceneDescription {
    /// Parse a scene from RON text
    pub fn from_ron(text: &str) -> Result<Self, EngineError> {
        ron::from_str(text).map_err(|e| EngineError::SceneLoad(e.to_string()))
    }

    /// Read and parse a scene file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::SceneLoad(format!("{}: {e}", path.display())))?;
        Self::from_ron(&text)
    }

    /// Add a mesh (builder style, mostly for tests)
    pub fn with_mesh(mut self, name: impl Into<String>, position: [f32; 3]) -> Self {
        self.meshes.push(MeshDescription { name: name.into(), position });
        self
    }

    /// Add a default light
    pub fn with_light(mut self, name: impl Into<String>, intensity: f32) -> Self {
        self.lights.push(LightDescription { name: name.into(), intensity });
        self
    }

    /// Set the camera
    pub fn with_camera(mut self, name: impl Into<String>, position: [f32; 3]) -> Self {
        self.camera = Some(CameraDescription { name: name.into(), position });
        self
    }
}
