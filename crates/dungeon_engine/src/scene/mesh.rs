//! Mesh and camera records exposed by the engine

use crate::foundation::math::Vec3;
use crate::physics::CameraCollision;

/// Read-only view of a scene mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Mesh name, not necessarily unique in general scenes
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Whether the mesh is drawn
    pub visible: bool,
    /// Whether the mesh receives shadows
    pub receive_shadows: bool,
}

impl Mesh {
    /// Create a visible mesh at `position`
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            visible: true,
            receive_shadows: false,
        }
    }
}

/// Read-only view of a scene camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera name
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Whether user input drives this camera
    pub control_attached: bool,
    /// Collision settings
    pub collision: CameraCollision,
}
