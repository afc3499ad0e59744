//! Physics settings
//!
//! Collision response itself belongs to the engine; this module only holds
//! the switches and shapes a scene hands to it.

use crate::foundation::math::Vec3;

/// Standard gravity pointing down the Y axis
pub const EARTH_GRAVITY: f32 = -9.81;

/// Scene-wide physics switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    /// Gravity acceleration applied to gravity-affected objects
    pub gravity: Vec3,
    /// Whether collision checking runs at all
    pub collisions_enabled: bool,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::zeros(),
            collisions_enabled: false,
        }
    }
}

/// Camera collision settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCollision {
    /// Whether gravity pulls the camera
    pub apply_gravity: bool,
    /// Whether the camera collides with collision-enabled meshes
    pub check_collisions: bool,
    /// Half-extents of the bounding ellipsoid
    pub ellipsoid: Vec3,
}

impl CameraCollision {
    /// Gravity-affected, collision-checked camera with the given ellipsoid
    pub fn grounded(ellipsoid: Vec3) -> Self {
        Self {
            apply_gravity: true,
            check_collisions: true,
            ellipsoid,
        }
    }

    /// Check whether a point offset from the camera center lies inside the ellipsoid
    pub fn ellipsoid_contains(&self, offset: Vec3) -> bool {
        let e = self.ellipsoid;
        if e.x <= 0.0 || e.y <= 0.0 || e.z <= 0.0 {
            return false;
        }
        let n = Vec3::new(offset.x / e.x, offset.y / e.y, offset.z / e.z);
        n.norm_squared() <= 1.0
    }
}

impl Default for CameraCollision {
    fn default() -> Self {
        Self {
            apply_gravity: false,
            check_collisions: false,
            ellipsoid: Vec3::new(0.5, 1.0, 0.5),
        }
    }
}
