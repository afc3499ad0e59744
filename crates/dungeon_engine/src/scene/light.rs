//! Light descriptions

use crate::foundation::math::{Color3, Vec3};

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Sky/ground ambient light lit from `direction`
    Hemispheric,
    /// Point light (like a torch)
    Point,
    /// Directional light (like sunlight)
    Directional,
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light name
    pub name: String,
    /// Light type
    pub kind: LightKind,
    /// Light position (point lights)
    pub position: Vec3,
    /// Light direction (hemispheric/directional lights)
    pub direction: Vec3,
    /// Diffuse color
    pub diffuse: Color3,
    /// Light intensity
    pub intensity: f32,
    /// Light range (point lights)
    pub range: f32,
}

impl Light {
    /// Create a hemispheric ambient light
    pub fn hemispheric(name: impl Into<String>, direction: Vec3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Hemispheric,
            position: Vec3::zeros(),
            direction: direction.normalize(),
            diffuse: Color3::new(1.0, 1.0, 1.0),
            intensity,
            range: f32::MAX,
        }
    }

    /// Create a point light
    pub fn point(name: impl Into<String>, position: Vec3, diffuse: Color3, intensity: f32, range: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Point,
            position,
            direction: Vec3::zeros(),
            diffuse,
            intensity,
            range,
        }
    }

    /// Create a directional light
    pub fn directional(name: impl Into<String>, direction: Vec3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Directional,
            position: Vec3::zeros(),
            direction: direction.normalize(),
            diffuse: Color3::new(1.0, 1.0, 1.0),
            intensity,
            range: f32::MAX,
        }
    }
}
