//! Scene object descriptions and handles
//!
//! These are the value types passed across the [`crate::SceneEngine`]
//! boundary. The engine owns the objects; callers only hold handles.

pub mod handles;
pub mod light;
pub mod mesh;
pub mod particles;
pub mod shadows;
pub mod description;

pub use handles::{
    CameraId, IntervalId, LightId, ListenerId, MeshId, ParticleSystemId, ShadowGeneratorId, SoundId,
};
pub use light::{Light, LightKind};
pub use mesh::{Camera, Mesh};
pub use particles::{BlendMode, ParticleSystemDesc};
pub use shadows::{ShadowFilter, ShadowMapSettings};
pub use description::SceneDescription;
