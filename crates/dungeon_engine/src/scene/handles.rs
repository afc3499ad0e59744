//! Generational handles issued by the engine
//!
//! Every engine-owned object is addressed through a `slotmap` key. A handle
//! whose object was disposed stays distinguishable from a live one, so stale
//! use surfaces as [`crate::EngineError::StaleHandle`] instead of touching a
//! recycled slot.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a camera
    pub struct CameraId;
    /// Handle to a light
    pub struct LightId;
    /// Handle to a mesh
    pub struct MeshId;
    /// Handle to a particle system
    pub struct ParticleSystemId;
    /// Handle to a shadow-map generator
    pub struct ShadowGeneratorId;
    /// Handle to a sound
    pub struct SoundId;
    /// Handle to a repeating interval
    pub struct IntervalId;
    /// Handle to a registered event listener
    pub struct ListenerId;
}
