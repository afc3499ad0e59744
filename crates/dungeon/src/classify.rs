//! Mesh roles derived from naming conventions
//!
//! Level designers tag meshes through their names: a `floor` receives
//! shadows, a `shadow` mesh casts them and a `collider` is an invisible
//! collision proxy. Markers are matched as substrings and a mesh may carry
//! several roles at once.

use bitflags::bitflags;

bitflags! {
    /// Roles a mesh plays in the dungeon setup (empty = decoration only)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MeshRoles: u8 {
        /// Receives shadows
        const RECEIVER = 1 << 0;
        /// Rendered into the shadow map
        const CASTER = 1 << 1;
        /// Hidden collision geometry
        const COLLIDER = 1 << 2;
    }
}

/// Name markers for each role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMarkers {
    /// Marker for shadow receivers
    pub receiver: String,
    /// Marker for shadow casters
    pub caster: String,
    /// Marker for collider meshes
    pub collider: String,
}

impl RoleMarkers {
    /// Build markers from explicit strings
    pub fn new(receiver: impl Into<String>, caster: impl Into<String>, collider: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            caster: caster.into(),
            collider: collider.into(),
        }
    }

    /// Roles of a mesh called `name`
    pub fn classify(&self, name: &str) -> MeshRoles {
        let mut roles = MeshRoles::empty();
        roles.set(MeshRoles::RECEIVER, name.contains(self.receiver.as_str()));
        roles.set(MeshRoles::CASTER, name.contains(self.caster.as_str()));
        roles.set(MeshRoles::COLLIDER, name.contains(self.collider.as_str()));
        roles
    }
}

impl Default for RoleMarkers {
    fn default() -> Self {
        Self::new("floor", "shadow", "collider")
    }
}
