//! Asset files the dungeon depends on

use std::path::{Path, PathBuf};

use crate::config::DungeonConfig;

/// Category of a dungeon asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Scene description
    Scene,
    /// Particle texture
    Texture,
    /// Audio clip
    Sound,
}

/// An asset path resolved against the asset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// What the file is used for
    pub kind: AssetKind,
    /// Full path
    pub path: PathBuf,
}

/// Every asset the configured dungeon loads, resolved against `config.assets.root`
pub fn manifest(config: &DungeonConfig) -> Vec<AssetRef> {
    let root = &config.assets.root;
    let resolve = |kind, relative: &Path| AssetRef { kind, path: root.join(relative) };

    let mut assets = vec![
        resolve(AssetKind::Scene, &config.assets.scene),
        resolve(AssetKind::Texture, &config.particles.texture),
    ];
    assets.extend(config.audio.footsteps.iter().map(|p| resolve(AssetKind::Sound, p)));
    assets.extend(config.audio.fire.iter().map(|p| resolve(AssetKind::Sound, p)));
    assets
}

/// Assets from [`manifest`] that do not exist on disk
pub fn missing(config: &DungeonConfig) -> Vec<AssetRef> {
    manifest(config).into_iter().filter(|asset| !asset.path.exists()).collect()
}
