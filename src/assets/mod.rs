//! Asynchronous asset loading for imported models.

pub mod cache;
pub mod manager;

pub use cache::AssetCache;
pub use manager::{spawn_load, AssetLoader, LoadState, ModelManifestLoader, SharedLoadState};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A composite model described by a JSON manifest: a mesh reference plus
/// the full extents of its collision box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub name: String,
    pub mesh: String,
    pub dimensions: [f32; 3],
}

impl ModelAsset {
    pub fn size(&self) -> Vec3 {
        Vec3::from_array(self.dimensions)
    }
}
