//! Loader trait, load-state tracking and the manifest loader.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use super::cache::AssetCache;
use super::ModelAsset;

/// Asset loader abstraction
#[async_trait]
pub trait AssetLoader<A> {
    async fn load(&self, path: &Path) -> Result<A>;
}

/// Where a background load currently stands. One pollable value instead of
/// separate success and error callbacks.
#[derive(Debug, Clone)]
pub enum LoadState<A> {
    Pending,
    Ready(A),
    Failed(String),
}

impl<A> LoadState<A> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }
}

/// Shared slot a background load reports into.
pub type SharedLoadState<A> = Arc<Mutex<LoadState<A>>>;

/// Reads JSON model manifests from disk, remembering results per path.
pub struct ModelManifestLoader {
    cache: Mutex<AssetCache<PathBuf, ModelAsset>>,
}

impl ModelManifestLoader {
    pub fn new() -> Self {
        ModelManifestLoader {
            cache: Mutex::new(AssetCache::new()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, AssetCache<PathBuf, ModelAsset>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ModelManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetLoader<ModelAsset> for ModelManifestLoader {
    async fn load(&self, path: &Path) -> Result<ModelAsset> {
        if let Some(model) = self.cache().get(&path.to_path_buf()) {
            return Ok(model.clone());
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading model manifest {}", path.display()))?;
        let model: ModelAsset = serde_json::from_str(&raw)
            .with_context(|| format!("parsing model manifest {}", path.display()))?;
        self.cache().insert(path.to_path_buf(), model.clone());
        Ok(model)
    }
}

/// Kick off a background load. The returned slot starts `Pending` and
/// flips to `Ready` or `Failed` when the task finishes; failures are also
/// logged here so callers can treat the slot as fire-and-forget.
pub fn spawn_load<A, L>(loader: L, path: PathBuf) -> SharedLoadState<A>
where
    A: Send + 'static,
    L: AssetLoader<A> + Send + Sync + 'static,
{
    let state: SharedLoadState<A> = Arc::new(Mutex::new(LoadState::Pending));
    let slot = state.clone();
    tokio::spawn(async move {
        let outcome = match loader.load(&path).await {
            Ok(asset) => LoadState::Ready(asset),
            Err(error) => {
                warn!(path = %path.display(), %error, "asset load failed");
                LoadState::Failed(error.to_string())
            }
        };
        let mut guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = outcome;
    });
    state
}
