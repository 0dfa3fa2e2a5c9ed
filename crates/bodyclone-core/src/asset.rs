//! Model asset cache
//!
//! Tracks load state per asset path so that a model requested by several
//! viewports (or preloaded before the first one mounts) is fetched once.
//! The cache is engine-agnostic: the caller performs the actual fetch when
//! [`ModelCache::begin_load`] answers [`LoadRequest::Start`] and reports the
//! outcome through [`ModelCache::finish`].

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("failed to parse {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("{0} contains no scenes")]
    NoScene(String),
}

/// Normalize an asset path for loading
///
/// Absolute URLs are kept as-is; local paths lose their leading slash so
/// they resolve against the asset root.
pub fn normalize_asset_path(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    path.trim_start_matches('/').to_string()
}

/// What the caller should do after asking for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    /// First request: the caller must issue the fetch
    Start,
    /// A fetch is already running
    InFlight,
    /// The asset is loaded
    Cached,
    /// The previous fetch failed; no retry is attempted
    Failed,
}

/// Load state of a cached asset
#[derive(Debug)]
pub enum AssetStatus<H> {
    Loading,
    Ready(Arc<H>),
    Failed(AssetLoadError),
}

impl<H> Clone for AssetStatus<H> {
    fn clone(&self) -> Self {
        match self {
            AssetStatus::Loading => AssetStatus::Loading,
            AssetStatus::Ready(h) => AssetStatus::Ready(Arc::clone(h)),
            AssetStatus::Failed(e) => AssetStatus::Failed(e.clone()),
        }
    }
}

#[derive(Debug)]
struct CacheEntry<H> {
    status: AssetStatus<H>,
    fetches: u32,
}

/// Cache of loaded model handles keyed by normalized path
#[derive(Debug)]
pub struct ModelCache<H> {
    entries: HashMap<String, CacheEntry<H>>,
}

impl<H> Default for ModelCache<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> ModelCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin loading ahead of the first viewport that needs the asset
    pub fn preload(&mut self, path: &str) -> LoadRequest {
        let request = self.begin_load(path);
        if request == LoadRequest::Start {
            info!(path = %normalize_asset_path(path), "Preloading model");
        }
        request
    }

    /// Request an asset, registering a fetch only on first use
    pub fn begin_load(&mut self, path: &str) -> LoadRequest {
        let key = normalize_asset_path(path);
        match self.entries.get(&key) {
            Some(entry) => match entry.status {
                AssetStatus::Loading => LoadRequest::InFlight,
                AssetStatus::Ready(_) => LoadRequest::Cached,
                AssetStatus::Failed(_) => LoadRequest::Failed,
            },
            None => {
                debug!(path = %key, "Starting model fetch");
                self.entries.insert(
                    key,
                    CacheEntry {
                        status: AssetStatus::Loading,
                        fetches: 1,
                    },
                );
                LoadRequest::Start
            }
        }
    }

    /// Record the outcome of a fetch started by [`Self::begin_load`]
    pub fn finish(&mut self, path: &str, result: Result<H, AssetLoadError>) {
        let key = normalize_asset_path(path);
        let Some(entry) = self.entries.get_mut(&key) else {
            warn!(path = %key, "Load finished for a model that was never requested");
            return;
        };

        entry.status = match result {
            Ok(handle) => {
                info!(path = %key, "Model loaded");
                AssetStatus::Ready(Arc::new(handle))
            }
            Err(e) => {
                tracing::error!(path = %key, error = %e, "Model failed to load");
                AssetStatus::Failed(e)
            }
        };
    }

    pub fn status(&self, path: &str) -> Option<AssetStatus<H>> {
        self.entries
            .get(&normalize_asset_path(path))
            .map(|entry| entry.status.clone())
    }

    /// Handle of a loaded asset
    pub fn get(&self, path: &str) -> Option<Arc<H>> {
        match self.status(path) {
            Some(AssetStatus::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Paths with a fetch still running
    pub fn loading_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| matches!(entry.status, AssetStatus::Loading))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Number of fetches issued for a path
    pub fn fetch_count(&self, path: &str) -> u32 {
        self.entries
            .get(&normalize_asset_path(path))
            .map(|entry| entry.fetches)
            .unwrap_or(0)
    }

    /// Drop loaded assets that no viewport holds anymore
    pub fn release_unused(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| match &entry.status {
            AssetStatus::Ready(handle) if Arc::strong_count(handle) == 1 => {
                debug!(path = %key, "Releasing unused model");
                false
            }
            _ => true,
        });
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_asset_path() {
        assert_eq!(normalize_asset_path("/avatar.glb"), "avatar.glb");
        assert_eq!(normalize_asset_path("avatar.glb"), "avatar.glb");
        assert_eq!(
            normalize_asset_path("https://cdn.example.com/avatar.glb"),
            "https://cdn.example.com/avatar.glb"
        );
    }

    #[test]
    fn test_preload_then_mount_fetches_once() {
        let mut cache: ModelCache<&str> = ModelCache::new();

        assert_eq!(cache.preload("/avatar.glb"), LoadRequest::Start);
        // Viewport mounts while the preload is still running
        assert_eq!(cache.begin_load("avatar.glb"), LoadRequest::InFlight);

        cache.finish("avatar.glb", Ok("scene"));
        assert_eq!(cache.begin_load("/avatar.glb"), LoadRequest::Cached);
        assert_eq!(cache.fetch_count("avatar.glb"), 1);
        assert_eq!(cache.get("avatar.glb").as_deref(), Some(&"scene"));
    }

    #[test]
    fn test_failure_is_sticky_and_not_retried() {
        let mut cache: ModelCache<&str> = ModelCache::new();
        cache.begin_load("avatar.glb");
        cache.finish(
            "avatar.glb",
            Err(AssetLoadError::NotFound("avatar.glb".to_string())),
        );

        assert_eq!(cache.begin_load("avatar.glb"), LoadRequest::Failed);
        assert_eq!(cache.fetch_count("avatar.glb"), 1);
        assert!(matches!(
            cache.status("avatar.glb"),
            Some(AssetStatus::Failed(AssetLoadError::NotFound(_)))
        ));
        assert!(cache.get("avatar.glb").is_none());
    }

    #[test]
    fn test_unrequested_finish_is_ignored() {
        let mut cache: ModelCache<u32> = ModelCache::new();
        cache.finish("ghost.glb", Ok(7));
        assert!(cache.is_empty());
        assert_eq!(cache.fetch_count("ghost.glb"), 0);
    }

    #[test]
    fn test_loading_paths() {
        let mut cache: ModelCache<u32> = ModelCache::new();
        cache.begin_load("a.glb");
        cache.begin_load("b.glb");
        cache.finish("a.glb", Ok(1));
        assert_eq!(cache.loading_paths(), vec!["b.glb".to_string()]);
    }

    #[test]
    fn test_release_unused_keeps_shared_handles() {
        let mut cache: ModelCache<u32> = ModelCache::new();
        cache.begin_load("a.glb");
        cache.finish("a.glb", Ok(1));
        cache.begin_load("b.glb");
        cache.finish("b.glb", Ok(2));
        cache.begin_load("c.glb");

        let held = cache.get("a.glb");
        assert_eq!(cache.release_unused(), 1);
        assert!(cache.get("a.glb").is_some());
        assert!(cache.status("b.glb").is_none());
        // In-flight entries survive
        assert!(matches!(cache.status("c.glb"), Some(AssetStatus::Loading)));

        drop(held);
        assert_eq!(cache.release_unused(), 1);
        assert_eq!(cache.len(), 1);
    }
}
