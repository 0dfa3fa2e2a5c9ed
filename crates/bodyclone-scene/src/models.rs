//! glTF avatar loading through the shared model cache

use bevy::asset::io::AssetReaderError;
use bevy::asset::{AssetLoadError as BevyLoadError, LoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bodyclone_core::{normalize_asset_path, AssetLoadError, LoadRequest, ModelCache};
use std::collections::HashMap;

use crate::types::TwinConfig;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AvatarModels>()
            .add_systems(PreStartup, preload_avatar)
            .add_systems(Update, poll_model_loads);
    }
}

/// Cache of loaded avatar scenes plus the glTF fetches still in flight
#[derive(Resource, Default)]
pub struct AvatarModels {
    pub cache: ModelCache<Handle<Scene>>,
    loading: HashMap<String, Handle<Gltf>>,
}

impl AvatarModels {
    /// Ask for a model, starting the fetch only on first request
    pub fn request(&mut self, path: &str, asset_server: &AssetServer) -> LoadRequest {
        let request = self.cache.begin_load(path);
        if request == LoadRequest::Start {
            self.start_fetch(path, asset_server);
        }
        request
    }

    /// Begin loading before any viewport mounts
    pub fn preload(&mut self, path: &str, asset_server: &AssetServer) -> LoadRequest {
        let request = self.cache.preload(path);
        if request == LoadRequest::Start {
            self.start_fetch(path, asset_server);
        }
        request
    }

    fn start_fetch(&mut self, path: &str, asset_server: &AssetServer) {
        let asset_path = normalize_asset_path(path);
        let handle: Handle<Gltf> = asset_server.load(asset_path.clone());
        self.loading.insert(asset_path, handle);
    }
}

fn preload_avatar(
    config: Res<TwinConfig>,
    mut models: ResMut<AvatarModels>,
    asset_server: Res<AssetServer>,
) {
    if config.preload {
        models.preload(&config.asset_path, &asset_server);
    }
}

/// Check loading state and extract scenes from loaded glTFs
pub(crate) fn poll_model_loads(
    mut models: ResMut<AvatarModels>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    if models.loading.is_empty() {
        return;
    }

    let keys: Vec<String> = models.loading.keys().cloned().collect();
    for key in keys {
        let Some(handle) = models.loading.get(&key) else {
            continue;
        };

        let outcome = match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => Some(extract_scene(&key, gltf_assets.get(handle))),
            Some(LoadState::Failed(err)) => Some(Err(to_load_error(&key, &err))),
            // Still loading
            _ => None,
        };

        if let Some(result) = outcome {
            models.loading.remove(&key);
            models.cache.finish(&key, result);
        }
    }
}

/// Pick the default scene, falling back to the first one
fn extract_scene(path: &str, gltf: Option<&Gltf>) -> Result<Handle<Scene>, AssetLoadError> {
    let gltf = gltf.ok_or_else(|| AssetLoadError::Malformed {
        path: path.to_string(),
        reason: "glTF asset missing after load".to_string(),
    })?;

    gltf.default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
        .ok_or_else(|| AssetLoadError::NoScene(path.to_string()))
}

fn to_load_error(path: &str, err: &BevyLoadError) -> AssetLoadError {
    match err {
        BevyLoadError::AssetReaderError(AssetReaderError::NotFound(_)) => {
            AssetLoadError::NotFound(path.to_string())
        }
        BevyLoadError::AssetReaderError(reader) => AssetLoadError::Fetch {
            path: path.to_string(),
            reason: reader.to_string(),
        },
        other => AssetLoadError::Malformed {
            path: path.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = BevyLoadError::AssetReaderError(AssetReaderError::NotFound(PathBuf::from(
            "avatar.glb",
        )));
        assert_eq!(
            to_load_error("avatar.glb", &err),
            AssetLoadError::NotFound("avatar.glb".to_string())
        );
    }

    #[test]
    fn test_http_error_maps_to_fetch() {
        let err = BevyLoadError::AssetReaderError(AssetReaderError::HttpError(503));
        assert!(matches!(
            to_load_error("avatar.glb", &err),
            AssetLoadError::Fetch { .. }
        ));
    }

    #[test]
    fn test_missing_gltf_is_malformed() {
        assert!(matches!(
            extract_scene("avatar.glb", None),
            Err(AssetLoadError::Malformed { .. })
        ));
    }
}
