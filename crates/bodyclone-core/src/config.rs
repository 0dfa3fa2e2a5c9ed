//! Viewer configuration
//!
//! All visual constants are fixed at build time. They are gathered in one
//! immutable [`ViewerConfig`] that is handed to the scene at construction.

use serde::Serialize;

use crate::camera::CameraConfig;
use crate::mood::{Mood, SelectorItem, SELECTOR_ITEMS};
use crate::scene::{LightRig, ModelPlacement};
use crate::shell::{DockConfig, ShellConfig};

/// Logical location of the avatar model
pub const AVATAR_ASSET_PATH: &str = "/avatar.glb";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerConfig {
    pub default_mood: Mood,
    pub asset_path: String,
    /// Start fetching the model before the viewport mounts
    pub preload: bool,
    pub camera: CameraConfig,
    pub lights: LightRig,
    pub placement: ModelPlacement,
    pub shell: ShellConfig,
    pub dock: DockConfig,
    pub selector: Vec<SelectorItem>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_mood: Mood::Calm,
            asset_path: AVATAR_ASSET_PATH.to_string(),
            preload: true,
            camera: CameraConfig::default(),
            lights: LightRig::default(),
            placement: ModelPlacement::default(),
            shell: ShellConfig::default(),
            dock: DockConfig::default(),
            selector: SELECTOR_ITEMS.to_vec(),
        }
    }
}
