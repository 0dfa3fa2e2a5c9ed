//! BodyClone Scene - Bevy plugins for the digital twin viewer
//!
//! This crate wires the engine-independent pieces of `bodyclone-core` into a
//! Bevy app: the avatar viewport, the orbit camera, the mood resource and the
//! egui phone shell with its selector dock.

pub mod camera;
pub mod models;
pub mod mood;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use bodyclone_core::ViewerConfig;

/// Plugin that sets up the whole twin page
#[derive(Default)]
pub struct TwinScenePlugin {
    pub config: ViewerConfig,
}

impl Plugin for TwinScenePlugin {
    fn build(&self, app: &mut App) {
        let palette = &self.config.shell.palette;

        app.insert_resource(TwinConfig(self.config.clone()))
            .insert_resource(ClearColor(srgb(palette.page_background)))
            .add_plugins(mood::MoodPlugin {
                default: self.config.default_mood,
            })
            .add_plugins(camera::CameraPlugin {
                config: self.config.camera,
            })
            .add_plugins(models::ModelsPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use camera::{MainCamera, OrbitCamera};
pub use models::AvatarModels;
pub use mood::{MoodState, SelectMood};
pub use scene::{AvatarModel, AvatarMood, AvatarViewport};
pub use types::*;
