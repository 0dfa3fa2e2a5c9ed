//! Bevy application setup

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use bodyclone_core::ViewerConfig;
use bodyclone_scene::TwinScenePlugin;

/// Canvas element the app renders into on the web
const CANVAS_SELECTOR: &str = "#twin-canvas";

/// Asset root; the static host serves it under `/assets`
const ASSET_ROOT: &str = "assets";

fn primary_window(config: &ViewerConfig) -> Window {
    Window {
        title: config.shell.title.clone(),
        canvas: Some(CANVAS_SELECTOR.to_string()),
        fit_canvas_to_parent: true,
        prevent_default_event_handling: false,
        ..default()
    }
}

fn asset_plugin() -> AssetPlugin {
    AssetPlugin {
        file_path: ASSET_ROOT.to_string(),
        // Don't look for .meta files - the host doesn't have them
        meta_check: AssetMetaCheck::Never,
        ..default()
    }
}

/// Run the Bevy application
pub fn run(config: ViewerConfig) {
    App::new()
        // Continuous rendering keeps the dock float and orbit smoothing moving
        .insert_resource(WinitSettings::default())
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(primary_window(&config)),
                ..default()
            })
            .set(asset_plugin())
        )
        // Picking must be in place before EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(TwinScenePlugin { config })
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_uses_shell_title() {
        let window = primary_window(&ViewerConfig::default());
        assert_eq!(window.title, "Digital Health Twin");
        assert_eq!(window.canvas.as_deref(), Some("#twin-canvas"));
        assert!(window.fit_canvas_to_parent);
    }

    #[test]
    fn test_assets_from_served_root() {
        let plugin = asset_plugin();
        assert_eq!(plugin.file_path, "assets");
        assert!(matches!(plugin.meta_check, AssetMetaCheck::Never));
    }
}
