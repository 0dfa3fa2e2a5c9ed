//! Scene setup - camera, lights, avatar placement and the render viewport

use bevy::camera::Viewport;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bodyclone_core::{AvatarViewport as ViewportState, Mood, ViewportContent};
use tracing::{debug, info, warn};

use crate::camera::{MainCamera, OrbitCamera};
use crate::models::{poll_model_loads, AvatarModels};
use crate::mood::{apply_mood_selections, MoodState};
use crate::types::{srgb, ShellLayoutState, TwinConfig};
use crate::ui::update_shell_layout;

/// Ambient brightness (cd/m²) per unit of configured intensity
const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 400.0;
/// Directional illuminance (lux) per unit of configured intensity
const DIRECTIONAL_LUX_PER_UNIT: f32 = 4000.0;

/// Root entity of a mounted avatar viewport
#[derive(Component)]
pub struct AvatarViewport {
    pub state: ViewportState<Handle<Scene>>,
    /// Spawned model root, once the asset is ready
    pub model: Option<Entity>,
}

/// Marker for the spawned glTF scene root
#[derive(Component)]
pub struct AvatarModel;

/// Mood passed through to the avatar; carries no visual effect yet
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarMood(pub Mood);

/// Marker for the fixed scene lights
#[derive(Component)]
pub struct TwinLight;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, mount_viewport)
            .add_systems(Update, (
                present_avatar.after(poll_model_loads),
                sync_avatar_mood
                    .after(present_avatar)
                    .after(apply_mood_selections),
                fit_viewport_to_shell.after(update_shell_layout),
            ))
            // Window close writes AppExit in PostUpdate and the runner stops after this frame
            .add_systems(Last, unmount_on_exit);
    }
}

/// Spawn camera, lights and the viewport root, and request the avatar
fn mount_viewport(
    mut commands: Commands,
    config: Res<TwinConfig>,
    mood: Res<MoodState>,
    mut models: ResMut<AvatarModels>,
    mut orbit: ResMut<OrbitCamera>,
    asset_server: Res<AssetServer>,
) {
    // Each mount starts from the configured camera
    *orbit = OrbitCamera::from_config(&config.camera);

    let request = models.request(&config.asset_path, &asset_server);
    debug!(path = %config.asset_path, ?request, "Avatar requested");

    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(srgb(config.shell.palette.shell_background)),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_radians(),
            ..default()
        }),
        orbit.transform(),
        AmbientLight {
            brightness: config.lights.ambient_intensity * AMBIENT_BRIGHTNESS_PER_UNIT,
            ..default()
        },
        MainCamera,
    ));

    for light in &config.lights.directional {
        commands.spawn((
            DirectionalLight {
                illuminance: light.intensity * DIRECTIONAL_LUX_PER_UNIT,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(Vec3::from_array(light.position))
                .looking_at(Vec3::ZERO, Vec3::Y),
            TwinLight,
        ));
    }

    commands.spawn((
        Transform::default(),
        Visibility::default(),
        AvatarViewport {
            state: ViewportState::mount(config.placement, mood.subscribe()),
            model: None,
        },
    ));

    info!("Avatar viewport mounted");
}

/// Spawn the model once its asset is ready, or fall back to an empty view
fn present_avatar(
    mut commands: Commands,
    config: Res<TwinConfig>,
    models: Res<AvatarModels>,
    mut viewports: Query<(Entity, &mut AvatarViewport)>,
) {
    let Some(status) = models.cache.status(&config.asset_path) else {
        return;
    };

    for (entity, mut viewport) in &mut viewports {
        if !viewport.state.on_asset_status(&status) {
            continue;
        }

        let params = viewport.state.render_params();
        let scene = match viewport.state.content() {
            ViewportContent::Model(handle) => handle.as_ref().clone(),
            ViewportContent::Empty => {
                warn!(path = %config.asset_path, "Avatar unavailable, leaving viewport empty");
                continue;
            }
            ViewportContent::Placeholder => continue,
        };

        let placement = params.placement;
        let model = commands
            .spawn((
                SceneRoot(scene),
                Transform::from_translation(Vec3::from_array(placement.offset))
                    .with_scale(Vec3::splat(placement.scale)),
                AvatarModel,
                AvatarMood(params.mood),
            ))
            .id();
        commands.entity(entity).add_child(model);
        viewport.model = Some(model);

        info!(mood = %params.mood, "Avatar presented");
    }
}

/// Forward mood changes to the avatar model
fn sync_avatar_mood(
    mut viewports: Query<&mut AvatarViewport>,
    mut moods: Query<&mut AvatarMood>,
) {
    for mut viewport in &mut viewports {
        let Some(mood) = viewport.state.mood_changed() else {
            continue;
        };
        debug!(mood = %mood, "Avatar mood input updated");

        if let Some(mut avatar_mood) = viewport.model.and_then(|m| moods.get_mut(m).ok()) {
            avatar_mood.0 = mood;
        }
    }
}

/// Restrict the camera to the shell's viewport rectangle
fn fit_viewport_to_shell(
    mut cameras: Query<&mut Camera, With<MainCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ShellLayoutState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    let viewport = layout
        .physical_viewport(window.scale_factor())
        .map(|(position, size)| Viewport {
            physical_position: UVec2::from_array(position),
            physical_size: UVec2::from_array(size),
            ..default()
        });

    let unchanged = match (&camera.viewport, &viewport) {
        (Some(a), Some(b)) => {
            a.physical_position == b.physical_position && a.physical_size == b.physical_size
        }
        (None, None) => true,
        _ => false,
    };
    if !unchanged {
        camera.viewport = viewport;
    }
}

/// Tear the viewport down when the app exits
fn unmount_on_exit(
    mut commands: Commands,
    mut exits: MessageReader<AppExit>,
    mut viewports: Query<(Entity, &mut AvatarViewport)>,
    mut models: ResMut<AvatarModels>,
) {
    if exits.read().next().is_none() {
        return;
    }

    for (entity, mut viewport) in &mut viewports {
        viewport.state.unmount();
        viewport.model = None;
        commands.entity(entity).despawn();
    }

    let released = models.cache.release_unused();
    info!(released, "Avatar viewport unmounted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::gltf::Gltf;
    use bodyclone_core::{AssetLoadError, AssetStatus, LoadRequest, ViewerConfig};

    use crate::models::ModelsPlugin;
    use crate::mood::{MoodPlugin, SelectMood};

    /// Headless app with the viewport systems but no renderer or asset server
    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MoodPlugin { default: Mood::Calm })
            .insert_resource(TwinConfig(ViewerConfig::default()))
            .init_resource::<AvatarModels>()
            .add_message::<AppExit>()
            .add_systems(Update, (
                present_avatar,
                sync_avatar_mood.after(present_avatar).after(apply_mood_selections),
            ))
            .add_systems(Last, unmount_on_exit);

        let subscription = app.world().resource::<MoodState>().subscribe();
        let placement = app.world().resource::<TwinConfig>().placement;
        app.world_mut().spawn((
            Transform::default(),
            Visibility::default(),
            AvatarViewport {
                state: ViewportState::mount(placement, subscription),
                model: None,
            },
        ));
        app
    }

    fn finish_load(app: &mut App, result: Result<Handle<Scene>, AssetLoadError>) {
        let mut models = app.world_mut().resource_mut::<AvatarModels>();
        assert_eq!(models.cache.begin_load("/avatar.glb"), LoadRequest::Start);
        models.cache.finish("/avatar.glb", result);
    }

    fn model_mood(app: &mut App) -> Option<Mood> {
        let mut query = app.world_mut().query::<&AvatarMood>();
        query.iter(app.world()).next().map(|m| m.0)
    }

    #[test]
    fn test_model_spawned_with_latest_mood() {
        let mut app = app();
        app.update();
        assert_eq!(model_mood(&mut app), None);

        // Mood changes while the asset is still loading
        app.world_mut().write_message(SelectMood(Mood::Focus));
        app.update();

        finish_load(&mut app, Ok(Handle::default()));
        app.update();
        assert_eq!(model_mood(&mut app), Some(Mood::Focus));

        app.world_mut().write_message(SelectMood(Mood::Care));
        app.update();
        assert_eq!(model_mood(&mut app), Some(Mood::Care));
    }

    #[test]
    fn test_failed_load_keeps_dock_working() {
        let mut app = app();
        finish_load(
            &mut app,
            Err(AssetLoadError::NotFound("avatar.glb".to_string())),
        );
        app.update();
        assert_eq!(model_mood(&mut app), None);

        app.world_mut().write_message(SelectMood(Mood::Listen));
        app.update();
        assert_eq!(app.world().resource::<MoodState>().current(), Mood::Listen);
    }

    #[test]
    fn test_exit_unmounts_and_releases_model() {
        let mut app = app();
        finish_load(&mut app, Ok(Handle::default()));
        app.update();
        assert_eq!(app.world().resource::<AvatarModels>().cache.len(), 1);

        app.world_mut().write_message(AppExit::Success);
        app.update();

        let mut viewports = app.world_mut().query::<&AvatarViewport>();
        assert_eq!(viewports.iter(app.world()).count(), 0);
        assert!(app.world().resource::<AvatarModels>().cache.is_empty());
    }

    fn close_window(mut exits: MessageWriter<AppExit>) {
        exits.write(AppExit::Success);
    }

    #[test]
    fn test_window_close_unmounts_in_final_frame() {
        let mut app = app();
        finish_load(&mut app, Ok(Handle::default()));
        app.update();

        // Same schedule bevy_window uses when the primary window closes
        app.add_systems(PostUpdate, close_window);
        app.update();
        assert!(app.should_exit().is_some());

        // No further frame runs; the teardown must already be done
        let mut viewports = app.world_mut().query::<&AvatarViewport>();
        assert_eq!(viewports.iter(app.world()).count(), 0);
        let mut models = app.world_mut().query::<&AvatarModel>();
        assert_eq!(models.iter(app.world()).count(), 0);
        assert!(app.world().resource::<AvatarModels>().cache.is_empty());
    }

    /// App with a real asset server rooted at a directory without the avatar
    fn app_with_asset_server() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: "missing-assets".to_string(),
                ..default()
            },
        ))
        .init_asset::<Gltf>()
        .init_resource::<ShellLayoutState>()
        .insert_resource(TwinConfig(ViewerConfig::default()))
        .insert_resource(OrbitCamera::from_config(&ViewerConfig::default().camera))
        .add_plugins((
            MoodPlugin { default: Mood::Calm },
            ModelsPlugin,
            SceneSetupPlugin,
        ));
        app.finish();
        app.cleanup();
        app
    }

    fn viewport_content_is_empty(app: &mut App) -> bool {
        let mut query = app.world_mut().query::<&AvatarViewport>();
        let viewport = query.single(app.world()).unwrap();
        matches!(viewport.state.content(), ViewportContent::Empty) && viewport.model.is_none()
    }

    #[test]
    fn test_missing_avatar_leaves_viewport_empty() {
        let mut app = app_with_asset_server();
        app.update();

        // Preload plus mount share a single fetch
        let models = app.world().resource::<AvatarModels>();
        assert_eq!(models.cache.fetch_count("/avatar.glb"), 1);

        for _ in 0..1_000 {
            let loading = matches!(
                app.world().resource::<AvatarModels>().cache.status("/avatar.glb"),
                Some(AssetStatus::Loading)
            );
            if !loading {
                break;
            }
            app.update();
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        app.update();

        assert!(matches!(
            app.world().resource::<AvatarModels>().cache.status("/avatar.glb"),
            Some(AssetStatus::Failed(_))
        ));
        assert!(viewport_content_is_empty(&mut app));
        assert_eq!(model_mood(&mut app), None);

        // A failed load never blocks the dock
        app.world_mut().write_message(SelectMood(Mood::Care));
        app.update();
        assert_eq!(app.world().resource::<MoodState>().current(), Mood::Care);
    }
}
