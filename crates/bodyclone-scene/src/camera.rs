//! Camera controls and orbit navigation

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bodyclone_core::{CameraConfig, OrbitController};

use crate::types::ShellLayoutState;
use crate::ui::update_shell_layout;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit state of the main camera
#[derive(Debug, Clone, Resource)]
pub struct OrbitCamera(pub OrbitController);

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self(OrbitController::from_config(config))
    }

    /// Camera transform looking at the orbit target
    pub fn transform(&self) -> Transform {
        let eye = Vec3::from_array(self.0.eye());
        Transform::from_translation(eye).looking_at(Vec3::from_array(self.0.target()), Vec3::Y)
    }
}

/// Whether the current mouse drag started inside the viewport
#[derive(Debug, Clone, Resource, Default)]
pub struct OrbitDrag {
    pub active: bool,
}

pub struct CameraPlugin {
    pub config: CameraConfig,
}

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(OrbitCamera::from_config(&self.config))
            .init_resource::<OrbitDrag>()
            .add_systems(Update, update_camera.after(update_shell_layout));
    }
}

/// Wheel deltas in pixel units per zoom step
const PIXELS_PER_ZOOM_STEP: f32 = 100.0;

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mut drag: ResMut<OrbitDrag>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<ShellLayoutState>,
    time: Res<Time>,
) {
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());
    let cursor_in_viewport = cursor.is_some_and(|c| layout.accepts_pointer(c.x, c.y));

    // A drag belongs to the viewport only if it started there
    if mouse_button.just_pressed(MouseButton::Left) {
        drag.active = cursor_in_viewport;
    }
    if !mouse_button.pressed(MouseButton::Left) {
        drag.active = false;
    }

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    if drag.active && total_motion != Vec2::ZERO {
        orbit.0.orbit(total_motion.x, total_motion.y);
    }

    // Drain wheel events even when the cursor is elsewhere
    for scroll in mouse_wheel.read() {
        if !cursor_in_viewport {
            continue;
        }
        let steps = match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / PIXELS_PER_ZOOM_STEP,
        };
        orbit.0.zoom(steps);
    }

    // Touch: one finger orbits, two fingers pinch
    let touches: Vec<_> = touch_input
        .iter()
        .filter(|t| layout.accepts_pointer(t.start_position().x, t.start_position().y))
        .collect();
    match touches.as_slice() {
        [t] => {
            let delta = t.delta();
            if delta != Vec2::ZERO {
                orbit.0.orbit(delta.x, delta.y);
            }
        }
        [t1, t2] => {
            let current = t1.position().distance(t2.position());
            let previous = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            orbit.0.pinch(previous, current);
        }
        _ => {}
    }

    orbit.0.advance(time.delta_secs());

    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = orbit.transform();
    }
}
