//! Phone shell chrome and the selector dock using bevy_egui

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use bodyclone_core::shell::{Palette, Rgb, ShellConfig};
use bodyclone_core::{Mood, Rect, ShellLayout};

use crate::mood::{MoodState, SelectMood};
use crate::scene::AvatarViewport;
use crate::types::{ShellLayoutState, TwinConfig};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShellLayoutState>()
            .add_systems(Update, update_shell_layout)
            // bevy_egui 0.38 draws in its own pass
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// Recompute the shell geometry from the window size
pub(crate) fn update_shell_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<TwinConfig>,
    mut layout: ResMut<ShellLayoutState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let computed = ShellLayout::compute(
        &config.shell,
        &config.dock,
        config.selector.len(),
        window.width(),
        window.height(),
    );
    layout.set_if_neq(ShellLayoutState(computed));
}

fn ui_system(
    mut contexts: EguiContexts,
    config: Res<TwinConfig>,
    layout: Res<ShellLayoutState>,
    mood: Res<MoodState>,
    viewports: Query<&AvatarViewport>,
    time: Res<Time>,
    mut selections: MessageWriter<SelectMood>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    paint_shell(ctx, &config, &layout);

    let loading = viewports.iter().any(|v| v.state.content().is_placeholder());
    if loading {
        show_spinner(ctx, &layout.viewport, &config.shell.palette);
    }

    if let Some(item) = show_dock(ctx, &config, &layout, mood.current(), time.elapsed_secs()) {
        selections.write(SelectMood(config.selector[item].mood));
    }
}

/// Page background, rim, header, title and notch around the 3D viewport
fn paint_shell(ctx: &egui::Context, config: &TwinConfig, layout: &ShellLayout) {
    let shell = &config.shell;
    let palette = &shell.palette;
    let painter = ctx.layer_painter(egui::LayerId::background());
    let frame = to_egui(&layout.frame);
    let window = to_egui(&layout.window);

    // Page around the frame; the viewport itself stays uncovered
    let page = color(palette.page_background);
    for strip in [
        egui::Rect::from_min_max(window.min, egui::pos2(window.max.x, frame.min.y)),
        egui::Rect::from_min_max(egui::pos2(window.min.x, frame.max.y), window.max),
        egui::Rect::from_min_max(
            egui::pos2(window.min.x, frame.min.y),
            egui::pos2(frame.min.x, frame.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(frame.max.x, frame.min.y),
            egui::pos2(window.max.x, frame.max.y),
        ),
    ] {
        if strip.is_positive() {
            painter.rect_filled(strip, egui::CornerRadius::ZERO, page);
        }
    }

    let corner = radius(shell.corner_radius);

    // Rim spreads outward in the page colour and rounds off the viewport corners
    painter.rect_stroke(frame, corner, rim_stroke(shell), egui::StrokeKind::Outside);

    painter.rect_filled(
        to_egui(&layout.header),
        egui::CornerRadius {
            nw: corner.nw,
            ne: corner.ne,
            sw: 0,
            se: 0,
        },
        color(palette.shell_background),
    );
    painter.text(
        to_egui(&layout.header).center() + egui::vec2(0.0, shell.notch.height),
        egui::Align2::CENTER_CENTER,
        &shell.title,
        egui::FontId::proportional(shell.title_size),
        color(palette.text),
    );

    painter.rect_filled(
        to_egui(&layout.notch),
        radius(shell.notch.corner_radius),
        color(palette.notch),
    );
}

/// Outer rim of the frame
///
/// At least wide enough to cover the square viewport corners that stick out
/// past the rounded frame.
fn rim_stroke(shell: &ShellConfig) -> egui::Stroke {
    let corner_cover = shell.corner_radius * (std::f32::consts::SQRT_2 - 1.0) + 1.0;
    egui::Stroke::new(
        shell.rim_width.max(corner_cover),
        color(shell.palette.page_background),
    )
}

/// Spinner in the middle of the viewport while the avatar loads
fn show_spinner(ctx: &egui::Context, viewport: &Rect, palette: &Palette) {
    const SIZE: f32 = 32.0;
    let [cx, cy] = viewport.center();

    egui::Area::new(egui::Id::new("avatar_loading"))
        .fixed_pos(egui::pos2(cx - SIZE / 2.0, cy - SIZE / 2.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.add(egui::Spinner::new().size(SIZE).color(color(palette.accent)));
        });
}

/// Draw the dock and return the index of a clicked item
fn show_dock(
    ctx: &egui::Context,
    config: &TwinConfig,
    layout: &ShellLayout,
    current: Mood,
    t: f32,
) -> Option<usize> {
    let (Some(first), Some(last)) = (layout.dock_items.first(), layout.dock_items.last()) else {
        return None;
    };
    let dock = &config.dock;
    let palette = &config.shell.palette;

    // Room for the lift and scale of the outermost items
    let margin = dock.hover_lift + dock.float_amplitude + dock.item_size * (dock.hover_scale - 1.0);
    let column = egui::Rect::from_min_max(
        egui::pos2(first.x - margin, first.y - margin),
        egui::pos2(last.right() + margin, last.bottom() + margin),
    );

    let mut clicked = None;
    egui::Area::new(egui::Id::new("selector_dock"))
        .fixed_pos(column.min)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.allocate_exact_size(column.size(), egui::Sense::hover());

            for (index, (base, item)) in layout.dock_items.iter().zip(&config.selector).enumerate() {
                // Hit-test the resting rect so the float never drops hover
                let response = ui
                    .interact(to_egui(base), ui.id().with(item.label), egui::Sense::click())
                    .on_hover_text(item.label);
                let hovered = response.hovered();
                if response.clicked() {
                    clicked = Some(index);
                }
                let hover = ui.ctx().animate_bool_with_time(response.id, hovered, dock.hover_transition);

                let rect = to_egui(&dock.animated_rect(base, index, t, hover));
                let (ring, ring_width) = item_ring(palette, item.mood == current, hovered);
                let painter = ui.painter();
                painter.rect_filled(rect, radius(dock.corner_radius), color(palette.dock_background));
                painter.rect_stroke(
                    rect,
                    radius(dock.corner_radius),
                    egui::Stroke::new(ring_width, ring),
                    egui::StrokeKind::Inside,
                );
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    item.glyph,
                    egui::FontId::proportional(dock.glyph_size),
                    color(palette.text),
                );
            }
        });

    if clicked.is_some() {
        ctx.request_repaint();
    }
    clicked
}

/// Ring colour and width of a dock item
fn item_ring(palette: &Palette, selected: bool, hovered: bool) -> (egui::Color32, f32) {
    if selected || hovered {
        (color(palette.accent), 2.0)
    } else {
        (color(palette.dock_ring), 1.0)
    }
}

fn to_egui(rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

fn radius(r: f32) -> egui::CornerRadius {
    egui::CornerRadius::same(r.round().clamp(0.0, u8::MAX as f32) as u8)
}
