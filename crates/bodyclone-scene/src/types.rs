//! Shared resources for the twin scene

use bevy::prelude::*;
use bodyclone_core::shell::Rgb;
use bodyclone_core::{ShellLayout, ViewerConfig};
use std::ops::Deref;

/// Immutable viewer configuration handed to the plugin at construction
#[derive(Debug, Clone, Resource)]
pub struct TwinConfig(pub ViewerConfig);

impl Deref for TwinConfig {
    type Target = ViewerConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Shell geometry for the current window size
#[derive(Debug, Clone, PartialEq, Resource, Default)]
pub struct ShellLayoutState(pub ShellLayout);

impl Deref for ShellLayoutState {
    type Target = ShellLayout;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Convert a palette entry to a Bevy colour
pub fn srgb(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb[0], rgb[1], rgb[2])
}
