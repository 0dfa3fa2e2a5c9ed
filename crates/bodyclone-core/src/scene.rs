//! Avatar scene description and per-mount viewport state

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::asset::AssetStatus;
use crate::mood::{Mood, MoodSubscription};

/// Directional light, aimed at the model origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalLightSpec {
    pub position: [f32; 3],
    pub intensity: f32,
}

/// Fixed lighting so the model is visible whatever its materials
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightRig {
    pub ambient_intensity: f32,
    pub directional: Vec<DirectionalLightSpec>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.8,
            directional: vec![
                DirectionalLightSpec {
                    position: [2.0, 4.0, 3.0],
                    intensity: 1.2,
                },
                DirectionalLightSpec {
                    position: [-2.0, 3.0, 2.0],
                    intensity: 0.6,
                },
            ],
        }
    }
}

/// Where the model root sits in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPlacement {
    pub offset: [f32; 3],
    pub scale: f32,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        // Shifted down so the full body is framed
        Self {
            offset: [0.0, -1.5, 0.0],
            scale: 1.0,
        }
    }
}

/// What the viewport currently shows
#[derive(Debug)]
pub enum ViewportContent<H> {
    /// Asset still loading
    Placeholder,
    Model(Arc<H>),
    /// Asset failed to load
    Empty,
}

impl<H> ViewportContent<H> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ViewportContent::Placeholder)
    }

    pub fn model(&self) -> Option<&Arc<H>> {
        match self {
            ViewportContent::Model(h) => Some(h),
            _ => None,
        }
    }
}

/// Inputs the renderer reads each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub mood: Mood,
    pub placement: ModelPlacement,
    pub has_model: bool,
}

/// Presentation state of one mounted avatar viewport
#[derive(Debug)]
pub struct AvatarViewport<H> {
    placement: ModelPlacement,
    mood: MoodSubscription,
    content: ViewportContent<H>,
    mounted: bool,
}

impl<H> AvatarViewport<H> {
    pub fn mount(placement: ModelPlacement, mood: MoodSubscription) -> Self {
        debug!("Avatar viewport mounted");
        Self {
            placement,
            mood,
            content: ViewportContent::Placeholder,
            mounted: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn content(&self) -> &ViewportContent<H> {
        &self.content
    }

    /// Apply the latest asset status. Returns true if the content changed.
    pub fn on_asset_status(&mut self, status: &AssetStatus<H>) -> bool {
        if !self.mounted {
            warn!("Ignoring asset update for an unmounted viewport");
            return false;
        }
        if !self.content.is_placeholder() {
            return false;
        }

        match status {
            AssetStatus::Loading => false,
            AssetStatus::Ready(handle) => {
                self.content = ViewportContent::Model(Arc::clone(handle));
                true
            }
            AssetStatus::Failed(e) => {
                debug!(error = %e, "Showing empty viewport");
                self.content = ViewportContent::Empty;
                true
            }
        }
    }

    /// Mood changed since the last call, if any
    pub fn mood_changed(&mut self) -> Option<Mood> {
        self.mood.changed()
    }

    /// Parameters for the current frame; the mood is read now, not when the
    /// model was requested.
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            mood: self.mood.latest(),
            placement: self.placement,
            has_model: self.content.model().is_some(),
        }
    }

    /// Drop the model reference; later asset updates are ignored
    pub fn unmount(&mut self) {
        if self.mounted {
            debug!("Avatar viewport unmounted");
        }
        self.mounted = false;
        self.content = ViewportContent::Empty;
    }
}
