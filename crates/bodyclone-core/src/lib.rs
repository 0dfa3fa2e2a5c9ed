//! BodyClone Core - Engine-independent logic for the digital twin viewer
//!
//! This crate holds everything that does not need a renderer:
//! - Mood model, selector dock entries and the observable mood store
//! - Camera configuration and orbit navigation math
//! - Model asset cache with preload and load-failure tracking
//! - Per-mount avatar viewport state
//! - Phone shell and dock layout

pub mod asset;
pub mod camera;
pub mod config;
pub mod mood;
pub mod scene;
pub mod shell;

pub use asset::{normalize_asset_path, AssetLoadError, AssetStatus, LoadRequest, ModelCache};
pub use camera::{CameraConfig, OrbitController};
pub use config::{ViewerConfig, AVATAR_ASSET_PATH};
pub use mood::{selector_item, Mood, MoodStore, MoodSubscription, SelectorItem, UnknownMood, SELECTOR_ITEMS};
pub use scene::{AvatarViewport, DirectionalLightSpec, LightRig, ModelPlacement, RenderParams, ViewportContent};
pub use shell::{DockConfig, Palette, Rect, ShellConfig, ShellLayout};
