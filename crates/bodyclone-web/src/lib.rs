//! BodyClone Web - WebGPU-powered digital health twin frontend
//!
//! This crate assembles the Bevy app for the browser. The same app also runs
//! natively through the `bodyclone-viewer` binary.

mod app;

pub use app::run;

use bodyclone_core::ViewerConfig;
use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build()
    );

    app::run(ViewerConfig::default());
}
