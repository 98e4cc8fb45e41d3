//! Evergreen Web - WebGPU-powered tree scene in the browser
//!
//! The wasm module builds the scene from the embedded configuration,
//! makes sure the page has a canvas to draw into, and hands control to
//! Bevy's animation loop.

mod app;
mod host;

use wasm_bindgen::prelude::*;

pub use app::{scene_from_toml, CANVAS_ID};

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

    app::run();
}
