//! Markerview Web - marker-based AR page rendered with Bevy
//!
//! This crate runs in the browser: it opens the camera, drives the marker
//! tracker through a small JavaScript bridge and draws the catalog models
//! over the video feed.

mod app;
mod camera;
mod scene;
mod tracker;
mod ui;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    let config = app::config_from_browser();

    // Default to WARN to keep wgpu noise out of the console
    let level = config.log_level.parse().unwrap_or(tracing::Level::WARN);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build()
    );

    app::run(config);
}
