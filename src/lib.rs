//! Galaxy Web - gesture-driven morphing point cloud
//!
//! An image becomes a particle cloud that disperses into a spinning galaxy
//! on an open palm and reforms on a fist, steered by live hand tracking.
//! Entry point for the WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

mod bridge;
mod classifier;
mod cloud;
mod physics;
mod renderer;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    detector_status, load_image, reset_gesture_state, set_detector_status, update_hand_landmarks,
    DetectorStatus,
};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize WebGPU and the default point cloud - must be called before
/// render_frame
#[wasm_bindgen]
pub async fn init() -> Result<(), JsValue> {
    renderer::initialize_gpu().await?;
    bridge::install_fallback_cloud();
    console_log!("WebGPU initialized, particle session ready");
    Ok(())
}

/// Advance and render one frame with the latest stabilized hand state
#[wasm_bindgen]
pub fn render_frame() {
    bridge::frame_tick();
}
