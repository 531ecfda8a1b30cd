//! Bridge module - JS <-> Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod cloud_state;
mod hand_landmarks;
mod status;

pub use cloud_state::{frame_tick, install_fallback_cloud, load_image};
pub use hand_landmarks::{latest_hand_frame, reset_gesture_state, update_hand_landmarks};
pub use status::{detector_status, set_detector_status, DetectorStatus};
