//! Detector status surface
//!
//! Hand-detector failures are reported by JavaScript and surfaced to the
//! UI; the core itself keeps running with "hand never detected" behavior.

use std::cell::Cell;

use wasm_bindgen::prelude::*;

/// Lifecycle of the external hand-landmark collaborator
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorStatus {
    Initializing,
    Ready,
    Unavailable,
    PermissionDenied,
}

thread_local! {
    static STATUS: Cell<DetectorStatus> = const { Cell::new(DetectorStatus::Initializing) };
}

/// Called from JavaScript when the detector's lifecycle changes
#[wasm_bindgen]
pub fn set_detector_status(status: DetectorStatus) {
    if matches!(
        status,
        DetectorStatus::Unavailable | DetectorStatus::PermissionDenied
    ) {
        web_sys::console::warn_1(&format!("Hand detector degraded: {:?}", status).into());
    }
    STATUS.with(|s| s.set(status));
}

/// Current detector status, for the UI to display
#[wasm_bindgen]
pub fn detector_status() -> DetectorStatus {
    STATUS.with(|s| s.get())
}
