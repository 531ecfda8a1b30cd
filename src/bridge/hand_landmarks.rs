//! Hand landmark bridge - receives MediaPipe results from JavaScript
//!
//! One call per completed inference. Runs raw classification plus the
//! debounce stabilizer and stores the latest stabilized HandFrame for the
//! frame loop to read (last-write-wins, no queue).

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::classifier::{
    classify, hand_position, GestureKind, GestureStabilizer, HandFrame, Landmark, LANDMARK_COUNT,
};

/// Flat floats per hand: 21 landmarks x (x, y, z)
const FLAT_LEN: usize = LANDMARK_COUNT * 3;

struct HandInputState {
    stabilizer: GestureStabilizer,
    latest: HandFrame,
}

impl Default for HandInputState {
    fn default() -> Self {
        Self {
            stabilizer: GestureStabilizer::new(),
            latest: HandFrame::default(),
        }
    }
}

thread_local! {
    static HAND_INPUT: RefCell<HandInputState> = RefCell::new(HandInputState::default());
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Called from JavaScript once per inference result with a flat
/// Float32Array of 63 values (21 landmarks x 3), or `num_hands = 0`
/// when no hand was detected.
#[wasm_bindgen]
pub fn update_hand_landmarks(data: &[f32], num_hands: usize) {
    if num_hands > 0 && data.len() < FLAT_LEN {
        web_sys::console::warn_1(
            &format!(
                "Invalid landmark data length: {} (expected {})",
                data.len(),
                FLAT_LEN
            )
            .into(),
        );
        return;
    }

    HAND_INPUT.with(|state_cell| {
        let mut state = state_cell.borrow_mut();

        if num_hands == 0 {
            let confirmed = state.stabilizer.push(GestureKind::None);
            state.latest.gesture = confirmed;
            state.latest.detected = false;
            return;
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            let base = i * 3;
            *lm = Landmark {
                x: data[base],
                y: data[base + 1],
                z: data[base + 2],
            };
        }

        let raw = classify(&landmarks);
        let (x, y) = hand_position(&landmarks);
        let confirmed = state.stabilizer.push(raw);
        if confirmed != state.latest.gesture {
            web_sys::console::log_1(&format!("Gesture confirmed: {}", confirmed.as_str()).into());
        }
        state.latest = HandFrame {
            gesture: confirmed,
            x,
            y,
            detected: true,
        };
    });
}

/// Clear gesture history and the confirmed gesture (detector re-init)
#[wasm_bindgen]
pub fn reset_gesture_state() {
    HAND_INPUT.with(|state_cell| {
        let mut state = state_cell.borrow_mut();
        state.stabilizer.reset();
        state.latest = HandFrame::default();
    });
}

// ============================================================================
// INTERNAL API
// ============================================================================

/// Latest stabilized hand frame (read every render frame)
pub fn latest_hand_frame() -> HandFrame {
    HAND_INPUT.with(|state_cell| state_cell.borrow().latest)
}
