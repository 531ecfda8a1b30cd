//! Classifier module - gesture classification and temporal stabilization
//!
//! Re-exports only. All logic in submodules.

mod gesture;
mod stabilizer;

pub use gesture::{
    classify, hand_position, GestureKind, HandFrame, Landmark, FINGER_TIPS, INDEX_TIP,
    LANDMARK_COUNT, THUMB_TIP, WRIST,
};
pub use stabilizer::{GestureStabilizer, HISTORY_SIZE, NONE_EXIT_FRAMES};
