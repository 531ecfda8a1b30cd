//! Raw single-frame gesture classification from hand landmarks
//!
//! Distance-rule classification, no temporal smoothing here.
//! The stabilizer turns these noisy per-frame results into a stable gesture.

// ============================================================================
// HAND LANDMARK INDICES (MediaPipe Hands - 21 total)
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// All five fingertip indices
pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Number of landmarks per hand
pub const LANDMARK_COUNT: usize = 21;

// ============================================================================
// THRESHOLDS (landmark space, 0-1 normalized)
// ============================================================================

/// Thumb-to-index distance below this is a pinch
const PINCH_THRESHOLD: f32 = 0.05;

/// Mean wrist-to-tip distance below this is a closed fist
const FIST_THRESHOLD: f32 = 0.25;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 3D hand landmark (normalized coordinates)
#[derive(Clone, Copy, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The closed set of recognized gestures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureKind {
    #[default]
    None,
    OpenPalm,
    ClosedFist,
    Pinch,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::None => "none",
            GestureKind::OpenPalm => "open_palm",
            GestureKind::ClosedFist => "closed_fist",
            GestureKind::Pinch => "pinch",
        }
    }
}

/// One stabilized inference result, delivered every inference tick
#[derive(Clone, Copy, Default)]
pub struct HandFrame {
    pub gesture: GestureKind,
    /// Horizontal hand position, mirrored to match the mirrored camera view
    pub x: f32,
    pub y: f32,
    pub detected: bool,
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

fn distance(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Classify a single frame of landmarks
///
/// Rule order matters: pinch is checked before fist because a pinching
/// hand also has short wrist-to-tip distances.
pub fn classify(landmarks: &[Landmark; LANDMARK_COUNT]) -> GestureKind {
    let pinch_distance = distance(landmarks[THUMB_TIP], landmarks[INDEX_TIP]);
    if pinch_distance < PINCH_THRESHOLD {
        return GestureKind::Pinch;
    }

    let wrist = landmarks[WRIST];
    let avg_tip_distance: f32 = FINGER_TIPS
        .iter()
        .map(|&tip| distance(wrist, landmarks[tip]))
        .sum::<f32>()
        / FINGER_TIPS.len() as f32;

    if avg_tip_distance < FIST_THRESHOLD {
        GestureKind::ClosedFist
    } else {
        GestureKind::OpenPalm
    }
}

/// Reported hand position: wrist, horizontally mirrored
pub fn hand_position(landmarks: &[Landmark; LANDMARK_COUNT]) -> (f32, f32) {
    (1.0 - landmarks[WRIST].x, landmarks[WRIST].y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand() -> [Landmark; LANDMARK_COUNT] {
        // Wrist at center, all tips spread far -> open palm
        let mut lm = [Landmark::default(); LANDMARK_COUNT];
        lm[WRIST] = Landmark { x: 0.5, y: 0.5, z: 0.0 };
        for (i, &tip) in FINGER_TIPS.iter().enumerate() {
            lm[tip] = Landmark {
                x: 0.5 + 0.3,
                y: 0.5 - 0.1 * i as f32,
                z: 0.0,
            };
        }
        lm
    }

    #[test]
    fn spread_fingers_classify_as_open_palm() {
        assert_eq!(classify(&flat_hand()), GestureKind::OpenPalm);
    }

    #[test]
    fn curled_fingers_classify_as_fist() {
        let mut lm = [Landmark::default(); LANDMARK_COUNT];
        lm[WRIST] = Landmark { x: 0.5, y: 0.5, z: 0.0 };
        for &tip in FINGER_TIPS.iter() {
            lm[tip] = Landmark { x: 0.52, y: 0.45, z: 0.0 };
        }
        // Tips near the wrist but thumb and index apart enough to not pinch
        lm[THUMB_TIP] = Landmark { x: 0.42, y: 0.45, z: 0.0 };
        assert_eq!(classify(&lm), GestureKind::ClosedFist);
    }

    #[test]
    fn touching_thumb_and_index_classify_as_pinch() {
        let mut lm = flat_hand();
        lm[THUMB_TIP] = Landmark { x: 0.6, y: 0.4, z: 0.0 };
        lm[INDEX_TIP] = Landmark { x: 0.61, y: 0.41, z: 0.0 };
        assert_eq!(classify(&lm), GestureKind::Pinch);
    }

    #[test]
    fn hand_position_is_mirrored() {
        let mut lm = flat_hand();
        lm[WRIST] = Landmark { x: 0.2, y: 0.7, z: 0.0 };
        let (x, y) = hand_position(&lm);
        assert!((x - 0.8).abs() < 1e-6);
        assert!((y - 0.7).abs() < 1e-6);
    }
}
