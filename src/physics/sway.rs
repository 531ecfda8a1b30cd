//! Sway - the dispersed cloud drifts toward the hand's screen position

use crate::classifier::HandFrame;

use super::transition::MAX_DT;

/// Screen offset to world offset gain
const SWAY_GAIN: f32 = 25.0;

/// Easing rate, independent of the velocity easing
const SWAY_FACTOR: f32 = 3.0;

/// Transition progress must exceed this before sway engages
const SWAY_PROGRESS_GATE: f32 = 0.1;

/// Eased 2D drift applied to the dispersed cloud
pub struct Sway {
    current: (f32, f32),
}

impl Sway {
    pub fn new() -> Self {
        Self { current: (0.0, 0.0) }
    }

    /// Ease toward the hand position while dispersed and tracked,
    /// back toward center otherwise.
    pub fn update(&mut self, hand: &HandFrame, progress: f32, dt: f32) -> (f32, f32) {
        let target = if progress > SWAY_PROGRESS_GATE && hand.detected {
            ((hand.x - 0.5) * SWAY_GAIN, -(hand.y - 0.5) * SWAY_GAIN)
        } else {
            (0.0, 0.0)
        };

        let dt = dt.clamp(0.0, MAX_DT);
        self.current.0 += (target.0 - self.current.0) * dt * SWAY_FACTOR;
        self.current.1 += (target.1 - self.current.1) * dt * SWAY_FACTOR;
        self.current
    }

    #[allow(dead_code)]
    pub fn vector(&self) -> (f32, f32) {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = (0.0, 0.0);
    }
}

impl Default for Sway {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GestureKind;

    #[test]
    fn sway_pulls_toward_hand_only_when_dispersed() {
        let hand = HandFrame {
            gesture: GestureKind::OpenPalm,
            x: 1.0,
            y: 0.0,
            detected: true,
        };

        let mut sway = Sway::new();
        // Reformed cloud: gate closed, stays centered.
        sway.update(&hand, 0.0, 0.016);
        assert_eq!(sway.vector(), (0.0, 0.0));

        for _ in 0..600 {
            sway.update(&hand, 1.0, 0.016);
        }
        let (x, y) = sway.vector();
        assert!((x - 12.5).abs() < 0.5);
        assert!((y - 12.5).abs() < 0.5);
    }

    #[test]
    fn sway_relaxes_when_tracking_drops() {
        let hand = HandFrame {
            gesture: GestureKind::OpenPalm,
            x: 1.0,
            y: 1.0,
            detected: true,
        };
        let mut sway = Sway::new();
        for _ in 0..100 {
            sway.update(&hand, 1.0, 0.016);
        }
        assert!(sway.vector().0.abs() > 1.0);

        let lost = HandFrame { detected: false, ..hand };
        for _ in 0..600 {
            sway.update(&lost, 1.0, 0.016);
        }
        assert!(sway.vector().0.abs() < 0.1);
    }
}
