//! Morph transition easing - photo form to galaxy form and back
//!
//! Exponential approach with asymmetric speed: reforming the photo is
//! snappier than dispersing it.

use crate::classifier::GestureKind;

/// Easing rate while opening (dispersing into the galaxy)
const OPEN_SPEED: f32 = 1.5;

/// Easing rate while closing (reforming the photo)
const CLOSE_SPEED: f32 = 2.5;

/// Progress below this snaps to exactly 0, ending residual motion
const SNAP_EPSILON: f32 = 0.001;

/// Single-step dt bound; protects every eased quantity from frame hitches
pub const MAX_DT: f32 = 0.05;

/// Transition progress in [0, 1]: 0 = photo form, 1 = fully dispersed
pub struct Transition {
    progress: f32,
}

impl Transition {
    pub fn new() -> Self {
        Self { progress: 0.0 }
    }

    /// Advance toward the gesture's target form
    ///
    /// Only an open palm disperses; fist, pinch, and no-hand all converge
    /// back to the photographic form.
    pub fn update(&mut self, gesture: GestureKind, dt: f32) -> f32 {
        let target = if gesture == GestureKind::OpenPalm { 1.0 } else { 0.0 };
        let speed = if target > self.progress { OPEN_SPEED } else { CLOSE_SPEED };

        self.progress += (target - self.progress) * dt.clamp(0.0, MAX_DT) * speed;
        self.progress = self.progress.clamp(0.0, 1.0);
        if self.progress < SNAP_EPSILON {
            self.progress = 0.0;
        }
        self.progress
    }

    #[allow(dead_code)]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Blend weight for geometry: cubic Hermite ease of the raw progress
    pub fn blend(&self) -> f32 {
        smoothstep(self.progress)
    }

    pub fn reset(&mut self) {
        self.progress = 0.0;
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new()
    }
}

/// Cubic Hermite ease: 3t^2 - 2t^3
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GestureKind::*;

    #[test]
    fn progress_stays_bounded_for_any_dt_and_gesture() {
        let mut tr = Transition::new();
        let gestures = [OpenPalm, ClosedFist, Pinch, None, OpenPalm];
        for (i, dt) in [0.0, 0.016, 0.1, 5.0, 1000.0].iter().enumerate() {
            for _ in 0..100 {
                let p = tr.update(gestures[i % gestures.len()], *dt);
                assert!((0.0..=1.0).contains(&p));
            }
        }
    }

    #[test]
    fn open_palm_disperses_and_fist_reforms() {
        let mut tr = Transition::new();
        for _ in 0..200 {
            tr.update(OpenPalm, 0.016);
        }
        assert!(tr.progress() > 0.9);
        for _ in 0..400 {
            tr.update(ClosedFist, 0.016);
        }
        assert_eq!(tr.progress(), 0.0, "residual progress must snap to zero");
    }

    #[test]
    fn closing_is_faster_than_opening() {
        let mut opening = Transition::new();
        opening.update(OpenPalm, 0.02);
        let opened = opening.progress();

        let mut closing = Transition { progress: 1.0 };
        closing.update(ClosedFist, 0.02);
        let closed_delta = 1.0 - closing.progress();
        assert!(closed_delta > opened);
    }

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smoothstep(2.0), 1.0);
    }
}
