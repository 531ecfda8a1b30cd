//! Hand-motion inertia - velocity easing and vortex spin accumulation
//!
//! Velocity is derived from hand displacement, not gesture. Asymmetric
//! friction: the cloud spins up with some lag but stops quickly when the
//! hand does.

use crate::classifier::HandFrame;

use super::transition::MAX_DT;

/// Raw hand speed ceiling (normalized screen units per second)
const SPEED_CAP: f32 = 5.0;

/// Hand speed to target velocity gain
const SPEED_GAIN: f32 = 1.5;

/// Easing factor while accelerating
const ACCEL_FACTOR: f32 = 2.0;

/// Easing factor while decelerating (quick stop)
const DECEL_FACTOR: f32 = 4.0;

/// Velocity below this snaps to zero (anti-jitter dead zone)
const DEAD_ZONE: f32 = 0.01;

/// Hard ceiling on eased velocity
const VELOCITY_CAP: f32 = 3.0;

/// Vortex spin state driven by hand motion
pub struct HandInertia {
    velocity: f32,
    vortex_angle: f32,
    /// Reference position from the previous detected frame; None when the
    /// hand was not detected, so a reappearing hand cannot produce a
    /// spurious first-frame velocity spike.
    prev_pos: Option<(f32, f32)>,
}

impl HandInertia {
    pub fn new() -> Self {
        Self {
            velocity: 0.0,
            vortex_angle: 0.0,
            prev_pos: None,
        }
    }

    /// Advance one frame; returns the eased velocity
    pub fn update(&mut self, hand: &HandFrame, dt: f32) -> f32 {
        let dt = dt.clamp(0.0, MAX_DT);

        let target = if hand.detected {
            let pos = (hand.x, hand.y);
            let target = match self.prev_pos {
                Some(prev) if dt > 0.0 => {
                    let dx = pos.0 - prev.0;
                    let dy = pos.1 - prev.1;
                    let speed = ((dx * dx + dy * dy).sqrt() / dt).min(SPEED_CAP);
                    speed * SPEED_GAIN
                }
                // Newly detected: reset the reference, no velocity yet.
                _ => 0.0,
            };
            self.prev_pos = Some(pos);
            target
        } else {
            self.prev_pos = None;
            0.0
        };

        let factor = if target < self.velocity { DECEL_FACTOR } else { ACCEL_FACTOR };
        self.velocity += (target - self.velocity) * dt * factor;

        if !self.velocity.is_finite() {
            self.velocity = 0.0;
        }
        if self.velocity < DEAD_ZONE {
            self.velocity = 0.0;
        }
        self.velocity = self.velocity.min(VELOCITY_CAP);

        // Spin only advances while there is inertia.
        self.vortex_angle += self.velocity * dt;

        self.velocity
    }

    #[allow(dead_code)]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn vortex_angle(&self) -> f32 {
        self.vortex_angle
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for HandInertia {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GestureKind;

    fn hand_at(x: f32, y: f32) -> HandFrame {
        HandFrame {
            gesture: GestureKind::OpenPalm,
            x,
            y,
            detected: true,
        }
    }

    const NO_HAND: HandFrame = HandFrame {
        gesture: GestureKind::None,
        x: 0.0,
        y: 0.0,
        detected: false,
    };

    #[test]
    fn first_detected_frame_produces_no_velocity() {
        let mut inertia = HandInertia::new();
        assert_eq!(inertia.update(&hand_at(0.9, 0.9), 0.016), 0.0);
    }

    #[test]
    fn reappearing_hand_does_not_spike() {
        let mut inertia = HandInertia::new();
        inertia.update(&hand_at(0.1, 0.1), 0.016);
        inertia.update(&NO_HAND, 0.016);
        // Hand jumps across the screen while undetected; no spike allowed.
        let v = inertia.update(&hand_at(0.9, 0.9), 0.016);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn sustained_motion_spins_the_vortex() {
        let mut inertia = HandInertia::new();
        let mut x = 0.0;
        for _ in 0..60 {
            x += 0.02;
            inertia.update(&hand_at(x, 0.5), 0.016);
        }
        assert!(inertia.velocity() > 0.5);
        assert!(inertia.vortex_angle() > 0.0);
        assert!(inertia.velocity() <= VELOCITY_CAP);
    }

    #[test]
    fn velocity_decays_to_exact_zero_when_hand_stops() {
        let mut inertia = HandInertia::new();
        let mut x = 0.0;
        for _ in 0..30 {
            x += 0.02;
            inertia.update(&hand_at(x, 0.5), 0.016);
        }
        let angle_moving = inertia.vortex_angle();
        for _ in 0..300 {
            inertia.update(&hand_at(x, 0.5), 0.016);
        }
        assert_eq!(inertia.velocity(), 0.0);
        // Stopped velocity means the vortex angle froze.
        let frozen = inertia.vortex_angle();
        inertia.update(&hand_at(x, 0.5), 0.016);
        assert_eq!(inertia.vortex_angle(), frozen);
        assert!(frozen > angle_moving);
    }
}
