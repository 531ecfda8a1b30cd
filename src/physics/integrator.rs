//! Per-frame particle integrator - the hot loop
//!
//! Blends the two targets, applies sway, vortex rotation, jitter, and the
//! idle breathing cue, then rewrites position/color/size buffers in full.
//! All continuous state lives in `IntegratorState`; the buffers never feed
//! back into themselves across frames.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::classifier::HandFrame;
use crate::cloud::PointCloud;

use super::inertia::HandInertia;
use super::sway::Sway;
use super::transition::{Transition, MAX_DT};

/// Below this blend weight the cloud counts as fully reformed
const ACTIVE_BLEND: f32 = 0.01;

/// Velocity gate for rotation and jitter
const ACTIVE_VELOCITY: f32 = 0.01;

/// Radius-dependent rotation phase; winds the spiral instead of rotating rigidly
const RADIAL_PHASE: f32 = 0.05;

/// Particles ease toward the rotated position by blend * this, never snap
const ROTATION_EASE: f32 = 0.8;

/// Jitter amplitude per unit velocity
const JITTER_GAIN: f32 = 0.3;

/// Idle breathing depth oscillation
const BREATH_AMPLITUDE: f32 = 0.05;
const BREATH_FREQUENCY: f32 = 1.5;

/// Every Nth particle sparkles while the cloud moves
const SPARKLE_STRIDE: usize = 10;

/// Sparkle engages above these thresholds
const SPARKLE_BLEND_GATE: f32 = 0.1;
const SPARKLE_VELOCITY_GATE: f32 = 0.1;

/// Additive white boost ceiling (avoids blow-out)
const SPARKLE_CAP: f32 = 1.2;

/// Size gain per unit velocity on sparkling particles
const SIZE_GAIN: f32 = 0.5;

/// Any coordinate beyond this magnitude is treated as a numeric escape
const POSITION_BOUND: f32 = 200.0;

/// All continuous state for one point-cloud session.
///
/// Reset whenever the source image changes.
pub struct IntegratorState {
    transition: Transition,
    inertia: HandInertia,
    sway: Sway,
    elapsed: f32,
    rng: SmallRng,
}

impl IntegratorState {
    pub fn new() -> Self {
        Self {
            transition: Transition::new(),
            inertia: HandInertia::new(),
            sway: Sway::new(),
            elapsed: 0.0,
            rng: SmallRng::seed_from_u64(0x9a1a_c57e),
        }
    }

    #[allow(dead_code)]
    pub fn progress(&self) -> f32 {
        self.transition.progress()
    }

    #[allow(dead_code)]
    pub fn velocity(&self) -> f32 {
        self.inertia.velocity()
    }

    pub fn reset(&mut self) {
        self.transition.reset();
        self.inertia.reset();
        self.sway.reset();
        self.elapsed = 0.0;
    }
}

impl Default for IntegratorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance one frame: update the eased scalars, then rewrite every
/// particle's position, color, and size.
pub fn step(cloud: &mut PointCloud, state: &mut IntegratorState, hand: &HandFrame, dt: f32) {
    let progress = state.transition.update(hand.gesture, dt);
    let blend = state.transition.blend();
    let velocity = state.inertia.update(hand, dt);
    let vortex = state.inertia.vortex_angle();
    let (sway_x, sway_y) = state.sway.update(hand, progress, dt);
    state.elapsed += dt.clamp(0.0, MAX_DT);

    let jitter = velocity * JITTER_GAIN * blend;
    let breath_phase = state.elapsed * BREATH_FREQUENCY;

    for i in 0..cloud.count {
        let j = i * 3;
        let ix = cloud.image_target[j];
        let iy = cloud.image_target[j + 1];
        let iz = cloud.image_target[j + 2];

        let mut x = ix + (cloud.galaxy_target[j] - ix) * blend;
        let mut y = iy + (cloud.galaxy_target[j + 1] - iy) * blend;
        let mut z = iz + (cloud.galaxy_target[j + 2] - iz) * blend;

        if blend > ACTIVE_BLEND {
            x += sway_x * blend;
            y += sway_y * blend;

            if velocity > ACTIVE_VELOCITY {
                // Radius-dependent phase winds the cloud into a spiral.
                let radius = (x * x + z * z).sqrt();
                let (sin, cos) = (vortex - radius * RADIAL_PHASE).sin_cos();
                let rx = x * cos - z * sin;
                let rz = x * sin + z * cos;
                let ease = blend * ROTATION_EASE;
                x += (rx - x) * ease;
                z += (rz - z) * ease;
            }

            if jitter > ACTIVE_VELOCITY {
                x += (state.rng.gen::<f32>() - 0.5) * jitter;
                y += (state.rng.gen::<f32>() - 0.5) * jitter;
                z += (state.rng.gen::<f32>() - 0.5) * jitter;
            }
        } else {
            // Idle breathing on the depth axis, phase-shifted per particle.
            z += (breath_phase + ix).sin() * BREATH_AMPLITUDE;
        }

        cloud.current[j] = bounded(x, ix);
        cloud.current[j + 1] = bounded(y, iy);
        cloud.current[j + 2] = bounded(z, iz);
    }

    // Color and size are always recomputed from the immutable base buffers.
    // Feeding last frame's color back in would compound the boost unboundedly.
    let sparkling = blend > SPARKLE_BLEND_GATE && velocity > SPARKLE_VELOCITY_GATE;
    let boost = (velocity * blend).min(SPARKLE_CAP);

    for i in 0..cloud.count {
        let j = i * 3;
        let mut r = cloud.base_color[j];
        let mut g = cloud.base_color[j + 1];
        let mut b = cloud.base_color[j + 2];
        let mut size = cloud.base_size[i];

        if sparkling && i % SPARKLE_STRIDE == 0 {
            r += boost;
            g += boost;
            b += boost;
            size *= 1.0 + velocity * SIZE_GAIN;
        }

        cloud.color[j] = r;
        cloud.color[j + 1] = g;
        cloud.color[j + 2] = b;
        cloud.size[i] = size;
    }
}

/// Safety bound: a non-finite or runaway coordinate falls back to the
/// particle's image-target coordinate for that axis.
fn bounded(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value.abs() <= POSITION_BOUND {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GestureKind;
    use crate::cloud::{build_from_pixels, PixelGrid};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn white_cloud(cols: usize, rows: usize) -> PointCloud {
        let grid = PixelGrid {
            cols,
            rows,
            rgba: vec![255u8; cols * rows * 4],
        };
        build_from_pixels(&grid, &mut SmallRng::seed_from_u64(2))
    }

    const NO_HAND: HandFrame = HandFrame {
        gesture: GestureKind::None,
        x: 0.0,
        y: 0.0,
        detected: false,
    };

    fn open_palm_at(x: f32, y: f32) -> HandFrame {
        HandFrame {
            gesture: GestureKind::OpenPalm,
            x,
            y,
            detected: true,
        }
    }

    #[test]
    fn reformed_cloud_sits_on_image_targets_with_breathing_depth() {
        let mut cloud = white_cloud(2, 2);
        let mut state = IntegratorState::new();
        let fist = HandFrame {
            gesture: GestureKind::ClosedFist,
            ..NO_HAND
        };

        step(&mut cloud, &mut state, &fist, 0.016);

        for i in 0..cloud.count {
            let j = i * 3;
            assert_eq!(cloud.current[j], cloud.image_target[j]);
            assert_eq!(cloud.current[j + 1], cloud.image_target[j + 1]);
            let depth_offset = cloud.current[j + 2] - cloud.image_target[j + 2];
            assert!(depth_offset.abs() <= BREATH_AMPLITUDE + 1e-6);
        }
    }

    #[test]
    fn color_output_is_idempotent_at_rest() {
        let mut cloud = white_cloud(4, 4);
        let mut state = IntegratorState::new();

        step(&mut cloud, &mut state, &NO_HAND, 0.016);
        let first = cloud.color.clone();
        let first_size = cloud.size.clone();

        // Poison the working buffers: the next step must not read them.
        cloud.color.iter_mut().for_each(|c| *c = 9999.0);
        cloud.size.iter_mut().for_each(|s| *s = 9999.0);

        for _ in 0..10 {
            step(&mut cloud, &mut state, &NO_HAND, 0.016);
        }
        assert_eq!(cloud.color, first);
        assert_eq!(cloud.size, first_size);
    }

    #[test]
    fn non_finite_target_is_contained_to_its_particle() {
        let mut cloud = white_cloud(3, 3);
        let mut state = IntegratorState::new();

        // Disperse far enough that the galaxy target contributes.
        for _ in 0..120 {
            step(&mut cloud, &mut state, &open_palm_at(0.5, 0.5), 0.016);
        }

        cloud.galaxy_target[3] = f32::NAN;
        cloud.galaxy_target[4] = f32::INFINITY;
        cloud.galaxy_target[5] = f32::NAN;
        step(&mut cloud, &mut state, &open_palm_at(0.5, 0.5), 0.016);

        // Affected particle falls back to its image target on every axis.
        assert_eq!(cloud.current[3], cloud.image_target[3]);
        assert_eq!(cloud.current[4], cloud.image_target[4]);
        assert_eq!(cloud.current[5], cloud.image_target[5]);
        // Neighbors stay finite and bounded.
        for (i, v) in cloud.current.iter().enumerate() {
            if !(3..6).contains(&i) {
                assert!(v.is_finite() && v.abs() <= POSITION_BOUND);
            }
        }
    }

    #[test]
    fn dispersal_moves_particles_off_the_image_plane() {
        let mut cloud = white_cloud(3, 3);
        let mut state = IntegratorState::new();

        for _ in 0..200 {
            step(&mut cloud, &mut state, &open_palm_at(0.5, 0.5), 0.016);
        }
        assert!(state.progress() > 0.9);

        let mut moved = 0;
        for i in 0..cloud.count {
            let j = i * 3;
            let dx = cloud.current[j] - cloud.image_target[j];
            let dz = cloud.current[j + 2] - cloud.image_target[j + 2];
            if (dx * dx + dz * dz).sqrt() > 1.0 {
                moved += 1;
            }
        }
        // The galaxy band overlaps the image plane edge, so allow a stray.
        assert!(moved >= cloud.count - 1);
    }

    #[test]
    fn sparkle_boosts_only_the_stride_particles() {
        let mut cloud = white_cloud(5, 4);
        let mut state = IntegratorState::new();

        // Disperse, then wave the hand to build velocity.
        let mut x: f32 = 0.1;
        for _ in 0..200 {
            x += 0.015;
            step(&mut cloud, &mut state, &open_palm_at(x.fract(), 0.5), 0.016);
        }
        assert!(state.velocity() > SPARKLE_VELOCITY_GATE);

        for i in 0..cloud.count {
            let j = i * 3;
            if i % SPARKLE_STRIDE == 0 {
                assert!(cloud.color[j] > cloud.base_color[j]);
                assert!(cloud.size[i] > cloud.base_size[i]);
            } else {
                assert_eq!(cloud.color[j], cloud.base_color[j]);
                assert_eq!(cloud.size[i], cloud.base_size[i]);
            }
        }
    }

    #[test]
    fn all_outputs_bounded_under_extreme_dt() {
        let mut cloud = white_cloud(4, 4);
        let mut state = IntegratorState::new();
        for i in 0..50 {
            let hand = open_palm_at((i as f32 * 0.37).fract(), (i as f32 * 0.73).fract());
            step(&mut cloud, &mut state, &hand, 1000.0);
        }
        for v in cloud.current.iter() {
            assert!(v.is_finite() && v.abs() <= POSITION_BOUND);
        }
    }
}
