//! Dispersed-shape synthesis - spiral galaxy target and procedural fallback
//!
//! Both shapes are independent of image content and always well-defined.

use std::f32::consts::TAU;

use rand::Rng;

/// Galaxy radius band
const RADIUS_MIN: f32 = 5.0;
const RADIUS_MAX: f32 = 35.0;

/// Number of evenly spaced spiral arms
const ARM_COUNT: u32 = 3;

/// How much the spiral winds per unit radius
const ARM_TWIST: f32 = 0.5;

/// Vertical thickness: base spread plus a radius-proportional term
const THICKNESS_BASE: f32 = 10.0;
const THICKNESS_PER_RADIUS: f32 = 0.2;

/// Fallback cone dimensions (matches the image plane's vertical band)
const CONE_HEIGHT: f32 = 18.0;
const CONE_RADIUS: f32 = 8.0;
const CONE_LIFT: f32 = 2.0;

/// Fill `target` (xyz per particle) with spiral-galaxy positions
pub fn fill_galaxy_target<R: Rng>(target: &mut [f32], rng: &mut R) {
    for chunk in target.chunks_exact_mut(3) {
        let angle = rng.gen_range(0.0..TAU);
        let radius = rng.gen_range(RADIUS_MIN..RADIUS_MAX);
        let arm = rng.gen_range(0..ARM_COUNT) as f32;
        let final_angle = angle + radius * ARM_TWIST + arm * TAU / ARM_COUNT as f32;
        let spread = rng.gen_range(-0.5..0.5);

        chunk[0] = final_angle.cos() * radius;
        chunk[1] = spread * (THICKNESS_BASE + radius * THICKNESS_PER_RADIUS);
        chunk[2] = final_angle.sin() * radius;
    }
}

/// Fill position and color buffers with the procedural fallback shape:
/// a tapered vertical cone in warm tones. Used when no image is available.
pub fn fill_fallback_shape<R: Rng>(position: &mut [f32], color: &mut [f32], rng: &mut R) {
    for (pos, col) in position
        .chunks_exact_mut(3)
        .zip(color.chunks_exact_mut(3))
    {
        let h = rng.gen_range(0.0..1.0f32);
        // Radius shrinks toward the top; sqrt keeps radial density even.
        let radius = (1.0 - h) * CONE_RADIUS * rng.gen_range(0.0..1.0f32).sqrt();
        let angle = rng.gen_range(0.0..TAU);

        pos[0] = angle.cos() * radius;
        pos[1] = (h - 0.5) * CONE_HEIGHT + CONE_LIFT;
        pos[2] = angle.sin() * radius;

        col[0] = rng.gen_range(0.85..1.0);
        col[1] = rng.gen_range(0.45..0.75);
        col[2] = rng.gen_range(0.15..0.35);
    }
}
