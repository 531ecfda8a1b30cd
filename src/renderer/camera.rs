//! Camera - per-gesture distance presets and view-projection math

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

use crate::classifier::GestureKind;
use crate::physics::MAX_DT;

/// Camera distance presets per confirmed gesture
const DISTANCE_DEFAULT: f32 = 40.0;
const DISTANCE_OPEN: f32 = 50.0;
const DISTANCE_PINCH: f32 = 18.0;

/// Dolly easing rate
const DOLLY_FACTOR: f32 = 2.0;

const EYE_HEIGHT: f32 = 5.0;
const LOOK_AT_HEIGHT: f32 = 2.0;
const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 500.0;

/// Uniform data consumed by the particle shader: view-projection plus the
/// camera's world-space right/up axes for billboard expansion.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
}

/// Orbiting dolly camera; zoom presets follow the confirmed gesture
pub struct Camera {
    distance: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            distance: DISTANCE_DEFAULT,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
        }
    }

    fn preset(gesture: GestureKind) -> f32 {
        match gesture {
            GestureKind::OpenPalm => DISTANCE_OPEN,
            GestureKind::Pinch => DISTANCE_PINCH,
            GestureKind::ClosedFist | GestureKind::None => DISTANCE_DEFAULT,
        }
    }

    /// Ease the dolly toward the gesture's preset distance
    pub fn update(&mut self, gesture: GestureKind, dt: f32) {
        let target = Self::preset(gesture);
        self.distance += (target - self.distance) * dt.clamp(0.0, MAX_DT) * DOLLY_FACTOR;
    }

    #[allow(dead_code)]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = Point3::new(0.0, EYE_HEIGHT, self.distance);
        let target = Point3::new(0.0, LOOK_AT_HEIGHT, 0.0);
        let view = Matrix4::look_at_rh(&eye, &target, &Vector3::y());
        let proj = Perspective3::new(self.aspect, FOV_Y, Z_NEAR, Z_FAR).to_homogeneous();
        let view_proj: [[f32; 4]; 4] = (proj * view).into();

        // Rows of the view rotation are the camera axes in world space.
        let right = [view[(0, 0)], view[(0, 1)], view[(0, 2)], 0.0];
        let up = [view[(1, 0)], view[(1, 1)], view[(1, 2)], 0.0];

        CameraUniform {
            view_proj,
            right,
            up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinch_dollies_in_and_release_returns() {
        let mut cam = Camera::new(16.0 / 9.0);
        for _ in 0..600 {
            cam.update(GestureKind::Pinch, 0.016);
        }
        assert!((cam.distance() - DISTANCE_PINCH).abs() < 1.0);

        for _ in 0..600 {
            cam.update(GestureKind::None, 0.016);
        }
        assert!((cam.distance() - DISTANCE_DEFAULT).abs() < 1.0);
    }

    #[test]
    fn billboard_axes_are_unit_length_and_orthogonal() {
        let cam = Camera::new(1.0);
        let u = cam.uniform();
        let dot: f32 = (0..3).map(|i| u.right[i] * u.up[i]).sum();
        let len_r: f32 = (0..3).map(|i| u.right[i] * u.right[i]).sum::<f32>().sqrt();
        let len_u: f32 = (0..3).map(|i| u.up[i] * u.up[i]).sum::<f32>().sqrt();
        assert!(dot.abs() < 1e-4);
        assert!((len_r - 1.0).abs() < 1e-4);
        assert!((len_u - 1.0).abs() < 1e-4);
    }
}
