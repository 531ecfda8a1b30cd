//! Renderer module - WebGPU particle rendering
//!
//! Re-exports only. All logic in submodules.

mod camera;
mod points;
mod state;

pub use camera::{Camera, CameraUniform};
pub use points::{render_cloud, ParticleInstance};
pub use state::{initialize_gpu, GpuStateError};
