//! Cloud module - point-cloud geometry construction
//!
//! Re-exports only. All logic in submodules.

mod builder;
mod galaxy;
mod loader;

pub use builder::{
    build_fallback, build_from_pixels, fit_grid, PixelGrid, PointCloud, PARTICLE_COUNT,
};
pub use galaxy::{fill_fallback_shape, fill_galaxy_target};
pub use loader::build_from_url;
