//! Point-cloud construction from a rasterized source image
//!
//! One particle per grid pixel. Builds the image-shape target plus base
//! color/size, pairs it with the image-independent galaxy target, and
//! sanitizes everything so the renderer never sees a non-finite value.

use rand::Rng;

use super::galaxy;

/// Total particle budget; the sampling grid is fit to approximately this count
pub const PARTICLE_COUNT: usize = 25_000;

/// World-space height of the image plane
const SCALE_Y: f32 = 18.0;

/// Vertical offset lifting the image above the origin
const LIFT: f32 = 2.0;

/// Pixel brightness maps to this much depth
const DEPTH_SCALE: f32 = 3.0;

/// Pixels with alpha below this render as invisible (size 0) particles
const ALPHA_VISIBLE: u8 = 50;

/// Base particle size band
const SIZE_MIN: f32 = 0.1;
const SIZE_MAX: f32 = 0.5;

/// A source image rasterized down to one RGBA pixel per particle
pub struct PixelGrid {
    pub cols: usize,
    pub rows: usize,
    /// RGBA bytes, row-major, length = cols * rows * 4
    pub rgba: Vec<u8>,
}

/// All per-particle buffers for one session
///
/// The target and base buffers are immutable after construction; only the
/// integrator writes `current`, `color`, and `size`. Color is always
/// recomputed from `base_color`, never from the previous frame's `color`,
/// which is what keeps additive effects from compounding across frames.
pub struct PointCloud {
    pub count: usize,
    /// Live positions, xyz per particle
    pub current: Vec<f32>,
    /// Working color, rewritten in full every frame
    pub color: Vec<f32>,
    /// Working size, rewritten in full every frame
    pub size: Vec<f32>,
    pub(crate) image_target: Vec<f32>,
    pub(crate) galaxy_target: Vec<f32>,
    pub(crate) base_color: Vec<f32>,
    pub(crate) base_size: Vec<f32>,
}

/// Choose a cols x rows sampling grid preserving the image aspect ratio
/// with cols * rows close to the particle budget.
pub fn fit_grid(image_width: u32, image_height: u32, budget: usize) -> (usize, usize) {
    let aspect = image_width.max(1) as f32 / image_height.max(1) as f32;
    let cols = ((budget as f32 * aspect).sqrt().round() as usize).max(1);
    let rows = ((budget as f32 / cols as f32).round() as usize).max(1);
    (cols, rows)
}

/// Build a complete point cloud from a rasterized image
pub fn build_from_pixels<R: Rng>(pixels: &PixelGrid, rng: &mut R) -> PointCloud {
    let cols = pixels.cols.max(1);
    let rows = pixels.rows.max(1);
    let count = cols * rows;

    let mut image_target = vec![0.0f32; count * 3];
    let mut base_color = vec![0.0f32; count * 3];
    let mut base_size = vec![0.0f32; count];

    let scale_x = SCALE_Y * (cols as f32 / rows as f32);

    for row in 0..rows {
        for col in 0..cols {
            let i = row * cols + col;
            let px = i * 4;
            let (r, g, b, a) = if px + 3 < pixels.rgba.len() {
                (
                    pixels.rgba[px] as f32 / 255.0,
                    pixels.rgba[px + 1] as f32 / 255.0,
                    pixels.rgba[px + 2] as f32 / 255.0,
                    pixels.rgba[px + 3],
                )
            } else {
                (0.0, 0.0, 0.0, 0)
            };

            let brightness = (r + g + b) / 3.0;
            image_target[i * 3] = (col as f32 / cols as f32 - 0.5) * scale_x;
            image_target[i * 3 + 1] = (0.5 - row as f32 / rows as f32) * SCALE_Y + LIFT;
            image_target[i * 3 + 2] = brightness * DEPTH_SCALE;

            base_color[i * 3] = r;
            base_color[i * 3 + 1] = g;
            base_color[i * 3 + 2] = b;

            // Invisible particles keep their slot so index correspondence
            // with the galaxy target survives.
            base_size[i] = if a < ALPHA_VISIBLE {
                0.0
            } else {
                rng.gen_range(SIZE_MIN..SIZE_MAX)
            };
        }
    }

    assemble(count, image_target, base_color, base_size, rng)
}

/// Build the procedural fallback cloud (no image available)
///
/// Replaces only the image-shape target and colors; the galaxy target is
/// computed identically either way.
pub fn build_fallback<R: Rng>(count: usize, rng: &mut R) -> PointCloud {
    let count = count.max(1);
    let mut image_target = vec![0.0f32; count * 3];
    let mut base_color = vec![0.0f32; count * 3];
    let mut base_size = vec![0.0f32; count];

    galaxy::fill_fallback_shape(&mut image_target, &mut base_color, rng);
    for s in base_size.iter_mut() {
        *s = rng.gen_range(SIZE_MIN..SIZE_MAX);
    }

    assemble(count, image_target, base_color, base_size, rng)
}

fn assemble<R: Rng>(
    count: usize,
    mut image_target: Vec<f32>,
    mut base_color: Vec<f32>,
    mut base_size: Vec<f32>,
    rng: &mut R,
) -> PointCloud {
    let mut galaxy_target = vec![0.0f32; count * 3];
    galaxy::fill_galaxy_target(&mut galaxy_target, rng);

    sanitize(&mut image_target);
    sanitize(&mut galaxy_target);
    sanitize(&mut base_color);
    sanitize(&mut base_size);

    PointCloud {
        count,
        current: image_target.clone(),
        color: base_color.clone(),
        size: base_size.clone(),
        image_target,
        galaxy_target,
        base_color,
        base_size,
    }
}

/// Replace any non-finite component with 0
fn sanitize(buf: &mut [f32]) {
    for v in buf.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
}
