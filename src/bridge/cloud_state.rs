//! Cloud session and frame loop bridge
//!
//! Owns the live point cloud plus its integrator state and drives one
//! integration + draw per render frame. Image builds run async via
//! `spawn_local` and install their result here when they settle.

use std::cell::{Cell, RefCell};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::cloud::{self, PointCloud, PARTICLE_COUNT};
use crate::physics::{self, IntegratorState};
use crate::renderer;

use super::hand_landmarks::latest_hand_frame;

/// One active point cloud plus all of its continuous state
struct CloudSession {
    cloud: PointCloud,
    state: IntegratorState,
}

thread_local! {
    static SESSION: RefCell<Option<CloudSession>> = const { RefCell::new(None) };
    /// Previous frame timestamp in seconds; 0 means no frame yet
    static LAST_TICK: Cell<f64> = const { Cell::new(0.0) };
}

/// Replace the active session; integrator state resets with the new image
fn install_cloud(cloud: PointCloud) {
    SESSION.with(|session_cell| {
        *session_cell.borrow_mut() = Some(CloudSession {
            cloud,
            state: IntegratorState::new(),
        });
    });
}

/// Install the procedural fallback so the scene is never empty before the
/// first image request resolves.
pub fn install_fallback_cloud() {
    let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
    install_cloud(cloud::build_fallback(PARTICLE_COUNT, &mut rng));
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start an async build for the given image URL. The frame loop keeps
/// running on the previous cloud until the build settles; failures fall
/// back to the procedural shape inside the loader.
#[wasm_bindgen]
pub fn load_image(url: String) {
    spawn_local(async move {
        let cloud = cloud::build_from_url(&url).await;
        web_sys::console::log_1(&format!("Point cloud ready: {} particles", cloud.count).into());
        install_cloud(cloud);
    });
}

// ============================================================================
// FRAME LOOP
// ============================================================================

/// Advance one frame: integrate with the latest stabilized hand frame,
/// then upload and draw.
pub fn frame_tick() {
    let now = js_sys::Date::now() / 1000.0;
    let last = LAST_TICK.with(|t| t.replace(now));
    let dt = if last > 0.0 { (now - last) as f32 } else { 0.0 };

    let hand = latest_hand_frame();

    SESSION.with(|session_cell| {
        let mut session_ref = session_cell.borrow_mut();
        let session = match session_ref.as_mut() {
            Some(s) => s,
            None => return,
        };

        physics::step(&mut session.cloud, &mut session.state, &hand, dt);
        renderer::render_cloud(&session.cloud, hand.gesture, dt);
    });
}
