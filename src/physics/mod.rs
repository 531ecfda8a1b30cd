//! Physics module - per-frame continuous state and the particle integrator
//!
//! Re-exports only. All logic in submodules.

mod inertia;
mod integrator;
mod sway;
mod transition;

pub use inertia::HandInertia;
pub use integrator::{step, IntegratorState};
pub use sway::Sway;
pub use transition::{smoothstep, Transition, MAX_DT};
