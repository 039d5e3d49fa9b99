//! Eclipsing two-body light curve simulation
//!
//! This crate models the photometric light curve produced by two elliptical
//! bodies moving relative to each other. One body may carry a radial
//! limb-darkening brightness profile, represented as a stack of concentric
//! elliptical annuli with per-annulus brightness. Eclipses are computed with
//! exact polygon geometry: the flux blocked by the occulting body is the area
//! of the set difference between each annulus and the occulter's outer
//! silhouette.
//!
//! The crate is fully headless. Visualization and frame export consume the
//! per-step region decompositions and the recorded flux series but are never
//! required by the simulation core.

pub mod algo;
pub mod body;
pub mod geometry;
pub mod sims;
pub mod system;

// Re-exports for easier access
pub use body::{Body, Brightness, Layer};
pub use geometry::{ConvexPolygon, Region};
pub use sims::{run, run_parallel, run_with_observer, LightCurve, RunConfig, StepObserver};
pub use system::{Binary, Role};
