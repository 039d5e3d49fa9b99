//! Simulation drivers that sweep a body through interpolated states and
//! record the resulting flux series.

pub mod light_curve;

pub use light_curve::{
    run, run_parallel, run_with_observer, LightCurve, LightCurveSample, RunConfig,
    SimulationError, StepObserver,
};
