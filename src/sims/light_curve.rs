//! Light curve simulation driver.
//!
//! A run sweeps one body of a [`Binary`] through linearly interpolated
//! position and orientation samples between its current state and a target,
//! recomputing the total system flux at every step. The run is a single
//! synchronous pass: preconditions are checked before any mutation, the
//! sample series is returned in full, and the mover is left at the target so
//! a following run continues from where this one ended.

use log::{debug, info};
use nalgebra::Point2;
use rayon::prelude::*;
use std::io::Write;
use thiserror::Error;

use crate::algo::linspace;
use crate::body::BodyError;
use crate::system::{Binary, Role};

/// Errors raised by a simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("step count must be at least 1, got {0}")]
    InvalidStepCount(usize),
    #[error(transparent)]
    Body(#[from] BodyError),
}

/// Parameters of one simulation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Which body moves during the run
    pub mover: Role,
    /// Position the mover ends at
    pub target_position: Point2<f64>,
    /// Orientation in degrees the mover ends at
    pub target_orientation_deg: f64,
    /// Number of time samples, including both endpoints; must be at least 1
    pub steps: usize,
}

/// One recorded time sample: step index and total system flux.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCurveSample {
    pub step: usize,
    pub flux: f64,
}

/// The recorded flux series of one run, ordered by step index.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    samples: Vec<LightCurveSample>,
}

impl LightCurve {
    pub fn samples(&self) -> &[LightCurveSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest flux in the series, the bottom of the eclipse dip.
    pub fn min_flux(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|sample| sample.flux)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Largest flux in the series.
    pub fn max_flux(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|sample| sample.flux)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Write the series as CSV with a `step,flux` header.
    pub fn write_csv<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "step,flux")?;
        for sample in &self.samples {
            writeln!(writer, "{},{:.9}", sample.step, sample.flux)?;
        }
        Ok(())
    }
}

/// Per-step notification hook for progress reporting and frame export.
///
/// Invoked once per completed step, after the mover has been placed and the
/// flux for that step recorded. The system reference exposes the bodies at
/// their in-step state, so an exporter can derive the region decompositions
/// for rendering; the core itself never prints or draws.
pub trait StepObserver {
    fn on_step(&mut self, step: usize, total_steps: usize, system: &Binary, flux: f64);
}

impl<F: FnMut(usize, usize, &Binary, f64)> StepObserver for F {
    fn on_step(&mut self, step: usize, total_steps: usize, system: &Binary, flux: f64) {
        self(step, total_steps, system, flux)
    }
}

/// Run a simulation without progress notifications.
pub fn run(system: &mut Binary, config: &RunConfig) -> Result<LightCurve, SimulationError> {
    run_with_observer(system, config, &mut |_: usize, _: usize, _: &Binary, _: f64| {})
}

/// Run a simulation, notifying the observer once per step.
///
/// The mover's state is set absolutely at each sample (first sample equals
/// the current state, last equals the target; a single-step run jumps
/// straight to the target), and the total flux is recorded after each move.
/// An invalid step count is rejected before anything is mutated.
pub fn run_with_observer(
    system: &mut Binary,
    config: &RunConfig,
    observer: &mut dyn StepObserver,
) -> Result<LightCurve, SimulationError> {
    let waypoints = interpolate_states(system, config)?;
    info!(
        "starting {}-step eclipse run toward ({:.3}, {:.3})",
        config.steps, config.target_position.x, config.target_position.y
    );

    let mut samples = Vec::with_capacity(config.steps);
    for (step, &(position, orientation_deg)) in waypoints.iter().enumerate() {
        let mover = system.body_mut(config.mover);
        mover.move_to(position);
        mover.rotate_to(orientation_deg);

        let flux = system.total_flux()?;
        samples.push(LightCurveSample { step, flux });
        debug!("step {}/{}: flux {:.6}", step + 1, config.steps, flux);
        observer.on_step(step, config.steps, system, flux);
    }

    Ok(LightCurve { samples })
}

/// Run a simulation with the per-step flux evaluations spread across the
/// rayon thread pool.
///
/// The interpolated states are snapshotted up front, each step evaluates on
/// its own clone of the system, and the samples are collated back into step
/// order, so the result and the final mover state match the serial run
/// exactly. No observer is supported; ordering only exists after collation.
pub fn run_parallel(system: &mut Binary, config: &RunConfig) -> Result<LightCurve, SimulationError> {
    let waypoints = interpolate_states(system, config)?;
    info!(
        "starting parallel {}-step eclipse run toward ({:.3}, {:.3})",
        config.steps, config.target_position.x, config.target_position.y
    );

    let samples: Result<Vec<LightCurveSample>, BodyError> = waypoints
        .par_iter()
        .enumerate()
        .map(|(step, &(position, orientation_deg))| {
            let mut snapshot = system.clone();
            let mover = snapshot.body_mut(config.mover);
            mover.move_to(position);
            mover.rotate_to(orientation_deg);
            snapshot
                .total_flux()
                .map(|flux| LightCurveSample { step, flux })
        })
        .collect();
    let samples = samples?;

    // Leave the live system in the same state as a serial run
    if let Some(&(position, orientation_deg)) = waypoints.last() {
        let mover = system.body_mut(config.mover);
        mover.move_to(position);
        mover.rotate_to(orientation_deg);
    }

    Ok(LightCurve { samples })
}

/// Interpolate the mover's (position, orientation) samples for a run.
///
/// Validates the step count before reading any state. Each coordinate and
/// the orientation interpolate independently and linearly, inclusive of both
/// endpoints; a single-step run samples only the target.
fn interpolate_states(
    system: &Binary,
    config: &RunConfig,
) -> Result<Vec<(Point2<f64>, f64)>, SimulationError> {
    if config.steps < 1 {
        return Err(SimulationError::InvalidStepCount(config.steps));
    }

    if config.steps == 1 {
        return Ok(vec![(
            config.target_position,
            config.target_orientation_deg,
        )]);
    }

    let mover = system.body(config.mover);
    let xs = linspace(mover.position.x, config.target_position.x, config.steps);
    let ys = linspace(mover.position.y, config.target_position.y, config.steps);
    let angles = linspace(
        mover.orientation_deg,
        config.target_orientation_deg,
        config.steps,
    );

    Ok(xs
        .into_iter()
        .zip(ys)
        .zip(angles)
        .map(|((x, y), angle)| (Point2::new(x, y), angle))
        .collect())
}
