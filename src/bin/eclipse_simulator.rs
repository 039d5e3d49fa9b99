//! Eclipse light curve simulator
//!
//! Simulates the photometric light curve of an eclipsing two-body system:
//! a limb-darkened (or uniform) primary and a companion that sweeps from its
//! starting position to a target, occulting the primary on the way.
//!
//! Usage:
//! ```
//! cargo run --bin eclipse_simulator -- [OPTIONS]
//! ```
//!
//! The defaults reproduce the reference transit: a circular primary of
//! radius 3 with cosine-law limb darkening and a dim companion of radius 5
//! crossing in front of it in 100 steps. See --help for all options.

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use nalgebra::Point2;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::str::FromStr;

use lightcurve::body::{Body, Brightness};
use lightcurve::sims::{self, RunConfig, StepObserver};
use lightcurve::system::{Binary, Role};

/// Clap-compatible "x,y" point argument
#[derive(Debug, Clone, Copy)]
struct PointArg(f64, f64);

impl FromStr for PointArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err("Point must be in format 'x,y'".to_string());
        }
        let x = parts[0]
            .trim()
            .parse::<f64>()
            .map_err(|_| "Invalid x value".to_string())?;
        let y = parts[1]
            .trim()
            .parse::<f64>()
            .map_err(|_| "Invalid y value".to_string())?;
        Ok(PointArg(x, y))
    }
}

impl fmt::Display for PointArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

impl From<PointArg> for Point2<f64> {
    fn from(point: PointArg) -> Self {
        Point2::new(point.0, point.1)
    }
}

/// Which body the run moves
#[derive(Debug, Clone, ValueEnum)]
enum MoverArg {
    /// Move the occulted primary
    Primary,
    /// Move the occulting companion - Default
    Companion,
}

impl fmt::Display for MoverArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoverArg::Primary => write!(f, "primary"),
            MoverArg::Companion => write!(f, "companion"),
        }
    }
}

impl MoverArg {
    fn to_role(&self) -> Role {
        match self {
            MoverArg::Primary => Role::Primary,
            MoverArg::Companion => Role::Companion,
        }
    }
}

/// Command line arguments for the eclipse simulation
#[derive(Parser, Debug)]
#[command(
    name = "Eclipse Simulator",
    about = "Simulates eclipsing two-body light curves",
    long_about = None
)]
struct Args {
    /// Center of the primary as "x,y"
    #[arg(long, default_value = "0,0")]
    primary_position: PointArg,

    /// Semi-major axis of the primary
    #[arg(long, default_value_t = 3.0)]
    primary_semi_major: f64,

    /// Semi-minor axis of the primary
    #[arg(long, default_value_t = 3.0)]
    primary_semi_minor: f64,

    /// Orientation of the primary in degrees
    #[arg(long, default_value_t = 0.0)]
    primary_orientation: f64,

    /// Uniform brightness for the primary; overrides the limb darkening
    /// profile when set
    #[arg(long)]
    primary_brightness: Option<f64>,

    /// Cosine-law limb darkening coefficient for the primary
    #[arg(long, default_value_t = 0.15)]
    limb_coefficient: f64,

    /// Number of limb darkening profile samples
    #[arg(long, default_value_t = 100)]
    profile_samples: usize,

    /// Center of the companion as "x,y"
    #[arg(long, default_value = "15,0")]
    companion_position: PointArg,

    /// Semi-major axis of the companion
    #[arg(long, default_value_t = 5.0)]
    companion_semi_major: f64,

    /// Semi-minor axis of the companion
    #[arg(long, default_value_t = 5.0)]
    companion_semi_minor: f64,

    /// Orientation of the companion in degrees
    #[arg(long, default_value_t = 0.0)]
    companion_orientation: f64,

    /// Uniform brightness of the companion
    #[arg(long, default_value_t = 0.1)]
    companion_brightness: f64,

    /// Which body moves during the run
    #[arg(long, default_value_t = MoverArg::Companion)]
    mover: MoverArg,

    /// Position the mover ends at, as "x,y"
    #[arg(long, default_value = "-15,0", allow_hyphen_values = true)]
    target: PointArg,

    /// Orientation in degrees the mover ends at
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    target_orientation: f64,

    /// Number of time samples
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Evaluate steps on the rayon thread pool (disables the progress bar)
    #[arg(long)]
    parallel: bool,

    /// Write the light curve to this CSV file instead of stdout
    #[arg(long)]
    output_csv: Option<String>,
}

/// Feeds run progress into an indicatif progress bar
struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    fn new(steps: usize) -> Self {
        let bar = ProgressBar::new(steps as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} flux {msg}")
                .expect("static progress template"),
        );
        Self { bar }
    }
}

impl StepObserver for ProgressBarObserver {
    fn on_step(&mut self, _step: usize, _total_steps: usize, _system: &Binary, flux: f64) {
        self.bar.set_message(format!("{flux:.4}"));
        self.bar.inc(1);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    let primary_brightness = match args.primary_brightness {
        Some(value) => Brightness::Uniform(value),
        None => Brightness::cosine_profile(args.limb_coefficient, args.profile_samples),
    };
    let primary = Body::new(
        args.primary_position.into(),
        args.primary_semi_major,
        args.primary_semi_minor,
        args.primary_orientation,
        primary_brightness,
    );
    let companion = Body::new(
        args.companion_position.into(),
        args.companion_semi_major,
        args.companion_semi_minor,
        args.companion_orientation,
        Brightness::Uniform(args.companion_brightness),
    );
    let mut system = Binary::new(primary, companion);

    println!("Eclipse Simulator");
    println!("=================");
    println!("Primary:");
    println!("  Position: {}", args.primary_position);
    println!(
        "  Axes: {} x {}",
        args.primary_semi_major, args.primary_semi_minor
    );
    match args.primary_brightness {
        Some(value) => println!("  Brightness: {value} (uniform)"),
        None => println!(
            "  Brightness: cosine limb darkening, u={}, {} samples",
            args.limb_coefficient, args.profile_samples
        ),
    }
    println!("Companion:");
    println!("  Position: {}", args.companion_position);
    println!(
        "  Axes: {} x {}",
        args.companion_semi_major, args.companion_semi_minor
    );
    println!("  Brightness: {} (uniform)", args.companion_brightness);
    println!("Run:");
    println!("  Mover: {}", args.mover);
    println!("  Target: {}", args.target);
    println!("  Target orientation: {}°", args.target_orientation);
    println!("  Steps: {}", args.steps);
    println!("  Parallel: {}", args.parallel);
    println!();

    debug!(
        "unocculted flux: primary {:.6}, companion {:.6}",
        system.primary_flux()?,
        system.companion_flux()?
    );

    let config = RunConfig {
        mover: args.mover.to_role(),
        target_position: args.target.into(),
        target_orientation_deg: args.target_orientation,
        steps: args.steps,
    };

    let curve = if args.parallel {
        sims::run_parallel(&mut system, &config)?
    } else {
        let mut observer = ProgressBarObserver::new(args.steps);
        let curve = sims::run_with_observer(&mut system, &config, &mut observer)?;
        observer.bar.finish();
        curve
    };

    if let (Some(min), Some(max)) = (curve.min_flux(), curve.max_flux()) {
        println!("Samples: {}", curve.len());
        println!("Flux range: {min:.6} .. {max:.6}");
        println!("Eclipse depth: {:.6}", max - min);
        println!();
    }

    match &args.output_csv {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            curve.write_csv(&mut writer)?;
            println!("Wrote light curve to {path}");
        }
        None => {
            let stdout = std::io::stdout();
            curve.write_csv(&mut stdout.lock())?;
        }
    }

    Ok(())
}
