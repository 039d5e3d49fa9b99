//! Celestial body model: position, elliptical shape, orientation and
//! brightness.
//!
//! A body with uniform brightness is a single filled ellipse. A body with a
//! limb-darkening profile decomposes into concentric elliptical annuli whose
//! semi-axes shrink linearly to zero, each annulus weighted by one profile
//! entry (outer ring first). The decomposition is a pure function of the
//! body's current state and is re-derived on every read; mutators only
//! update fields and never cache geometry.

use nalgebra::{Point2, Vector2};
use std::f64::consts::FRAC_PI_2;
use thiserror::Error;

use crate::algo::linspace;
use crate::geometry::{GeometryError, Region};

/// Errors raised when deriving a body's region decomposition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BodyError {
    #[error("limb darkening profile needs at least 2 samples, got {0}")]
    ProfileTooShort(usize),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Surface brightness of a body: either a single value for the whole disk
/// or a radial limb-darkening profile.
#[derive(Debug, Clone, PartialEq)]
pub enum Brightness {
    /// One brightness value for the full disk
    Uniform(f64),
    /// Radial profile, outermost ring first; needs at least 2 samples
    Profile(Vec<f64>),
}

impl Brightness {
    /// Cosine-law limb darkening profile `(1 - u) + u cos(t)` with `t`
    /// sampled from pi/2 at the limb down to 0 at the disk center, so the
    /// edge is dimmer than the center.
    ///
    /// # Arguments
    ///
    /// * `coefficient` - Darkening coefficient `u`; 0 gives a uniform disk
    /// * `samples` - Number of profile samples (at least 2 for a usable profile)
    pub fn cosine_profile(coefficient: f64, samples: usize) -> Self {
        let profile = linspace(FRAC_PI_2, 0.0, samples)
            .into_iter()
            .map(|t| (1.0 - coefficient) + coefficient * t.cos())
            .collect();
        Brightness::Profile(profile)
    }
}

/// One element of a body's region decomposition: a region paired with its
/// brightness. Its flux contribution is `region.area() * brightness`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub region: Region,
    pub brightness: f64,
}

/// A celestial body: an ellipse at a position and orientation, with a
/// uniform or limb-darkened brightness.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Center of the body
    pub position: Point2<f64>,
    /// Outer semi-major axis; must be non-negative when geometry is derived
    pub semi_major: f64,
    /// Outer semi-minor axis; must be non-negative when geometry is derived
    pub semi_minor: f64,
    /// Rotation angle in degrees, counter-clockwise, unbounded
    pub orientation_deg: f64,
    pub brightness: Brightness,
}

impl Body {
    pub fn new(
        position: Point2<f64>,
        semi_major: f64,
        semi_minor: f64,
        orientation_deg: f64,
        brightness: Brightness,
    ) -> Self {
        Self {
            position,
            semi_major,
            semi_minor,
            orientation_deg,
            brightness,
        }
    }

    /// Derive the body's region decomposition from its current state.
    ///
    /// A uniform body yields one layer holding the full ellipse. A body
    /// with an n-sample profile yields n-1 concentric annuli whose
    /// semi-axes interpolate linearly from the outer axes down to zero,
    /// consecutive samples forming each annulus boundary, with the i-th
    /// profile entry as the i-th annulus brightness.
    ///
    /// Derived fresh on every call; two calls without an intervening
    /// mutation return equal layers.
    pub fn layers(&self) -> Result<Vec<Layer>, BodyError> {
        match &self.brightness {
            Brightness::Uniform(brightness) => Ok(vec![Layer {
                region: self.outer_ellipse()?,
                brightness: *brightness,
            }]),
            Brightness::Profile(profile) => {
                if profile.len() < 2 {
                    return Err(BodyError::ProfileTooShort(profile.len()));
                }
                let a_steps = linspace(self.semi_major, 0.0, profile.len());
                let b_steps = linspace(self.semi_minor, 0.0, profile.len());

                profile
                    .iter()
                    .enumerate()
                    .take(profile.len() - 1)
                    .map(|(i, &brightness)| {
                        let region = Region::ring(
                            self.position,
                            (a_steps[i], a_steps[i + 1]),
                            (b_steps[i], b_steps[i + 1]),
                            self.orientation_deg,
                        )?;
                        Ok(Layer { region, brightness })
                    })
                    .collect()
            }
        }
    }

    /// The body's full outer boundary at its current state, used as the
    /// occulting shape regardless of the brightness form.
    pub fn silhouette(&self) -> Result<Region, GeometryError> {
        self.outer_ellipse()
    }

    /// Move the body by a displacement.
    pub fn translate(&mut self, delta: Vector2<f64>) {
        self.position += delta;
    }

    /// Move the body to an absolute position.
    pub fn move_to(&mut self, position: Point2<f64>) {
        self.position = position;
    }

    /// Replace the outer semi-axes. Signs are not validated here; negative
    /// axes are rejected when geometry is next derived.
    pub fn reshape(&mut self, semi_major: f64, semi_minor: f64) {
        self.semi_major = semi_major;
        self.semi_minor = semi_minor;
    }

    /// Rotate the body about its center by a relative angle in degrees.
    pub fn rotate_by(&mut self, angle_deg: f64) {
        self.orientation_deg += angle_deg;
    }

    /// Set the body's orientation to an absolute angle in degrees. No
    /// wrapping is applied.
    pub fn rotate_to(&mut self, angle_deg: f64) {
        self.orientation_deg = angle_deg;
    }

    fn outer_ellipse(&self) -> Result<Region, GeometryError> {
        Region::ellipse(
            self.position,
            self.semi_major,
            self.semi_minor,
            self.orientation_deg,
        )
    }
}

/// Canned body configurations for the reference eclipse scenario.
pub mod models {
    use super::*;
    use once_cell::sync::Lazy;

    /// Limb-darkened solar-type primary: circular, radius 3, cosine-law
    /// profile with coefficient 0.15 over 100 samples.
    pub static LIMB_DARKENED_PRIMARY: Lazy<Body> = Lazy::new(|| {
        Body::new(
            Point2::origin(),
            3.0,
            3.0,
            0.0,
            Brightness::cosine_profile(0.15, 100),
        )
    });

    /// Dim uniform companion: circular, radius 5, brightness 0.1, starting
    /// well clear of the primary.
    pub static DIM_COMPANION: Lazy<Body> = Lazy::new(|| {
        Body::new(
            Point2::new(15.0, 0.0),
            5.0,
            5.0,
            0.0,
            Brightness::Uniform(0.1),
        )
    });
}
