//! Two-body system and its eclipse flux model.
//!
//! A `Binary` holds a primary and a companion with fixed roles: the
//! companion's flux is never reduced, while the primary may be occulted by
//! the companion's outer silhouette. Nothing enforces which body is
//! physically in front; the roles are a property of the flux formula, not of
//! the geometry. All flux values are derived fresh from the current body
//! states on every query.

use crate::body::{Body, BodyError};

/// Selects one of the two bodies of a [`Binary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Companion,
}

/// An eclipsing two-body system.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The body whose light can be blocked
    pub primary: Body,
    /// The occulting body; its flux is always counted in full
    pub companion: Body,
}

impl Binary {
    pub fn new(primary: Body, companion: Body) -> Self {
        Self { primary, companion }
    }

    pub fn body(&self, role: Role) -> &Body {
        match role {
            Role::Primary => &self.primary,
            Role::Companion => &self.companion,
        }
    }

    pub fn body_mut(&mut self, role: Role) -> &mut Body {
        match role {
            Role::Primary => &mut self.primary,
            Role::Companion => &mut self.companion,
        }
    }

    /// Unocculted flux of a single body: the sum of each decomposed
    /// region's area times its brightness.
    pub fn flux_of(body: &Body) -> Result<f64, BodyError> {
        let flux = body
            .layers()?
            .iter()
            .map(|layer| layer.region.area() * layer.brightness)
            .sum();
        Ok(flux)
    }

    /// Unocculted flux of the primary.
    pub fn primary_flux(&self) -> Result<f64, BodyError> {
        Self::flux_of(&self.primary)
    }

    /// Unocculted flux of the companion.
    pub fn companion_flux(&self) -> Result<f64, BodyError> {
        Self::flux_of(&self.companion)
    }

    /// Total system flux with the eclipse taken into account.
    ///
    /// The companion contributes its full flux. Each of the primary's
    /// regions contributes only the part of its area that lies outside the
    /// companion's outer silhouette, weighted by that region's brightness.
    /// Occultation therefore models blocked light from the primary, not
    /// light added on top of it: with no overlap the total is the plain sum
    /// of both fluxes, and a fully covered region contributes nothing.
    pub fn total_flux(&self) -> Result<f64, BodyError> {
        let companion_flux = self.companion_flux()?;
        let silhouette = self.companion.silhouette()?;

        let visible_primary_flux: f64 = self
            .primary
            .layers()?
            .iter()
            .map(|layer| layer.region.difference(&silhouette).area() * layer.brightness)
            .sum();

        Ok(companion_flux + visible_primary_flux)
    }
}
