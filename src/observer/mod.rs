//! Observer frames and recentering of catalog positions.
//!
//! Catalog positions are barycentric. An [`ObserverFrame`] places the viewer
//! somewhere else (an exoplanet host, another catalog star, a far-away
//! direction) and [`recenter`] shifts the whole catalog so that the observer
//! sits at the origin.

pub mod pointing;

use crate::catalogs::CatalogStar;
use crate::coords::{to_cartesian, to_celestial};
use crate::{Result, SkyError, Vector3};

/// Stand-in distance (parsecs) for an observer known only by direction.
///
/// Recentering on a point this far away approximates a parallel shift of the
/// whole catalog rather than a perspective change.
pub const DIRECTIONAL_DISTANCE_PC: f64 = 1.0e12;

/// Anything that can act as the origin of a recentered catalog
pub trait Vantage {
    /// Barycentric position of the observer in parsecs
    fn position_pc(&self) -> Vector3;

    /// Observer-relative position of a barycentric point
    fn relative(&self, barycentric: &Vector3) -> Vector3 {
        barycentric - self.position_pc()
    }

    /// Distance of the observer from the barycenter in parsecs
    fn distance_pc(&self) -> f64 {
        self.position_pc().norm()
    }

    /// Right ascension and declination (degrees) of the observer as seen from
    /// the barycenter, or `None` for an observer sitting on it
    fn ra_dec_deg(&self) -> Option<(f64, f64)> {
        to_celestial(&self.position_pc()).ok()
    }
}

/// Reference point a projection is computed from.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverFrame {
    position: Vector3,
    directional: bool,
}

impl Default for ObserverFrame {
    fn default() -> Self {
        Self::barycenter()
    }
}

impl ObserverFrame {
    /// Observer at `distance_pc` parsecs in the direction (ra, dec).
    ///
    /// # Errors
    /// [`SkyError::InvalidObserver`] unless the distance is positive and finite
    pub fn new(ra_deg: f64, dec_deg: f64, distance_pc: f64) -> Result<Self> {
        if !distance_pc.is_finite() || distance_pc <= 0.0 {
            return Err(SkyError::InvalidObserver { distance_pc });
        }
        Ok(Self {
            position: to_cartesian(ra_deg, dec_deg, distance_pc),
            directional: false,
        })
    }

    /// Observer with no meaningful distance, placed at
    /// [`DIRECTIONAL_DISTANCE_PC`] along (ra, dec)
    pub fn direction(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            position: to_cartesian(ra_deg, dec_deg, DIRECTIONAL_DISTANCE_PC),
            directional: true,
        }
    }

    /// The catalog's own origin; recentering is the identity
    pub fn barycenter() -> Self {
        Self {
            position: Vector3::zeros(),
            directional: false,
        }
    }

    pub fn from_cartesian(position: Vector3) -> Self {
        Self {
            position,
            directional: false,
        }
    }

    /// Observer sitting on a catalog star
    pub fn at_star(star: &CatalogStar) -> Result<Self> {
        Ok(Self::from_cartesian(star.position_pc()?))
    }

    /// True when built from a direction only
    pub fn is_directional(&self) -> bool {
        self.directional
    }
}

impl Vantage for ObserverFrame {
    fn position_pc(&self) -> Vector3 {
        self.position
    }
}

/// Shift every catalog entry so that `observer` is at the origin.
///
/// Output order matches input order.
///
/// # Errors
/// [`SkyError::InvalidParallax`] for the first entry without a usable distance
pub fn recenter(catalog: &[CatalogStar], observer: &impl Vantage) -> Result<Vec<Vector3>> {
    let origin = observer.position_pc();
    catalog
        .iter()
        .map(|star| star.position_pc().map(|p| p - origin))
        .collect()
}
