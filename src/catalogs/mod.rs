pub mod gaia;

use serde::{Deserialize, Serialize};

use crate::{Result, SkyError, Vector3};

/// Milliarcseconds of parallax per inverse parsec
pub const MAS_PER_INV_PARSEC: f64 = 1000.0;

/// One catalog entry as delivered by the catalog query.
///
/// Proper motions are carried for completeness only; the pipeline projects a
/// single epoch and never applies them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatalogStar {
    pub source_id: Option<u64>,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub parallax_mas: f64,
    pub mag: f64,
    pub pmra_mas_yr: Option<f64>,
    pub pmdec_mas_yr: Option<f64>,
}

impl CatalogStar {
    pub fn new(ra_deg: f64, dec_deg: f64, parallax_mas: f64, mag: f64) -> Self {
        Self {
            source_id: None,
            ra_deg,
            dec_deg,
            parallax_mas,
            mag,
            pmra_mas_yr: None,
            pmdec_mas_yr: None,
        }
    }

    pub fn with_source_id(mut self, source_id: u64) -> Self {
        self.source_id = Some(source_id);
        self
    }

    /// Distance in parsecs derived from the parallax.
    ///
    /// # Errors
    /// [`SkyError::InvalidParallax`] when the parallax is non-positive or not
    /// finite. The resulting distance is always strictly positive.
    pub fn distance_pc(&self) -> Result<f64> {
        if !self.parallax_mas.is_finite() || self.parallax_mas <= 0.0 {
            return Err(SkyError::InvalidParallax {
                parallax_mas: self.parallax_mas,
            });
        }
        let distance = MAS_PER_INV_PARSEC / self.parallax_mas;
        // Subnormal parallaxes overflow the division
        if !distance.is_finite() {
            return Err(SkyError::InvalidParallax {
                parallax_mas: self.parallax_mas,
            });
        }
        Ok(distance)
    }

    /// Barycentric position in parsecs
    pub fn position_pc(&self) -> Result<Vector3> {
        let distance = self.distance_pc()?;
        Ok(crate::coords::to_cartesian(
            self.ra_deg,
            self.dec_deg,
            distance,
        ))
    }
}
