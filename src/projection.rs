//! Planar projection of observer-relative positions.
//!
//! Points are projected onto the plane `z = R` by a perspective divide by
//! their line-of-sight coordinate, then rescaled so that the mean distance
//! from the plane origin equals a fixed output scale.

use serde::{Deserialize, Serialize};

use crate::{Result, SkyError, Vector2, Vector3};

/// Output scale applied after dividing by the mean modulus
pub const DEFAULT_SCALE: f64 = 200.0;

/// Choice of the plane distance `R`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDistance {
    /// Largest barycentric catalog distance among the projected points
    #[default]
    MaxCatalogDistance,
    /// Largest observer-relative distance among the projected points
    MaxRelativeDistance,
    /// Largest observer-relative line-of-sight coordinate
    MaxRelativeZ,
    /// Caller supplied distance in parsecs
    Fixed(f64),
}

impl ReferenceDistance {
    /// Resolve `R` for a batch.
    ///
    /// `catalog_distances` and `relative` describe the same points in the
    /// same order.
    ///
    /// # Errors
    /// [`SkyError::EmptyBatch`] when the batch is empty or the resolved
    /// distance is not positive and finite
    pub fn resolve(&self, catalog_distances: &[f64], relative: &[Vector3]) -> Result<f64> {
        let r = match self {
            Self::MaxCatalogDistance => max_of(catalog_distances.iter().copied()),
            Self::MaxRelativeDistance => max_of(relative.iter().map(|p| p.norm())),
            Self::MaxRelativeZ => max_of(relative.iter().map(|p| p.z)),
            Self::Fixed(r) => *r,
        };
        if !r.is_finite() || r <= 0.0 {
            return Err(SkyError::EmptyBatch(format!(
                "reference distance {} resolved from {:?} is not positive",
                r, self
            )));
        }
        Ok(r)
    }
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

/// Projection formula
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepthMode {
    /// `x * R / z`: perspective divide by the line-of-sight coordinate
    #[default]
    LineOfSight,
    /// `x * R / |p|`: scale by the ratio of `R` to the point's distance
    DistanceRatio,
}

/// Which side of the observer is kept
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Hemisphere {
    /// Everything with a defined projection (z != 0)
    #[default]
    All,
    /// Only points in front of the observer (z > 0)
    Visible,
}

impl Hemisphere {
    pub fn contains(&self, p: &Vector3) -> bool {
        match self {
            Self::All => true,
            Self::Visible => p.z > 0.0,
        }
    }
}

/// Project a single observer-relative point onto the plane at distance `r`.
///
/// # Errors
/// * [`SkyError::ZeroLineOfSight`] under [`DepthMode::LineOfSight`] when
///   `z = 0` or the divide overflows
/// * [`SkyError::DegenerateInput`] under [`DepthMode::DistanceRatio`] for a
///   point at the origin
pub fn project_point(p: &Vector3, r: f64, depth: DepthMode) -> Result<Vector2> {
    let projected = match depth {
        DepthMode::LineOfSight => {
            if p.z == 0.0 {
                return Err(SkyError::ZeroLineOfSight);
            }
            p.xy() * (r / p.z)
        }
        DepthMode::DistanceRatio => {
            let d = p.norm();
            if d == 0.0 {
                return Err(SkyError::DegenerateInput);
            }
            p.xy() * (r / d)
        }
    };
    if !projected.x.is_finite() || !projected.y.is_finite() {
        return Err(match depth {
            DepthMode::LineOfSight => SkyError::ZeroLineOfSight,
            DepthMode::DistanceRatio => SkyError::DegenerateInput,
        });
    }
    Ok(projected)
}

/// Project every point; fails on the first point without a projection.
///
/// Callers wanting hemisphere semantics filter with [`Hemisphere`] first.
pub fn project(points: &[Vector3], r: f64, depth: DepthMode) -> Result<Vec<Vector2>> {
    points.iter().map(|p| project_point(p, r, depth)).collect()
}

/// Positions rescaled by the batch mean modulus
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneNormalization {
    pub positions: Vec<Vector2>,
    /// Mean of `|p|` over the projected batch, before scaling
    pub normalization_value: f64,
}

/// Divide every projected point by the mean modulus of the batch and multiply
/// by `scale`.
///
/// # Errors
/// * [`SkyError::InvalidScale`] unless `scale` is positive and finite
/// * [`SkyError::EmptyBatch`] for an empty batch or one whose mean modulus
///   is zero or not finite
pub fn normalize_positions(projected: &[Vector2], scale: f64) -> Result<PlaneNormalization> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SkyError::InvalidScale { scale });
    }
    if projected.is_empty() {
        return Err(SkyError::EmptyBatch("no projected points".to_string()));
    }
    // hypot and divide-before-sum keep large but finite moduli from overflowing
    let n = projected.len() as f64;
    let mean = projected.iter().map(|p| p.x.hypot(p.y) / n).sum::<f64>();
    if !mean.is_finite() || mean == 0.0 {
        return Err(SkyError::EmptyBatch(format!(
            "mean projected modulus is {}",
            mean
        )));
    }
    Ok(PlaneNormalization {
        positions: projected.iter().map(|p| p / mean * scale).collect(),
        normalization_value: mean,
    })
}
