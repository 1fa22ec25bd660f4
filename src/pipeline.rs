//! Batch entry point: catalog rows in, projected and brightness-normalized
//! records out.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalogs::CatalogStar;
use crate::coords::to_cartesian;
use crate::observer::pointing::Boresight;
use crate::observer::Vantage;
use crate::photometry::{
    magnitude_at_distance, normalize_brightness, relative_brightness, BrightnessModel,
    FlatBrightness,
};
use crate::projection::{
    normalize_positions, project_point, DepthMode, Hemisphere, ReferenceDistance, DEFAULT_SCALE,
};
use crate::{Result, SkyError, Vector2, Vector3};

/// Star whose magnitude anchors the relative brightness scale
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStar {
    /// Position among the stars that survive filtering
    Index(usize),
    SourceId(u64),
}

impl Default for ReferenceStar {
    fn default() -> Self {
        ReferenceStar::Index(0)
    }
}

/// Every policy choice the projection leaves to the caller
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Mean distance of the output points from the plane origin
    pub scale: f64,
    pub reference_distance: ReferenceDistance,
    pub depth: DepthMode,
    pub hemisphere: Hemisphere,
    /// Look direction; `None` projects along the celestial +Z axis
    pub boresight: Option<Boresight>,
    pub reference_star: ReferenceStar,
    pub flat_brightness: FlatBrightness,
    pub brightness_model: BrightnessModel,
    /// Maximum number of rows with a valid parallax to consider
    pub limit: Option<usize>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            reference_distance: ReferenceDistance::default(),
            depth: DepthMode::default(),
            hemisphere: Hemisphere::default(),
            boresight: None,
            reference_star: ReferenceStar::default(),
            flat_brightness: FlatBrightness::default(),
            brightness_model: BrightnessModel::default(),
            limit: None,
        }
    }
}

impl ProjectionConfig {
    pub fn from_json_file<T: AsRef<Path>>(path: T) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read projection config: {}", path.as_ref().display())
        })?;
        serde_json::from_str(&text).with_context(|| {
            format!("Failed to parse projection config: {}", path.as_ref().display())
        })
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_reference_distance(mut self, reference_distance: ReferenceDistance) -> Self {
        self.reference_distance = reference_distance;
        self
    }

    pub fn with_depth(mut self, depth: DepthMode) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_hemisphere(mut self, hemisphere: Hemisphere) -> Self {
        self.hemisphere = hemisphere;
        self
    }

    pub fn with_boresight(mut self, boresight: Boresight) -> Self {
        self.boresight = Some(boresight);
        self
    }

    pub fn with_reference_star(mut self, reference_star: ReferenceStar) -> Self {
        self.reference_star = reference_star;
        self
    }

    pub fn with_flat_brightness(mut self, flat_brightness: FlatBrightness) -> Self {
        self.flat_brightness = flat_brightness;
        self
    }

    pub fn with_brightness_model(mut self, brightness_model: BrightnessModel) -> Self {
        self.brightness_model = brightness_model;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    Invalid(SkyError),
    /// Behind the observer while only the visible hemisphere is kept
    OutsideHemisphere,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "{}", e),
            Self::OutsideHemisphere => write!(f, "outside the visible hemisphere"),
        }
    }
}

/// Input row that did not make it into the output
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position in the input catalog
    pub index: usize,
    pub source_id: Option<u64>,
    pub reason: RejectionReason,
}

/// One output record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectedStar {
    /// Position in the input catalog
    pub index: usize,
    pub source_id: Option<u64>,
    pub x: f64,
    pub y: f64,
    /// Min-max normalized relative brightness in `[0, 1]`
    pub brightness: f64,
}

impl ProjectedStar {
    /// Output key: the source identifier, or `#<index>` for a star without
    /// one so that it cannot collide with a real identifier
    pub fn key(&self) -> String {
        match self.source_id {
            Some(id) => id.to_string(),
            None => format!("#{}", self.index),
        }
    }
}

/// Result of projecting one batch
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedField {
    /// Surviving stars in input order
    pub stars: Vec<ProjectedStar>,
    /// Mean projected modulus the positions were divided by
    pub normalization_value: f64,
    /// Plane distance `R` in parsecs
    pub reference_distance_pc: f64,
    pub rejected: Vec<Rejection>,
}

impl ProjectedField {
    /// `[x, y, brightness]` per surviving star, in input order
    pub fn records(&self) -> Vec<[f64; 3]> {
        self.stars
            .iter()
            .map(|s| [s.x, s.y, s.brightness])
            .collect()
    }

    /// Identifier to `[x, y, brightness]`, keyed as in
    /// [`ProjectedStar::key`]. Keys keep input order.
    pub fn to_id_map(&self) -> Map<String, Value> {
        self.stars
            .iter()
            .map(|s| (s.key(), Value::from(vec![s.x, s.y, s.brightness])))
            .collect()
    }
}

struct Candidate<'a> {
    index: usize,
    star: &'a CatalogStar,
    catalog_distance: f64,
    relative: Vector3,
    mag: f64,
}

/// Runs the full transform for a batch of catalog rows
#[derive(Debug, Clone, Default)]
pub struct SkyProjector {
    config: ProjectionConfig,
}

impl SkyProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project `catalog` as seen from `observer`.
    ///
    /// Rows that cannot be projected are listed in
    /// [`ProjectedField::rejected`]; the batch itself fails only when
    /// nothing usable is left or a batch-wide quantity is degenerate.
    ///
    /// # Errors
    /// * [`SkyError::EmptyBatch`] when no rows survive, `R` is not positive,
    ///   the mean projected modulus is zero, or all brightness values are
    ///   equal under [`FlatBrightness::Reject`]
    /// * [`SkyError::ReferenceOutOfRange`] / [`SkyError::UnknownReference`]
    ///   for a reference star that is not among the survivors
    /// * [`SkyError::InvalidScale`] for a scale that is not positive and
    ///   finite
    pub fn project(
        &self,
        catalog: &[CatalogStar],
        observer: &impl Vantage,
    ) -> Result<ProjectedField> {
        let config = &self.config;
        let mut rejected = Vec::new();
        let mut reject = |index: usize, star: &CatalogStar, reason: RejectionReason| {
            tracing::debug!(
                "dropping row {} (source {:?}): {}",
                index,
                star.source_id,
                reason
            );
            rejected.push(Rejection {
                index,
                source_id: star.source_id,
                reason,
            });
        };

        if catalog.is_empty() {
            return Err(SkyError::EmptyBatch("catalog is empty".to_string()));
        }
        if config.limit == Some(0) {
            return Err(SkyError::EmptyBatch(format!(
                "limit of 0 excludes all {} catalog rows",
                catalog.len()
            )));
        }

        let origin = observer.position_pc();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(catalog.len());
        let mut n_valid = 0;
        for (index, star) in catalog.iter().enumerate() {
            if config.limit.is_some_and(|limit| n_valid >= limit) {
                break;
            }
            let catalog_distance = match star.distance_pc() {
                Ok(d) => d,
                Err(e) => {
                    reject(index, star, RejectionReason::Invalid(e));
                    continue;
                }
            };
            n_valid += 1;

            let relative = to_cartesian(star.ra_deg, star.dec_deg, catalog_distance) - origin;
            let mag = match config.brightness_model {
                BrightnessModel::Catalog => star.mag,
                BrightnessModel::InverseSquare => {
                    match magnitude_at_distance(star.mag, catalog_distance, relative.norm()) {
                        Ok(m) => m,
                        Err(e) => {
                            reject(index, star, RejectionReason::Invalid(e));
                            continue;
                        }
                    }
                }
            };
            candidates.push(Candidate {
                index,
                star,
                catalog_distance,
                relative,
                mag,
            });
        }

        if let Some(boresight) = &config.boresight {
            let q = boresight.frame_from_celestial();
            for c in candidates.iter_mut() {
                c.relative = q.transform_vector(&c.relative);
            }
        }

        candidates.retain(|c| {
            if !config.hemisphere.contains(&c.relative) {
                reject(c.index, c.star, RejectionReason::OutsideHemisphere);
                return false;
            }
            let undefined = match config.depth {
                DepthMode::LineOfSight if c.relative.z == 0.0 => Some(SkyError::ZeroLineOfSight),
                DepthMode::DistanceRatio if c.relative.norm() == 0.0 => {
                    Some(SkyError::DegenerateInput)
                }
                _ => None,
            };
            match undefined {
                Some(e) => {
                    reject(c.index, c.star, RejectionReason::Invalid(e));
                    false
                }
                None => true,
            }
        });

        if candidates.is_empty() {
            return Err(SkyError::EmptyBatch(format!(
                "all {} catalog rows were rejected",
                catalog.len()
            )));
        }

        let catalog_distances: Vec<f64> = candidates.iter().map(|c| c.catalog_distance).collect();
        let relative: Vec<Vector3> = candidates.iter().map(|c| c.relative).collect();
        let r = config
            .reference_distance
            .resolve(&catalog_distances, &relative)?;

        let mut projected: Vec<(Candidate, Vector2)> = Vec::with_capacity(candidates.len());
        for c in candidates {
            match project_point(&c.relative, r, config.depth) {
                Ok(p) => projected.push((c, p)),
                Err(e) => reject(c.index, c.star, RejectionReason::Invalid(e)),
            }
        }

        if projected.is_empty() {
            return Err(SkyError::EmptyBatch(format!(
                "all {} catalog rows were rejected",
                catalog.len()
            )));
        }

        let positions: Vec<Vector2> = projected.iter().map(|(_, p)| *p).collect();
        let plane = normalize_positions(&positions, config.scale)?;

        let reference_index = match config.reference_star {
            ReferenceStar::Index(i) => i,
            ReferenceStar::SourceId(id) => projected
                .iter()
                .position(|(c, _)| c.star.source_id == Some(id))
                .ok_or(SkyError::UnknownReference(id))?,
        };
        let mags: Vec<f64> = projected.iter().map(|(c, _)| c.mag).collect();
        let brightness = normalize_brightness(
            &relative_brightness(&mags, reference_index)?,
            config.flat_brightness,
        )?;

        let stars: Vec<ProjectedStar> = projected
            .iter()
            .zip(plane.positions.iter())
            .zip(brightness)
            .map(|(((c, _), pos), brightness)| ProjectedStar {
                index: c.index,
                source_id: c.star.source_id,
                x: pos.x,
                y: pos.y,
                brightness,
            })
            .collect();

        if !rejected.is_empty() {
            tracing::warn!(
                "{} of {} catalog rows rejected during projection",
                rejected.len(),
                catalog.len()
            );
        }
        tracing::info!(
            "projected {} stars onto plane at R = {:.3} pc (normalization {:.6})",
            stars.len(),
            r,
            plane.normalization_value
        );

        Ok(ProjectedField {
            stars,
            normalization_value: plane.normalization_value,
            reference_distance_pc: r,
            rejected,
        })
    }
}
