//! Error kinds raised by the transform pipeline.
//!
//! Every variant describes a failure on one record or on a whole batch.
//! The pipeline never substitutes NaN or infinity for any of them; callers
//! decide whether to drop the offending record or abort.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkyError {
    /// Parallax is non-positive or not finite, so the distance is undefined
    #[error("invalid parallax {parallax_mas} mas: distance is undefined")]
    InvalidParallax { parallax_mas: f64 },

    /// Zero-length position vector handed to the inverse transform
    #[error("degenerate input: zero-length position vector has no direction")]
    DegenerateInput,

    /// Argument to an inverse trig function outside its domain after clamping
    #[error("domain error: {value} is outside [-1, 1]")]
    Domain { value: f64 },

    #[error("invalid observer distance {distance_pc} pc: must be positive and finite")]
    InvalidObserver { distance_pc: f64 },

    /// Point lies in the projection plane's normal plane (z = 0)
    #[error("zero line-of-sight coordinate: projection is undefined")]
    ZeroLineOfSight,

    #[error("invalid output scale {scale}: must be positive and finite")]
    InvalidScale { scale: f64 },

    #[error("empty or degenerate batch: {0}")]
    EmptyBatch(String),

    #[error("reference star index {index} out of range for batch of {len}")]
    ReferenceOutOfRange { index: usize, len: usize },

    #[error("reference star {0} is not part of the projected batch")]
    UnknownReference(u64),
}

pub type Result<T> = std::result::Result<T, SkyError>;
