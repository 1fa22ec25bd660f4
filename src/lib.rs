//! Project catalog star fields onto a plane as seen from an arbitrary
//! vantage point.
//!
//! The pipeline is a pure function of one batch of catalog rows:
//! celestial coordinates become barycentric Cartesian positions
//! ([`coords`]), are shifted onto an observer ([`observer`]), projected onto
//! a plane and rescaled ([`projection`]), and paired with a min-max
//! normalized relative brightness ([`photometry`]). [`SkyProjector`] runs
//! all of it for a batch.

pub mod catalogs;
pub mod coords;
mod error;
pub mod observer;
pub mod photometry;
pub mod pipeline;
pub mod projection;

pub use catalogs::CatalogStar;
pub use error::{Result, SkyError};
pub use observer::{ObserverFrame, Vantage};
pub use pipeline::{ProjectedField, ProjectedStar, ProjectionConfig, SkyProjector};

#[cfg(feature = "pybindings")]
mod pybindings;

/// Common types used in the library
pub type Quaternion = nalgebra::Unit<nalgebra::Quaternion<f64>>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
