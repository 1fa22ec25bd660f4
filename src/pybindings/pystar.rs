use pyo3::prelude::*;

use super::value_error;
use crate::catalogs::CatalogStar;
use crate::Vector3;

#[pyclass(name = "CatalogStar")]
#[derive(Clone)]
pub struct PyCatalogStar {
    inner: CatalogStar,
}

#[pymethods]
impl PyCatalogStar {
    #[new]
    #[pyo3(signature = (ra_deg, dec_deg, parallax_mas, mag, source_id=None))]
    pub fn new(ra_deg: f64, dec_deg: f64, parallax_mas: f64, mag: f64, source_id: Option<u64>) -> Self {
        let mut inner = CatalogStar::new(ra_deg, dec_deg, parallax_mas, mag);
        inner.source_id = source_id;
        Self { inner }
    }

    #[getter]
    pub fn source_id(&self) -> Option<u64> {
        self.inner.source_id
    }

    #[getter]
    pub fn ra_deg(&self) -> f64 {
        self.inner.ra_deg
    }

    #[getter]
    pub fn dec_deg(&self) -> f64 {
        self.inner.dec_deg
    }

    #[getter]
    pub fn parallax_mas(&self) -> f64 {
        self.inner.parallax_mas
    }

    #[getter]
    pub fn mag(&self) -> f64 {
        self.inner.mag
    }

    /// Distance in parsecs; raises `ValueError` for an unusable parallax
    pub fn distance_pc(&self) -> PyResult<f64> {
        self.inner.distance_pc().map_err(value_error)
    }

    pub fn position_pc(&self) -> PyResult<(f64, f64, f64)> {
        let p = self.inner.position_pc().map_err(value_error)?;
        Ok((p.x, p.y, p.z))
    }

    fn __repr__(&self) -> String {
        format!(
            "CatalogStar(ra_deg={}, dec_deg={}, parallax_mas={}, mag={}, source_id={:?})",
            self.inner.ra_deg,
            self.inner.dec_deg,
            self.inner.parallax_mas,
            self.inner.mag,
            self.inner.source_id
        )
    }
}

impl From<CatalogStar> for PyCatalogStar {
    fn from(value: CatalogStar) -> Self {
        Self { inner: value }
    }
}

impl From<PyCatalogStar> for CatalogStar {
    fn from(value: PyCatalogStar) -> Self {
        value.inner
    }
}

#[pyfunction]
pub fn to_cartesian(ra_deg: f64, dec_deg: f64, distance: f64) -> (f64, f64, f64) {
    let v = crate::coords::to_cartesian(ra_deg, dec_deg, distance);
    (v.x, v.y, v.z)
}

#[pyfunction]
pub fn to_celestial(x: f64, y: f64, z: f64) -> PyResult<(f64, f64)> {
    crate::coords::to_celestial(&Vector3::new(x, y, z)).map_err(value_error)
}
