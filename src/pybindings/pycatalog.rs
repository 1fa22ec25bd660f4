use pyo3::exceptions::PyIOError;
use pyo3::prelude::*;

use crate::catalogs::gaia;

use super::pystar::PyCatalogStar;

#[pyfunction]
pub fn load_gaia_csv(path: &str) -> PyResult<Vec<PyCatalogStar>> {
    let stars = gaia::load_gaia_csv(path).map_err(|e| PyErr::new::<PyIOError, _>(format!("{:#}", e)))?;
    Ok(stars.into_iter().map(PyCatalogStar::from).collect())
}
