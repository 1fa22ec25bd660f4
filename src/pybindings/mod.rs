mod pycatalog;
mod pyobserver;
mod pyprojector;
mod pystar;

use pyo3::prelude::*;

#[pymodule]
pub fn exosky(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<pystar::PyCatalogStar>()?;
    m.add_class::<pyobserver::PyObserverFrame>()?;
    m.add_class::<pyobserver::PyBoresight>()?;
    m.add_class::<pyprojector::PySkyProjector>()?;
    m.add_function(wrap_pyfunction!(pycatalog::load_gaia_csv, m)?)?;
    m.add_function(wrap_pyfunction!(pystar::to_cartesian, m)?)?;
    m.add_function(wrap_pyfunction!(pystar::to_celestial, m)?)?;
    Ok(())
}

/// Map core errors onto Python's `ValueError`
pub(crate) fn value_error(e: crate::SkyError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}
