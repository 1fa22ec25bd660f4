use numpy::{ndarray::Array2, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyDict};
use pyo3::Bound;

use super::pyobserver::{PyBoresight, PyObserverFrame};
use super::pystar::PyCatalogStar;
use super::value_error;

use crate::catalogs::CatalogStar;
use crate::pipeline::{ProjectedField, ProjectionConfig, ReferenceStar, SkyProjector};
use crate::projection::ReferenceDistance;

#[pyclass(name = "SkyProjector")]
pub struct PySkyProjector {
    config: ProjectionConfig,
}

/// Parse a snake_case policy name into one of the config enums
fn policy<T: serde::de::DeserializeOwned>(key: &str, value: &Bound<'_, PyAny>) -> PyResult<T> {
    let name: String = value.extract()?;
    serde_json::from_value(serde_json::Value::String(name.clone())).map_err(|_| {
        PyValueError::new_err(format!("Unknown value '{}' for '{}'.", name, key))
    })
}

impl PySkyProjector {
    fn extract_reference_distance(value: &Bound<'_, PyAny>) -> PyResult<ReferenceDistance> {
        if let Ok(r) = value.extract::<f64>() {
            return Ok(ReferenceDistance::Fixed(r));
        }
        policy("reference_distance", value)
    }

    fn apply_kwargs(config: &mut ProjectionConfig, kwargs: &Bound<'_, PyDict>) -> PyResult<()> {
        for (key, value) in kwargs.iter() {
            let key_str: String = key.extract()?;
            match key_str.as_str() {
                "scale" => config.scale = value.extract()?,
                "reference_distance" => {
                    config.reference_distance = Self::extract_reference_distance(&value)?
                }
                "depth" => config.depth = policy("depth", &value)?,
                "hemisphere" => config.hemisphere = policy("hemisphere", &value)?,
                "boresight" => {
                    let boresight: Option<PyBoresight> = value.extract()?;
                    config.boresight = boresight.map(|b| b.inner);
                }
                "reference_index" => {
                    config.reference_star = ReferenceStar::Index(value.extract()?);
                }
                "reference_source_id" => {
                    config.reference_star = ReferenceStar::SourceId(value.extract()?);
                }
                "flat_brightness" => config.flat_brightness = policy("flat_brightness", &value)?,
                "brightness_model" => {
                    config.brightness_model = policy("brightness_model", &value)?
                }
                "limit" => config.limit = value.extract()?,
                _ => {
                    return Err(PyValueError::new_err(format!(
                        "Unknown keyword argument '{}'.",
                        key_str
                    )));
                }
            }
        }
        Ok(())
    }

    fn run(&self, stars: &[CatalogStar], observer: &PyObserverFrame) -> PyResult<ProjectedField> {
        SkyProjector::new(self.config.clone())
            .project(stars, observer.as_vantage())
            .map_err(value_error)
    }
}

#[pymethods]
impl PySkyProjector {
    #[new]
    #[pyo3(signature = (**kwargs))]
    pub fn new(kwargs: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let mut config = ProjectionConfig::default();
        if let Some(kwargs) = kwargs {
            Self::apply_kwargs(&mut config, kwargs)?;
        }
        Ok(Self { config })
    }

    #[getter]
    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    /// Project catalog stars, returning `{id: [x, y, brightness]}`.
    ///
    /// Stars without an identifier are keyed by the string `"#<index>"`.
    pub fn project<'py>(
        &self,
        py: Python<'py>,
        stars: Vec<PyCatalogStar>,
        observer: &PyObserverFrame,
    ) -> PyResult<Bound<'py, PyDict>> {
        let stars: Vec<CatalogStar> = stars.into_iter().map(CatalogStar::from).collect();
        let field = self.run(&stars, observer)?;

        let out = PyDict::new(py);
        for star in field.stars.iter() {
            let key = match star.source_id {
                Some(id) => id.into_pyobject(py)?.into_any(),
                None => star.key().into_pyobject(py)?.into_any(),
            };
            out.set_item(key, vec![star.x, star.y, star.brightness])?;
        }
        Ok(out)
    }

    /// Column-oriented variant.
    ///
    /// Returns the surviving input indices and an `N x 3` array of
    /// `x, y, brightness`.
    #[pyo3(signature = (ra_deg, dec_deg, parallax_mas, mag, observer))]
    pub fn project_arrays<'py>(
        &self,
        py: Python<'py>,
        ra_deg: PyReadonlyArray1<'py, f64>,
        dec_deg: PyReadonlyArray1<'py, f64>,
        parallax_mas: PyReadonlyArray1<'py, f64>,
        mag: PyReadonlyArray1<'py, f64>,
        observer: &PyObserverFrame,
    ) -> PyResult<(Vec<usize>, Bound<'py, PyArray2<f64>>)> {
        let as_slice = |a: &PyReadonlyArray1<'py, f64>| -> PyResult<Vec<f64>> {
            Ok(a.as_slice()
                .map_err(|e| PyValueError::new_err(e.to_string()))?
                .to_vec())
        };
        let (ra, dec, plx, mag) = (
            as_slice(&ra_deg)?,
            as_slice(&dec_deg)?,
            as_slice(&parallax_mas)?,
            as_slice(&mag)?,
        );
        if dec.len() != ra.len() || plx.len() != ra.len() || mag.len() != ra.len() {
            return Err(PyValueError::new_err("input arrays must have equal length"));
        }

        let stars: Vec<CatalogStar> = (0..ra.len())
            .map(|i| CatalogStar::new(ra[i], dec[i], plx[i], mag[i]))
            .collect();
        let field = self.run(&stars, observer)?;

        let indices = field.stars.iter().map(|s| s.index).collect();
        let flat: Vec<f64> = field.records().into_iter().flatten().collect();
        let data = Array2::from_shape_vec((field.stars.len(), 3), flat)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((indices, PyArray2::from_owned_array(py, data)))
    }
}
