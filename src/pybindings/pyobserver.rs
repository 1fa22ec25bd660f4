use pyo3::prelude::*;

use super::value_error;
use super::pystar::PyCatalogStar;
use crate::catalogs::CatalogStar;
use crate::observer::pointing::Boresight;
use crate::observer::{ObserverFrame, Vantage};

#[pyclass(name = "ObserverFrame")]
#[derive(Clone)]
pub struct PyObserverFrame {
    frame: ObserverFrame,
}

impl PyObserverFrame {
    pub(crate) fn as_vantage(&self) -> &ObserverFrame {
        &self.frame
    }
}

#[pymethods]
impl PyObserverFrame {
    #[new]
    pub fn new(ra_deg: f64, dec_deg: f64, distance_pc: f64) -> PyResult<Self> {
        Ok(Self {
            frame: ObserverFrame::new(ra_deg, dec_deg, distance_pc).map_err(value_error)?,
        })
    }

    #[staticmethod]
    pub fn direction(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            frame: ObserverFrame::direction(ra_deg, dec_deg),
        }
    }

    #[staticmethod]
    pub fn barycenter() -> Self {
        Self {
            frame: ObserverFrame::barycenter(),
        }
    }

    #[staticmethod]
    pub fn from_cartesian(x: f64, y: f64, z: f64) -> Self {
        Self {
            frame: ObserverFrame::from_cartesian(crate::Vector3::new(x, y, z)),
        }
    }

    #[staticmethod]
    pub fn at_star(star: PyCatalogStar) -> PyResult<Self> {
        let star: CatalogStar = star.into();
        Ok(Self {
            frame: ObserverFrame::at_star(&star).map_err(value_error)?,
        })
    }

    pub fn position_pc(&self) -> (f64, f64, f64) {
        let p = self.frame.position_pc();
        (p.x, p.y, p.z)
    }

    pub fn distance_pc(&self) -> f64 {
        self.frame.distance_pc()
    }

    pub fn is_directional(&self) -> bool {
        self.frame.is_directional()
    }
}

#[pyclass(name = "Boresight")]
#[derive(Clone)]
pub struct PyBoresight {
    pub(crate) inner: Boresight,
}

#[pymethods]
impl PyBoresight {
    #[new]
    #[pyo3(signature = (ra_deg, dec_deg, roll_deg=0.0))]
    pub fn new(ra_deg: f64, dec_deg: f64, roll_deg: f64) -> Self {
        Self {
            inner: Boresight::new(ra_deg, dec_deg, roll_deg),
        }
    }

    pub fn direction(&self) -> (f64, f64, f64) {
        let v = self.inner.direction();
        (v.x, v.y, v.z)
    }
}
