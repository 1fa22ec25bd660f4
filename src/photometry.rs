//! Relative brightness from apparent magnitudes.
//!
//! Magnitudes are logarithmic with lower values brighter. A magnitude
//! difference of 5 is a flux ratio of 100, i.e. `10^(0.4 * dm)`.

use serde::{Deserialize, Serialize};

use crate::{Result, SkyError};

/// Flux ratio exponent per magnitude
pub const POGSON_EXPONENT: f64 = 0.4;

/// What to do with a batch whose brightness values are all identical
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlatBrightness {
    /// Report [`SkyError::EmptyBatch`]
    #[default]
    Reject,
    /// Map every entry to 0.5
    Midpoint,
}

/// Which magnitude feeds the brightness computation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessModel {
    /// Catalog magnitudes as measured from the barycenter
    #[default]
    Catalog,
    /// Catalog magnitudes moved to the observer's distance by the inverse
    /// square law
    InverseSquare,
}

/// Apparent magnitude of a star at `catalog_distance` when seen from
/// `observer_distance` (same units).
///
/// # Errors
/// [`SkyError::DegenerateInput`] unless both distances are positive and finite
pub fn magnitude_at_distance(mag: f64, catalog_distance: f64, observer_distance: f64) -> Result<f64> {
    let valid = |d: f64| d.is_finite() && d > 0.0;
    if !valid(catalog_distance) || !valid(observer_distance) {
        return Err(SkyError::DegenerateInput);
    }
    Ok(mag + 5.0 * (observer_distance / catalog_distance).log10())
}

/// Brightness of every magnitude relative to `magnitudes[reference_index]`.
///
/// The reference maps to 1, brighter entries above 1 and dimmer entries
/// below.
///
/// # Errors
/// * [`SkyError::EmptyBatch`] for an empty batch or a ratio that is not
///   finite
/// * [`SkyError::ReferenceOutOfRange`] for a bad reference index
pub fn relative_brightness(magnitudes: &[f64], reference_index: usize) -> Result<Vec<f64>> {
    if magnitudes.is_empty() {
        return Err(SkyError::EmptyBatch("no magnitudes".to_string()));
    }
    let m_ref = *magnitudes
        .get(reference_index)
        .ok_or(SkyError::ReferenceOutOfRange {
            index: reference_index,
            len: magnitudes.len(),
        })?;

    magnitudes
        .iter()
        .map(|&m| {
            let b = 10.0_f64.powf(POGSON_EXPONENT * (m_ref - m));
            if b.is_finite() {
                Ok(b)
            } else {
                Err(SkyError::EmptyBatch(format!(
                    "brightness of magnitude {} against {} is not finite",
                    m, m_ref
                )))
            }
        })
        .collect()
}

/// Linear min-max rescale into `[0, 1]`: dimmest to 0, brightest to 1.
///
/// # Errors
/// [`SkyError::EmptyBatch`] for an empty batch, or for a flat batch under
/// [`FlatBrightness::Reject`]
pub fn normalize_brightness(brightness: &[f64], flat: FlatBrightness) -> Result<Vec<f64>> {
    if brightness.is_empty() {
        return Err(SkyError::EmptyBatch("no brightness values".to_string()));
    }
    let min = brightness.iter().copied().fold(f64::INFINITY, f64::min);
    let max = brightness.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return match flat {
            FlatBrightness::Reject => Err(SkyError::EmptyBatch(format!(
                "all {} brightness values equal {}",
                brightness.len(),
                min
            ))),
            FlatBrightness::Midpoint => Ok(vec![0.5; brightness.len()]),
        };
    }

    let span = max - min;
    Ok(brightness
        .iter()
        .map(|b| ((b - min) / span).clamp(0.0, 1.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_relative_brightness() {
        let b = relative_brightness(&[5.0, 0.0, 10.0], 0).unwrap();
        assert_abs_diff_eq!(b[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b[1], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b[2], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_reference() {
        assert_eq!(
            relative_brightness(&[1.0, 2.0], 2),
            Err(SkyError::ReferenceOutOfRange { index: 2, len: 2 })
        );
        assert!(matches!(
            relative_brightness(&[], 0),
            Err(SkyError::EmptyBatch(_))
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            relative_brightness(&[1000.0, -1000.0], 0),
            Err(SkyError::EmptyBatch(_))
        ));
        assert!(relative_brightness(&[1.0, f64::NAN], 0).is_err());
    }

    #[test]
    fn test_normalize_bounds() {
        let n = normalize_brightness(&[1.0, 100.0, 0.01, 3.0], FlatBrightness::Reject).unwrap();
        assert_eq!(n[1], 1.0);
        assert_eq!(n[2], 0.0);
        assert!(n.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_flat_batch() {
        let b = relative_brightness(&[7.0, 7.0, 7.0], 1).unwrap();
        assert!(matches!(
            normalize_brightness(&b, FlatBrightness::Reject),
            Err(SkyError::EmptyBatch(_))
        ));
        let n = normalize_brightness(&b, FlatBrightness::Midpoint).unwrap();
        assert_eq!(n, vec![0.5; 3]);
        assert!(n.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_reference_invariance() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let mags: Vec<f64> = (0..12).map(|_| rng.random_range(-1.5..18.0)).collect();
            let a = normalize_brightness(
                &relative_brightness(&mags, 0).unwrap(),
                FlatBrightness::Reject,
            )
            .unwrap();
            let b = normalize_brightness(
                &relative_brightness(&mags, 7).unwrap(),
                FlatBrightness::Reject,
            )
            .unwrap();
            for (x, y) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_inverse_square() {
        // Ten times further is five magnitudes dimmer
        assert_abs_diff_eq!(
            magnitude_at_distance(1.0, 10.0, 100.0).unwrap(),
            6.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            magnitude_at_distance(1.0, 10.0, 10.0).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_eq!(
            magnitude_at_distance(1.0, 10.0, 0.0),
            Err(SkyError::DegenerateInput)
        );
    }
}
