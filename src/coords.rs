//! Conversion between spherical (right ascension, declination, distance)
//! and Cartesian positions.
//!
//! Angles are in degrees on the public surface. Distances carry whatever
//! unit the caller supplies (parsecs throughout the rest of the crate).

use std::f64::consts::PI;

use crate::{Result, SkyError, Vector3};

/// Slack allowed on `z / |v|` before it is treated as a genuine domain error
/// rather than rounding overshoot.
const ASIN_OVERSHOOT: f64 = 1.0e-12;

/// Convert right ascension and declination (degrees) at `distance` into a
/// Cartesian position with the same origin.
///
/// A zero distance collapses to the origin; negative distances mirror the
/// point through it.
pub fn to_cartesian(ra_deg: f64, dec_deg: f64, distance: f64) -> Vector3 {
    let ra_rad = ra_deg.to_radians();
    let dec_rad = dec_deg.to_radians();
    Vector3::new(
        distance * dec_rad.cos() * ra_rad.cos(),
        distance * dec_rad.cos() * ra_rad.sin(),
        distance * dec_rad.sin(),
    )
}

/// Recover right ascension and declination (degrees) from a position.
///
/// Right ascension is wrapped into `[0, 360)`. On the polar axis the right
/// ascension is undefined and is reported as 0.
///
/// # Errors
/// * [`SkyError::DegenerateInput`] for a zero-length vector
/// * [`SkyError::Domain`] if `z / |v|` is not a valid sine
pub fn to_celestial(v: &Vector3) -> Result<(f64, f64)> {
    let (ra, dec, _) = to_spherical(v)?;
    Ok((ra, dec))
}

/// Same as [`to_celestial`], also returning the distance from the origin.
pub fn to_spherical(v: &Vector3) -> Result<(f64, f64, f64)> {
    let distance = v.norm();
    if distance == 0.0 {
        return Err(SkyError::DegenerateInput);
    }

    let mut ra_rad = v.y.atan2(v.x);
    if ra_rad < 0.0 {
        ra_rad += 2.0 * PI;
    }
    // A tiny negative angle can round up to exactly 2pi
    if ra_rad >= 2.0 * PI {
        ra_rad = 0.0;
    }

    let dec_rad = clamped_asin(v.z / distance)?;

    Ok((ra_rad.to_degrees(), dec_rad.to_degrees(), distance))
}

/// `asin` that absorbs rounding overshoot just past `[-1, 1]`
fn clamped_asin(x: f64) -> Result<f64> {
    if !x.is_finite() || x.abs() > 1.0 + ASIN_OVERSHOOT {
        return Err(SkyError::Domain { value: x });
    }
    Ok(x.clamp(-1.0, 1.0).asin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_to_cartesian_axes() {
        let v = to_cartesian(0.0, 0.0, 2.0);
        assert_abs_diff_eq!(v, Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-12);

        let v = to_cartesian(90.0, 0.0, 1.0);
        assert_abs_diff_eq!(v, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        let v = to_cartesian(123.0, 90.0, 5.0);
        assert_abs_diff_eq!(v, Vector3::new(0.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_distance_is_origin() {
        assert_eq!(to_cartesian(45.0, 45.0, 0.0).norm(), 0.0);
    }

    #[test]
    fn test_reference_examples() {
        let (ra, dec) = to_celestial(&Vector3::new(1.0, 2.0, 3.0)).unwrap();
        assert_abs_diff_eq!(ra, 2.0_f64.atan2(1.0).to_degrees(), epsilon = 1e-10);
        assert_abs_diff_eq!(ra, 63.434_948_822_922, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, 53.300_774_799_907, epsilon = 1e-9);

        // atan2 is negative here and must wrap into [0, 360)
        let (ra, dec) = to_celestial(&Vector3::new(-1.0, -2.0, -3.0)).unwrap();
        assert!((0.0..360.0).contains(&ra));
        assert_abs_diff_eq!(ra, 243.434_948_822_922, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, -53.300_774_799_907, epsilon = 1e-9);
    }

    #[test]
    fn test_north_pole() {
        let (ra, dec) = to_celestial(&Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(ra, 0.0);
        assert_abs_diff_eq!(dec, 90.0, epsilon = 1e-12);

        let (ra, dec) = to_celestial(&Vector3::new(0.0, 0.0, -3.0)).unwrap();
        assert_eq!(ra, 0.0);
        assert_abs_diff_eq!(dec, -90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_vector_is_degenerate() {
        assert_eq!(
            to_celestial(&Vector3::zeros()),
            Err(SkyError::DegenerateInput)
        );
    }

    #[test]
    fn test_non_finite_is_domain_error() {
        let err = to_celestial(&Vector3::new(0.0, 0.0, f64::NAN)).unwrap_err();
        assert!(matches!(err, SkyError::Domain { .. }));
    }

    #[test]
    fn test_asin_overshoot_is_clamped() {
        let half_pi = std::f64::consts::FRAC_PI_2;
        assert_eq!(clamped_asin(1.0 + 1.0e-13).unwrap(), half_pi);
        assert_eq!(clamped_asin(-1.0 - 1.0e-13).unwrap(), -half_pi);
        assert!(matches!(
            clamped_asin(1.0 + 1.0e-9),
            Err(SkyError::Domain { .. })
        ));
        assert!(matches!(
            clamped_asin(f64::INFINITY),
            Err(SkyError::Domain { .. })
        ));
    }

    #[test]
    fn test_spherical_distance() {
        let (_, _, d) = to_spherical(&Vector3::new(1.0, 2.0, 2.0)).unwrap();
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let ra = rng.random_range(0.0..360.0);
            // RA is undefined exactly on the poles
            let dec = rng.random_range(-89.999..89.999);
            let distance = rng.random_range(1.0e-3..1.0e6);

            let v = to_cartesian(ra, dec, distance);
            let (ra2, dec2, d2) = to_spherical(&v).unwrap();

            let dra = (ra2 - ra).abs();
            assert!(dra.min(360.0 - dra) < 1e-7, "ra {} -> {}", ra, ra2);
            assert_abs_diff_eq!(dec2, dec, epsilon = 1e-7);
            assert_abs_diff_eq!(d2 / distance, 1.0, epsilon = 1e-12);
        }
    }
}
