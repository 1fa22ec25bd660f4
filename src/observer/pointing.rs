//! Orientation of the projection plane.
//!
//! By default the plane is perpendicular to the celestial +Z axis. A
//! [`Boresight`] rotates observer-relative positions into a frame whose +Z
//! axis points along an arbitrary look direction, so the plane can face any
//! part of the sky.

use serde::{Deserialize, Serialize};

use crate::{Quaternion, Vector3};

/// Look direction and roll about it, in degrees
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Boresight {
    pub ra_deg: f64,
    pub dec_deg: f64,
    #[serde(default)]
    pub roll_deg: f64,
}

impl Boresight {
    pub fn new(ra_deg: f64, dec_deg: f64, roll_deg: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            roll_deg,
        }
    }

    /// Rotation taking celestial vectors into the look frame
    pub fn frame_from_celestial(&self) -> Quaternion {
        // Constant quaternion that rotates from frame with xhat along the
        // boresight to zhat along the boresight
        let qxout2zout = Quaternion::from_axis_angle(&Vector3::z_axis(), -std::f64::consts::FRAC_PI_2)
            * Quaternion::from_axis_angle(&Vector3::y_axis(), -std::f64::consts::FRAC_PI_2);

        let q_ra = Quaternion::from_axis_angle(&Vector3::z_axis(), -self.ra_deg.to_radians());
        let q_dec = Quaternion::from_axis_angle(&Vector3::y_axis(), self.dec_deg.to_radians());
        let q_roll = Quaternion::from_axis_angle(&Vector3::x_axis(), -self.roll_deg.to_radians());
        qxout2zout * q_roll * q_dec * q_ra
    }

    /// Unit vector of the look direction in celestial coordinates
    pub fn direction(&self) -> Vector3 {
        self.frame_from_celestial()
            .inverse()
            .transform_vector(&Vector3::z_axis())
    }

    /// Rotate a batch of vectors into the look frame
    pub fn rotate_all(&self, points: &mut [Vector3]) {
        let q = self.frame_from_celestial();
        for p in points.iter_mut() {
            *p = q.transform_vector(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::coords::{to_cartesian, to_celestial};

    #[test]
    fn test_boresight_maps_to_z() {
        let ra = 10.0_f64;
        let dec = 20.0_f64;
        let roll = 50.0_f64;
        let boresight = Boresight::new(ra, dec, roll);
        let q = boresight.frame_from_celestial();

        let v = to_cartesian(ra, dec, 1.0);
        let v_rotated = q.transform_vector(&v);
        let angle = v_rotated.angle(&Vector3::z());
        assert!(angle < 1e-10);

        let (ra2, dec2) = to_celestial(&boresight.direction()).unwrap();
        assert!((ra2 - ra).abs() < 1e-9);
        assert!((dec2 - dec).abs() < 1e-9);
    }

    #[test]
    fn test_roll_spins_the_plane() {
        // Rolling only turns the look frame about its own z axis
        let unrolled = Boresight::new(250.0, 45.0, 0.0).frame_from_celestial();
        let rolled = Boresight::new(250.0, 45.0, 30.0).frame_from_celestial();
        let delta = rolled * unrolled.inverse();
        assert_abs_diff_eq!(
            delta.scaled_axis(),
            Vector3::new(0.0, 0.0, -30.0_f64.to_radians()),
            epsilon = 1e-10
        );

        let p = to_cartesian(253.0, 47.0, 12.0);
        let a = unrolled.transform_vector(&p);
        let b = rolled.transform_vector(&p);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-10);
        assert_abs_diff_eq!(a.xy().norm(), b.xy().norm(), epsilon = 1e-10);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let boresight = Boresight::new(123.0, -33.0, 12.0);
        let mut points = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 0.5, 9.0)];
        let lengths: Vec<f64> = points.iter().map(|p| p.norm()).collect();
        boresight.rotate_all(&mut points);
        for (p, l) in points.iter().zip(lengths) {
            assert!((p.norm() - l).abs() < 1e-12);
        }
    }
}
