use std::f64::consts::TAU;

use super::Vector3;

/// Removes the component of `v` along `normal`.
///
/// `normal` is expected to be unit length.
#[must_use]
pub fn project_onto_plane(v: &Vector3, normal: &Vector3) -> Vector3 {
    v - normal * normal.dot(v)
}

/// Signed angle from `v1` to `v2` measured around `axis`, in `[-pi, pi]`.
#[must_use]
pub fn signed_angle(axis: &Vector3, v1: &Vector3, v2: &Vector3) -> f64 {
    let sin = v1.cross(v2).dot(axis);
    let cos = v1.dot(v2);
    sin.atan2(cos)
}

/// Normalizes an angle to [0, 2pi).
#[must_use]
pub fn normalize_angle(a: f64) -> f64 {
    let mut r = a % TAU;
    if r < 0.0 {
        r += TAU;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn quarter_turn_is_positive_around_z() {
        let z = Vector3::z();
        let a = signed_angle(&z, &Vector3::x(), &Vector3::y());
        assert!((a - FRAC_PI_2).abs() < 1e-12);
        let b = signed_angle(&z, &Vector3::y(), &Vector3::x());
        assert!((b + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn normalize_wraps_negative_angles() {
        assert!((normalize_angle(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-12);
        assert!(normalize_angle(0.0).abs() < 1e-12);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn projection_drops_normal_component() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let p = project_onto_plane(&v, &Vector3::z());
        assert!((p - Vector3::new(1.0, 2.0, 0.0)).norm() < 1e-12);
    }
}
