use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{check_trim_interval, Curve, CurveDomain};

/// A bounded straight segment defined by an origin point and a direction.
///
/// The parametric form is: `P(t) = origin + t * direction` with
/// `t` in `[t_min, t_max]`. The direction is unit length, so parameters
/// measure arc length.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
    domain: CurveDomain,
}

impl Line {
    /// Creates a new line from an origin, a direction and a parameter range.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length or the range is empty.
    pub fn new(origin: Point3, direction: Vector3, t_min: f64, t_max: f64) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if t_max - t_min < TOLERANCE {
            return Err(GeometryError::Degenerate("line range must be positive".into()).into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
            domain: CurveDomain::new(t_min, t_max),
        })
    }

    /// Creates the segment running from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn from_points(start: Point3, end: Point3) -> Result<Self> {
        let d = end - start;
        Self::new(start, d, 0.0, d.norm())
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.origin + self.direction * t)
    }

    fn tangent(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn domain(&self) -> CurveDomain {
        self.domain
    }

    fn length_between(&self, t0: f64, t1: f64) -> f64 {
        (t1 - t0).abs()
    }

    fn parameter_at_length(&self, t0: f64, distance: f64) -> f64 {
        t0 + distance
    }

    fn closest_parameter(&self, point: &Point3) -> f64 {
        let t = (point - self.origin).dot(&self.direction);
        self.domain.clamp(t)
    }

    fn is_linear(&self, _tolerance: f64) -> bool {
        true
    }

    fn trim(&self, t0: f64, t1: f64) -> Result<Self> {
        check_trim_interval(self.domain, t0, t1)?;
        Ok(Self {
            origin: self.origin,
            direction: self.direction,
            domain: CurveDomain::new(self.domain.clamp(t0), self.domain.clamp(t1)),
        })
    }

    fn reversed(&self) -> Self {
        let end = self.origin + self.direction * self.domain.t_max;
        Self {
            origin: end,
            direction: -self.direction,
            domain: CurveDomain::new(0.0, self.domain.t_max - self.domain.t_min),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn line_length_3_4_5() {
        let line = Line::from_points(Point3::origin(), Point3::new(3.0, 4.0, 0.0)).unwrap();
        assert!((line.length() - 5.0).abs() < 1e-10);
        let end = line.point_at_end().unwrap();
        assert!((end - Point3::new(3.0, 4.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn coincident_points_rejected() {
        assert!(Line::from_points(Point3::origin(), Point3::origin()).is_err());
    }

    #[test]
    fn closest_parameter_clamps_to_ends() {
        let line = Line::from_points(Point3::origin(), Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert!((line.closest_parameter(&Point3::new(5.0, 3.0, 0.0)) - 5.0).abs() < 1e-10);
        assert!(line.closest_parameter(&Point3::new(-5.0, 0.0, 0.0)).abs() < 1e-10);
        assert!((line.closest_parameter(&Point3::new(15.0, 0.0, 0.0)) - 10.0).abs() < 1e-10);
    }

    #[test]
    fn reversed_swaps_endpoints() {
        let line =
            Line::from_points(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 2.0, 0.0)).unwrap();
        let rev = line.reversed();
        assert!((rev.point_at_start().unwrap() - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-10);
        assert!((rev.point_at_end().unwrap() - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-10);
        assert!((rev.tangent_at_start().unwrap() + Vector3::y()).norm() < 1e-10);
    }

    #[test]
    fn trim_keeps_parameterisation() {
        let line = Line::from_points(Point3::origin(), Point3::new(4.0, 0.0, 0.0)).unwrap();
        let sub = line.trim(1.0, 3.0).unwrap();
        assert!((sub.length() - 2.0).abs() < 1e-10);
        assert!((sub.point_at_start().unwrap().x - 1.0).abs() < 1e-10);
        assert!(line.trim(3.0, 1.0).is_err());
    }
}
