use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{check_trim_interval, Curve, CurveDomain};

/// A circular arc in 3D space.
///
/// Defined by a center, radius, normal axis, and a reference direction
/// for the zero-angle. The parametric form sweeps from `start_angle`
/// to `end_angle` (in radians) counter-clockwise around the normal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the arc circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the arc plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    /// * `start_angle` - Start angle in radians
    /// * `end_angle` - End angle in radians (greater than `start_angle`)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is zero-length,
    /// the reference direction is not perpendicular to the normal, or the
    /// sweep is not positive.
    pub fn new(
        center: Point3,
        radius: f64,
        normal: Vector3,
        ref_dir: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if end_angle - start_angle < TOLERANCE {
            return Err(GeometryError::Degenerate("arc sweep must be positive".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if normal.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
            start_angle,
            end_angle,
        })
    }

    /// Computes the second axis direction (perpendicular to both normal and `ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let binormal = self.binormal();
        let x = self.radius * t.cos();
        let y = self.radius * t.sin();
        Ok(self.center + self.ref_dir * x + binormal * y)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let binormal = self.binormal();
        let dx = -self.radius * t.sin();
        let dy = self.radius * t.cos();
        let tangent = self.ref_dir * dx + binormal * dy;
        let len = tangent.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(tangent / len)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.start_angle, self.end_angle)
    }

    fn length_between(&self, t0: f64, t1: f64) -> f64 {
        self.radius * (t1 - t0).abs()
    }

    fn parameter_at_length(&self, t0: f64, distance: f64) -> f64 {
        t0 + distance / self.radius
    }

    fn closest_parameter(&self, point: &Point3) -> f64 {
        let to_point = point - self.center;
        let in_plane = to_point - self.normal * to_point.dot(&self.normal);
        if in_plane.norm() < TOLERANCE {
            // Every arc point is equidistant from the center.
            return self.start_angle;
        }

        let angle = in_plane
            .dot(&self.binormal())
            .atan2(in_plane.dot(&self.ref_dir));
        let candidate = self.start_angle + (angle - self.start_angle).rem_euclid(TAU);
        if candidate <= self.end_angle {
            return candidate;
        }

        // Outside the sweep: pick whichever endpoint is nearer.
        let d_start = self
            .evaluate(self.start_angle)
            .map_or(f64::INFINITY, |p| (point - p).norm());
        let d_end = self
            .evaluate(self.end_angle)
            .map_or(f64::INFINITY, |p| (point - p).norm());
        if d_start <= d_end {
            self.start_angle
        } else {
            self.end_angle
        }
    }

    fn is_linear(&self, tolerance: f64) -> bool {
        // Sagitta of the arc relative to its chord.
        let half_sweep = 0.5 * (self.end_angle - self.start_angle);
        let sagitta = self.radius * (1.0 - half_sweep.min(std::f64::consts::PI).cos());
        sagitta <= tolerance
    }

    fn trim(&self, t0: f64, t1: f64) -> Result<Self> {
        check_trim_interval(self.domain(), t0, t1)?;
        let mut arc = self.clone();
        arc.start_angle = t0.max(self.start_angle);
        arc.end_angle = t1.min(self.end_angle);
        Ok(arc)
    }

    fn reversed(&self) -> Self {
        // Flipping the normal mirrors the angle: P'(-t) == P(t).
        Self {
            center: self.center,
            radius: self.radius,
            normal: -self.normal,
            ref_dir: self.ref_dir,
            start_angle: -self.end_angle,
            end_angle: -self.start_angle,
        }
    }
}
