mod arc;
mod line;
mod polyline;

pub use arc::Arc;
pub use line::Line;
pub use polyline::Polyline;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Clamps `t` into the domain.
    #[must_use]
    pub fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t_min, self.t_max)
    }
}

/// Trait for bounded parametric curves in 3D space.
///
/// Parameters increase from the start point to the end point. Every curve
/// can report the arc length between two parameters and invert that
/// relation, which is all the centerline subdivision needs.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Arc length of the curve between parameters `t0` and `t1`.
    fn length_between(&self, t0: f64, t1: f64) -> f64;

    /// Parameter reached after travelling `distance` along the curve from `t0`.
    fn parameter_at_length(&self, t0: f64, distance: f64) -> f64;

    /// Parameter of the curve point closest to `point`.
    fn closest_parameter(&self, point: &Point3) -> f64;

    /// Returns whether every point of the curve lies within `tolerance` of
    /// the chord between its endpoints.
    fn is_linear(&self, tolerance: f64) -> bool;

    /// Returns the sub-curve over `[t0, t1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is empty or leaves the domain.
    fn trim(&self, t0: f64, t1: f64) -> Result<Self>
    where
        Self: Sized;

    /// Returns the same curve traversed end to start.
    #[must_use]
    fn reversed(&self) -> Self
    where
        Self: Sized;

    /// Point at the start of the domain.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn point_at_start(&self) -> Result<Point3> {
        self.evaluate(self.domain().t_min)
    }

    /// Point at the end of the domain.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn point_at_end(&self) -> Result<Point3> {
        self.evaluate(self.domain().t_max)
    }

    /// Unit tangent at the start of the domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent_at_start(&self) -> Result<Vector3> {
        self.tangent(self.domain().t_min)
    }

    /// Unit tangent at the end of the domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    fn tangent_at_end(&self) -> Result<Vector3> {
        self.tangent(self.domain().t_max)
    }

    /// Total arc length.
    fn length(&self) -> f64 {
        let d = self.domain();
        self.length_between(d.t_min, d.t_max)
    }

    /// Splits `[t0, t1]` into `count` pieces of equal arc length and returns
    /// the `count - 1` interior parameters in increasing order.
    fn divide_by_count(&self, t0: f64, t1: f64, count: usize) -> Vec<f64> {
        if count < 2 {
            return Vec::new();
        }
        let total = self.length_between(t0, t1);
        #[allow(clippy::cast_precision_loss)]
        let step = total / count as f64;
        (1..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let s = step * i as f64;
                self.parameter_at_length(t0, s)
            })
            .collect()
    }
}

/// Validates a trim interval against a domain.
pub(crate) fn check_trim_interval(domain: CurveDomain, t0: f64, t1: f64) -> Result<()> {
    use crate::error::GeometryError;
    use crate::math::TOLERANCE;

    for (name, t) in [("t0", t0), ("t1", t1)] {
        if t < domain.t_min - TOLERANCE || t > domain.t_max + TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: name,
                value: t,
                min: domain.t_min,
                max: domain.t_max,
            }
            .into());
        }
    }
    if t1 - t0 < TOLERANCE {
        return Err(GeometryError::Degenerate("empty trim interval".into()).into());
    }
    Ok(())
}
