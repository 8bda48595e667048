use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{check_trim_interval, Curve, CurveDomain};

/// A piecewise-linear curve parameterised by arc length.
///
/// Stands in for arbitrary free-form input curves: any curve can be sampled
/// densely into a `Polyline` before it enters the linkage builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point3>,
    /// Arc length at each vertex; `cumulative[0] == 0`.
    cumulative: Vec<f64>,
}

impl Polyline {
    /// Creates a polyline through `points`.
    ///
    /// Consecutive duplicate points are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct points remain.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        let mut kept: Vec<Point3> = Vec::with_capacity(points.len());
        for p in points {
            if kept.last().is_some_and(|q| (p - *q).norm() < TOLERANCE) {
                continue;
            }
            kept.push(p);
        }
        if kept.len() < 2 {
            return Err(GeometryError::Degenerate(
                "polyline needs at least two distinct points".into(),
            )
            .into());
        }

        let mut cumulative = Vec::with_capacity(kept.len());
        let mut acc = 0.0;
        cumulative.push(acc);
        for w in kept.windows(2) {
            acc += (w[1] - w[0]).norm();
            cumulative.push(acc);
        }

        Ok(Self {
            points: kept,
            cumulative,
        })
    }

    /// Returns the vertices of the polyline.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    fn total(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Index of the piece containing parameter `t`.
    fn piece_at(&self, t: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c <= t);
        idx.saturating_sub(1).min(self.points.len() - 2)
    }
}

impl Curve for Polyline {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let t = self.domain().clamp(t);
        let i = self.piece_at(t);
        let span = self.cumulative[i + 1] - self.cumulative[i];
        let f = (t - self.cumulative[i]) / span;
        Ok(self.points[i] + (self.points[i + 1] - self.points[i]) * f)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let i = self.piece_at(self.domain().clamp(t));
        (self.points[i + 1] - self.points[i])
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, self.total())
    }

    fn length_between(&self, t0: f64, t1: f64) -> f64 {
        (t1 - t0).abs()
    }

    fn parameter_at_length(&self, t0: f64, distance: f64) -> f64 {
        t0 + distance
    }

    fn closest_parameter(&self, point: &Point3) -> f64 {
        let mut best_t = 0.0;
        let mut best_dist = f64::INFINITY;
        for (i, w) in self.points.windows(2).enumerate() {
            let d = w[1] - w[0];
            let span = self.cumulative[i + 1] - self.cumulative[i];
            let f = ((point - w[0]).dot(&d) / d.norm_squared()).clamp(0.0, 1.0);
            let dist = (point - (w[0] + d * f)).norm();
            if dist < best_dist {
                best_dist = dist;
                best_t = self.cumulative[i] + f * span;
            }
        }
        best_t
    }

    fn is_linear(&self, tolerance: f64) -> bool {
        let a = self.points[0];
        let b = self.points[self.points.len() - 1];
        let Some(dir) = (b - a).try_normalize(TOLERANCE) else {
            return false;
        };
        self.points.iter().all(|p| {
            let v = p - a;
            (v - dir * v.dot(&dir)).norm() <= tolerance
        })
    }

    fn trim(&self, t0: f64, t1: f64) -> Result<Self> {
        check_trim_interval(self.domain(), t0, t1)?;
        let mut pts = vec![self.evaluate(t0)?];
        for (p, &c) in self.points.iter().zip(&self.cumulative) {
            if c > t0 && c < t1 {
                pts.push(*p);
            }
        }
        pts.push(self.evaluate(t1)?);
        Self::new(pts)
    }

    fn reversed(&self) -> Self {
        let points: Vec<Point3> = self.points.iter().rev().copied().collect();
        let total = self.total();
        let cumulative = self.cumulative.iter().rev().map(|c| total - c).collect();
        Self { points, cumulative }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn elbow() -> Polyline {
        Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn evaluates_by_arc_length() {
        let pl = elbow();
        assert!((pl.length() - 3.0).abs() < 1e-10);
        let p = pl.evaluate(2.5).unwrap();
        assert!((p - Point3::new(2.0, 0.5, 0.0)).norm() < 1e-10);
        assert!((pl.tangent_at_end().unwrap() - Vector3::y()).norm() < 1e-10);
    }

    #[test]
    fn closest_parameter_on_second_piece() {
        let pl = elbow();
        let t = pl.closest_parameter(&Point3::new(3.0, 0.75, 0.0));
        assert!((t - 2.75).abs() < 1e-10);
    }

    #[test]
    fn straight_polyline_is_linear() {
        let pl = Polyline::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ])
        .unwrap();
        assert!(pl.is_linear(1e-9));
        assert!(!elbow().is_linear(1e-3));
    }

    #[test]
    fn reversed_and_trimmed() {
        let pl = elbow();
        let rev = pl.reversed();
        assert!((rev.point_at_start().unwrap() - Point3::new(2.0, 1.0, 0.0)).norm() < 1e-10);
        let p = rev.evaluate(0.5).unwrap();
        assert!((p - Point3::new(2.0, 0.5, 0.0)).norm() < 1e-10);

        let sub = pl.trim(1.0, 2.5).unwrap();
        assert_eq!(sub.points().len(), 3);
        assert!((sub.length() - 1.5).abs() < 1e-10);
    }

    #[test]
    fn duplicate_points_collapse() {
        assert!(Polyline::new(vec![Point3::origin(), Point3::origin()]).is_err());
    }
}
