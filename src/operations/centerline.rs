use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::curve::Curve;
use crate::math::{Point3, Vector3, TOLERANCE};

/// Rebuilds the centerline polyline of one segment.
///
/// The result has `subdivision + 1` points. The first two and the last two
/// points straddle the curve endpoints: at a joint end they are offset by
/// the joint half-edge length, at a free end by half the interior spacing.
/// The points in between split the remaining curve into equal arc lengths.
#[derive(Debug)]
pub struct BuildCenterline<'a, C: Curve> {
    curve: &'a C,
    subdivision: usize,
    start: Option<Vector3>,
    end: Option<Vector3>,
}

impl<'a, C: Curve> BuildCenterline<'a, C> {
    /// Creates a new `BuildCenterline` operation with two free ends.
    #[must_use]
    pub fn new(curve: &'a C, subdivision: usize) -> Self {
        Self {
            curve,
            subdivision,
            start: None,
            end: None,
        }
    }

    /// Reserves the start of the curve for a joint half-edge vector.
    #[must_use]
    pub fn with_start(mut self, half_edge: Vector3) -> Self {
        self.start = Some(half_edge);
        self
    }

    /// Reserves the end of the curve for a joint half-edge vector.
    #[must_use]
    pub fn with_end(mut self, half_edge: Vector3) -> Self {
        self.end = Some(half_edge);
        self
    }

    /// Executes the subdivision.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidSubdivision`] if `subdivision < 2`,
    /// or [`GeometryError::Degenerate`] if the reserved end regions leave no
    /// curve between them.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Vec<Point3>> {
        let s = self.subdivision;
        if s < 2 {
            return Err(OperationError::InvalidSubdivision { count: s }.into());
        }

        let curve = self.curve;
        let p0 = curve.point_at_start()?;
        let p1 = curve.point_at_end()?;
        let t_start = curve.tangent_at_start()?;
        // Points into the curve from its end.
        let t_end = -curve.tangent_at_end()?;

        let mut pts = vec![Point3::origin(); s + 1];
        let domain = curve.domain();
        let (mut t0, mut t1) = (domain.t_min, domain.t_max);

        // Step 1: ends controlled by joints.
        let mut joint_ends = 0usize;
        if let Some(v) = self.start {
            let offset = t_start * v.norm();
            pts[0] = p0 - offset;
            pts[1] = p0 + offset;
            t0 = curve.closest_parameter(&pts[1]);
            joint_ends += 1;
        }
        if let Some(v) = self.end {
            let offset = t_end * v.norm();
            pts[s - 1] = p1 + offset;
            pts[s] = p1 - offset;
            t1 = curve.closest_parameter(&pts[s - 1]);
            joint_ends += 1;
        }

        // Step 2: free ends take half the spacing of the remaining pieces.
        if joint_ends < 2 {
            let pieces = (s - joint_ends) as f64;
            let mut extended = curve.length_between(t0, t1);
            if joint_ends == 1 {
                extended *= pieces / (pieces - 0.5);
            }
            let half = 0.5 * extended / pieces;

            if self.start.is_none() {
                let offset = t_start * half;
                pts[0] = p0 - offset;
                pts[1] = p0 + offset;
                t0 = curve.closest_parameter(&pts[1]);
            }
            if self.end.is_none() {
                let offset = t_end * half;
                pts[s - 1] = p1 + offset;
                pts[s] = p1 - offset;
                t1 = curve.closest_parameter(&pts[s - 1]);
            }
        }

        if s > 2 && t1 - t0 <= TOLERANCE {
            return Err(GeometryError::Degenerate(
                "joint end regions overlap along the segment".into(),
            )
            .into());
        }

        // Step 3: interior points at equal arc length.
        if s > 2 {
            for (i, t) in curve.divide_by_count(t0, t1, s - 2).into_iter().enumerate() {
                pts[2 + i] = curve.evaluate(t)?;
            }
        }

        Ok(pts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::{Arc, Line};
    use approx::assert_relative_eq;

    fn x_line(len: f64) -> Line {
        Line::from_points(Point3::origin(), Point3::new(len, 0.0, 0.0)).unwrap()
    }

    fn xs(pts: &[Point3]) -> Vec<f64> {
        pts.iter().map(|p| p.x).collect()
    }

    #[test]
    fn free_ends_extend_half_a_step() {
        let line = x_line(4.0);
        let pts = BuildCenterline::new(&line, 4).execute().unwrap();
        let expected = [-0.5, 0.5, 2.0, 3.5, 4.5];
        assert_eq!(pts.len(), 5);
        for (x, e) in xs(&pts).iter().zip(expected) {
            assert!((x - e).abs() < 1e-10);
        }
    }

    #[test]
    fn joint_start_reserves_half_edge() {
        let line = x_line(1.0);
        let pts = BuildCenterline::new(&line, 3)
            .with_start(Vector3::new(0.0, 0.1, 0.0))
            .execute()
            .unwrap();
        let expected = [-0.1, 0.1, 0.7, 1.3];
        for (x, e) in xs(&pts).iter().zip(expected) {
            assert!((x - e).abs() < 1e-10);
        }
    }

    #[test]
    fn both_joint_ends_split_interior_evenly() {
        let line = x_line(2.0);
        let pts = BuildCenterline::new(&line, 6)
            .with_start(Vector3::new(-0.2, 0.0, 0.0))
            .with_end(Vector3::new(0.2, 0.0, 0.0))
            .execute()
            .unwrap();
        // Interior [0.2, 1.8] in four pieces.
        let expected = [-0.2, 0.2, 0.6, 1.0, 1.4, 1.8, 2.2];
        for (x, e) in xs(&pts).iter().zip(expected) {
            assert!((x - e).abs() < 1e-10);
        }
        assert!(pts.iter().all(|p| p.y.abs() < 1e-12));
    }

    #[test]
    fn two_edge_segment_has_no_interior() {
        let line = x_line(1.0);
        let pts = BuildCenterline::new(&line, 2).execute().unwrap();
        assert_eq!(pts.len(), 3);
        assert_relative_eq!(pts[0].x, -0.25, epsilon = 1e-12);
        assert_relative_eq!(pts[1].x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(pts[2].x, 1.25, epsilon = 1e-12);
    }

    #[test]
    fn arc_interior_points_lie_on_curve() {
        let arc = Arc::new(
            Point3::origin(),
            1.0,
            Vector3::z(),
            Vector3::x(),
            0.0,
            std::f64::consts::PI,
        )
        .unwrap();
        let pts = BuildCenterline::new(&arc, 8).execute().unwrap();
        for p in &pts[2..7] {
            assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn subdivision_below_two_rejected() {
        let line = x_line(1.0);
        assert!(BuildCenterline::new(&line, 1).execute().is_err());
    }

    #[test]
    fn oversized_joint_vectors_are_degenerate() {
        let line = x_line(1.0);
        let res = BuildCenterline::new(&line, 4)
            .with_start(Vector3::new(0.8, 0.0, 0.0))
            .with_end(Vector3::new(0.8, 0.0, 0.0))
            .execute();
        assert!(res.is_err());
    }
}
