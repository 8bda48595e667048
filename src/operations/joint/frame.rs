use crate::error::{GeometryError, Result};
use crate::math::{Vector3, TOLERANCE};
use crate::topology::{JointFamily, SegmentId};

/// One incident segment as seen from the joint.
#[derive(Debug, Clone, Copy)]
pub(super) struct Arm {
    pub segment: SegmentId,
    /// Unit tangent pointing away from the joint.
    pub outward: Vector3,
    /// Rod edge length of the segment.
    pub edge_length: f64,
    /// Whether the joint sits at the segment's start node.
    pub is_start: bool,
}

/// Builds the family record for one or two arms.
///
/// The edge vector runs out of the first segment and into the second, and
/// is never longer than the shortest rod edge among the arms.
pub(super) fn family(first: &Arm, second: Option<&Arm>) -> Result<JointFamily> {
    let mut edge = -first.outward;
    let mut len = first.edge_length;
    if let Some(second) = second {
        edge += second.outward;
        len = len.min(second.edge_length);
    }
    let edge = edge
        .try_normalize(TOLERANCE)
        .ok_or_else(|| GeometryError::Degenerate("arms of a rod family fold back".into()))?;

    Ok(JointFamily {
        edge: edge * len,
        segments: [Some(first.segment), second.map(|s| s.segment)],
        is_start: [first.is_start, second.is_some_and(|s| s.is_start)],
    })
}

/// Makes `(A, B, normal)` a right-handed frame.
///
/// `B` is flipped so the angle between the edge vectors is acute; if
/// `A x B` then points against the normal the two families trade places.
pub(super) fn orient(
    a: JointFamily,
    mut b: JointFamily,
    normal: &Vector3,
) -> (JointFamily, JointFamily) {
    if a.edge.dot(&b.edge) < 0.0 {
        b.edge = -b.edge;
    }
    if a.edge.cross(&b.edge).dot(normal) < 0.0 {
        (b, a)
    } else {
        (a, b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn arm(segment: SegmentId, outward: Vector3, edge_length: f64) -> Arm {
        Arm {
            segment,
            outward,
            edge_length,
            is_start: true,
        }
    }

    #[test]
    fn two_arm_family_uses_shorter_edge() {
        let a = arm(0, Vector3::x(), 0.5);
        let b = arm(1, -Vector3::x(), 0.2);
        let f = family(&a, Some(&b)).unwrap();
        assert_relative_eq!(f.edge, Vector3::new(-0.2, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(f.segments, [Some(0), Some(1)]);
        assert_eq!(f.count(), 2);
    }

    #[test]
    fn single_arm_family_points_into_joint() {
        let f = family(&arm(4, Vector3::y(), 0.25), None).unwrap();
        assert_relative_eq!(f.edge, Vector3::new(0.0, -0.25, 0.0), epsilon = 1e-12);
        assert_eq!(f.segments, [Some(4), None]);
        assert_eq!(f.is_start, [true, false]);
    }

    #[test]
    fn folded_family_is_degenerate() {
        let a = arm(0, Vector3::x(), 1.0);
        assert!(family(&a, Some(&a)).is_err());
    }

    #[test]
    fn orient_flips_b_then_swaps() {
        let a = family(&arm(0, Vector3::x(), 1.0), None).unwrap();
        let b = family(&arm(1, -Vector3::y(), 1.0), None).unwrap();
        // A = -X, B = +Y: A x B = -Z, so the families swap under +Z.
        let (na, nb) = orient(a, b, &Vector3::z());
        assert_eq!(na.segments[0], Some(1));
        assert_eq!(nb.segments[0], Some(0));
        assert!(na.edge.cross(&nb.edge).dot(&Vector3::z()) >= 0.0);

        let c = family(&arm(2, Vector3::new(-1.0, 1.0, 0.0).normalize(), 1.0), None).unwrap();
        let (na, nb) = orient(a, c, &Vector3::z());
        assert!(na.edge.dot(&nb.edge) >= 0.0);
        assert!(na.edge.cross(&nb.edge).dot(&Vector3::z()) >= 0.0);
    }
}
