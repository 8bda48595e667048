use crate::math::{Point3, Vector3};

use super::node::NodeId;
use super::segment::SegmentId;

/// Index of a joint in the joint array.
pub type JointId = usize;

/// One of the two crossing rod families meeting at a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    A,
    B,
}

/// The segments of one rod family at a joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointFamily {
    /// Averaged, length-scaled edge vector of the family.
    pub edge: Vector3,
    /// Up to two segments; the second is `None` for a rod that ends here.
    pub segments: [Option<SegmentId>; 2],
    /// For each segment, whether this joint sits at the segment's start node.
    pub is_start: [bool; 2],
}

impl JointFamily {
    /// Number of segments in the family (1 or 2).
    #[must_use]
    pub fn count(&self) -> usize {
        self.segments.iter().flatten().count()
    }

    /// Returns whether `segment` belongs to this family.
    #[must_use]
    pub fn contains(&self, segment: SegmentId) -> bool {
        self.segments.contains(&Some(segment))
    }

    /// The other member of a two-segment family.
    #[must_use]
    pub fn sibling(&self, segment: SegmentId) -> Option<SegmentId> {
        match self.segments {
            [Some(a), Some(b)] if a == segment => Some(b),
            [Some(a), Some(b)] if b == segment => Some(a),
            _ => None,
        }
    }
}

/// Where two rod families cross.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// The node the joint sits at.
    pub node: NodeId,
    pub position: Point3,
    pub normal: Vector3,
    pub family_a: JointFamily,
    pub family_b: JointFamily,
}

impl Joint {
    /// Number of incident segments.
    #[must_use]
    pub fn valence(&self) -> usize {
        self.family_a.count() + self.family_b.count()
    }

    #[must_use]
    pub fn num_a(&self) -> usize {
        self.family_a.count()
    }

    #[must_use]
    pub fn num_b(&self) -> usize {
        self.family_b.count()
    }

    #[must_use]
    pub fn edge_a(&self) -> Vector3 {
        self.family_a.edge
    }

    #[must_use]
    pub fn edge_b(&self) -> Vector3 {
        self.family_b.edge
    }

    #[must_use]
    pub fn len_a(&self) -> f64 {
        self.family_a.edge.norm()
    }

    #[must_use]
    pub fn len_b(&self) -> f64 {
        self.family_b.edge.norm()
    }

    /// Returns the family holding `segment`, if it is incident.
    #[must_use]
    pub fn family_of(&self, segment: SegmentId) -> Option<Family> {
        if self.family_a.contains(segment) {
            Some(Family::A)
        } else if self.family_b.contains(segment) {
            Some(Family::B)
        } else {
            None
        }
    }

    #[must_use]
    pub fn family(&self, family: Family) -> &JointFamily {
        match family {
            Family::A => &self.family_a,
            Family::B => &self.family_b,
        }
    }

    /// Edge vector of the family `segment` belongs to.
    #[must_use]
    pub fn edge_for(&self, segment: SegmentId) -> Option<Vector3> {
        self.family_of(segment).map(|f| self.family(f).edge)
    }

    /// The segment that continues `segment` within its family at this joint.
    ///
    /// Returns `None` if the family has a single member or `segment` is not
    /// incident.
    #[must_use]
    pub fn continuation_segment(&self, segment: SegmentId) -> Option<SegmentId> {
        self.family_a
            .sibling(segment)
            .or_else(|| self.family_b.sibling(segment))
    }

    /// The segment a physical rod continues into when it passes this joint.
    ///
    /// Same as [`Self::continuation_segment`], except at a valence-2 joint,
    /// where the two single-member families join end to end.
    #[must_use]
    pub fn rod_continuation(&self, segment: SegmentId) -> Option<SegmentId> {
        if self.valence() == 2 {
            let a = self.family_a.segments[0];
            let b = self.family_b.segments[0];
            return match (a, b) {
                (Some(a), Some(b)) if a == segment => Some(b),
                (Some(a), Some(b)) if b == segment => Some(a),
                _ => None,
            };
        }
        self.continuation_segment(segment)
    }

    /// Is this joint's normal on the same side as `normal`?
    #[must_use]
    pub fn is_normal_consistent(&self, normal: &Vector3) -> bool {
        self.normal.dot(normal) >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(segments: [Option<SegmentId>; 2]) -> JointFamily {
        JointFamily {
            edge: Vector3::x(),
            segments,
            is_start: [true, false],
        }
    }

    fn joint(a: [Option<SegmentId>; 2], b: [Option<SegmentId>; 2]) -> Joint {
        Joint {
            node: 0,
            position: Point3::origin(),
            normal: Vector3::z(),
            family_a: family(a),
            family_b: family(b),
        }
    }

    #[test]
    fn continuation_within_two_member_family() {
        let j = joint([Some(3), Some(7)], [Some(1), None]);
        assert_eq!(j.continuation_segment(3), Some(7));
        assert_eq!(j.continuation_segment(7), Some(3));
        assert_eq!(j.continuation_segment(1), None);
        assert_eq!(j.continuation_segment(9), None);
        assert_eq!(j.valence(), 3);
    }

    #[test]
    fn valence_two_joint_continues_across_families() {
        let j = joint([Some(4), None], [Some(5), None]);
        assert_eq!(j.continuation_segment(4), None);
        assert_eq!(j.rod_continuation(4), Some(5));
        assert_eq!(j.rod_continuation(5), Some(4));
        assert_eq!(j.rod_continuation(6), None);
    }

    #[test]
    fn family_lookup() {
        let j = joint([Some(0), Some(2)], [Some(1), Some(3)]);
        assert_eq!(j.family_of(2), Some(Family::A));
        assert_eq!(j.family_of(3), Some(Family::B));
        assert_eq!(j.family_of(8), None);
        assert_eq!(j.num_a(), 2);
        assert_eq!(j.num_b(), 2);
        assert!(j.is_normal_consistent(&Vector3::new(0.0, 0.3, 0.1)));
        assert!(!j.is_normal_consistent(&-Vector3::z()));
    }
}
