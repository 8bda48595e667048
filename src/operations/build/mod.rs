mod connectivity;
mod provisional;
mod resolved;

pub use connectivity::check_connectivity;
pub use provisional::ProvisionalGraph;
pub use resolved::ResolvedGraph;

use crate::error::Result;
use crate::operations::LinkageParams;
use crate::topology::{EdgeGraph, NormalHint, SegmentInput};

/// Builds a rod linkage from a curve network.
///
/// Runs the whole pipeline: endpoint merging and normals, provisional
/// joints, rod orientation, final joints, connectivity check, centerlines
/// and ribbon grouping. The build either succeeds completely or fails.
#[derive(Debug)]
pub struct BuildLinkage {
    inputs: Vec<SegmentInput>,
    hints: Vec<NormalHint>,
    params: LinkageParams,
}

impl BuildLinkage {
    /// Creates a new `BuildLinkage` operation with default parameters.
    #[must_use]
    pub fn new(inputs: Vec<SegmentInput>, hints: Vec<NormalHint>) -> Self {
        Self {
            inputs,
            hints,
            params: LinkageParams::default(),
        }
    }

    /// Replaces the build parameters.
    #[must_use]
    pub fn with_params(mut self, params: LinkageParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns the first error met by any phase: invalid input, unsupported
    /// valence, impossible valence-3 pairing, a network without joints, a
    /// disconnected network, or degenerate geometry.
    pub fn execute(&self) -> Result<ResolvedGraph> {
        tracing::debug!(
            segments = self.inputs.len(),
            hints = self.hints.len(),
            "building linkage"
        );

        // Step 1: nodes, normals and incidence.
        let graph = EdgeGraph::new(&self.inputs, &self.hints, &self.params)?;

        // Step 2: provisional joints on the input directions.
        let provisional = ProvisionalGraph::new(graph, &self.params)?;

        // Step 3: orient rods and rebuild.
        provisional.resolve()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{OperationError, TopologyError};
    use crate::geometry::curve::{Arc, Curve, Line};
    use crate::math::{Point3, Vector3};
    use crate::operations::{ResolveOrientation, SolverArrays};
    use crate::topology::{Joint, SegmentLabel};
    use crate::RodlinkError;
    use approx::assert_relative_eq;

    fn line(a: [f64; 3], b: [f64; 3], subdivision: usize) -> SegmentInput {
        let l = Line::from_points(Point3::from(a), Point3::from(b)).unwrap();
        SegmentInput::new(l, subdivision)
    }

    fn up() -> Vec<NormalHint> {
        vec![NormalHint::global(Vector3::z())]
    }

    /// A 3x3 grid of nodes with unit spacing: corners have valence 2, edge
    /// midpoints valence 3 and the center valence 4. Segment directions
    /// alternate so that orientation has work to do.
    fn grid() -> Vec<SegmentInput> {
        let mut inputs = Vec::new();
        for r in 0..3_i32 {
            for c in 0..2_i32 {
                let (y, x) = (f64::from(r), f64::from(c));
                let (a, b) = ([x, y, 0.0], [x + 1.0, y, 0.0]);
                let input = if (r + c) % 2 == 0 {
                    line(a, b, 6)
                } else {
                    line(b, a, 6)
                };
                inputs.push(input.with_ribbon(SegmentLabel::RodA, usize::try_from(c).unwrap()));
            }
        }
        for c in 0..3_i32 {
            for r in 0..2_i32 {
                let (x, y) = (f64::from(c), f64::from(r));
                let (a, b) = ([x, y, 0.0], [x, y + 1.0, 0.0]);
                let input = if (r + c) % 2 == 0 {
                    line(b, a, 6)
                } else {
                    line(a, b, 6)
                };
                inputs.push(input.with_ribbon(SegmentLabel::RodB, usize::try_from(r).unwrap()));
            }
        }
        inputs
    }

    fn assert_joint_invariants(resolved: &ResolvedGraph) {
        let g = resolved.graph();
        for j in resolved.joints() {
            assert_eq!(j.num_a() + j.num_b(), g.valence(j.node));
            assert!(j.edge_a().cross(&j.edge_b()).dot(&j.normal) >= -1e-12);
            for fam in [&j.family_a, &j.family_b] {
                for s in fam.segments.iter().flatten() {
                    let limit = g.segments()[*s].edge_length();
                    assert!(fam.edge.norm() <= limit + 1e-12);
                }
            }
        }
        for (node, _) in g.nodes().iter().enumerate() {
            assert_eq!(resolved.joint_at_node(node).is_some(), g.valence(node) >= 2);
        }
    }

    #[test]
    fn cross_at_origin() {
        let inputs = vec![
            line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 5),
            line([0.0, 0.0, 0.0], [-1.0, 0.0, 0.0], 5),
            line([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], 5),
            line([0.0, 0.0, 0.0], [0.0, -1.0, 0.0], 5),
        ];
        let resolved = BuildLinkage::new(inputs, up()).execute().unwrap();
        assert_eq!(resolved.joints().len(), 1);

        let j = &resolved.joints()[0];
        let mut a: Vec<_> = j.family_a.segments.iter().flatten().copied().collect();
        let mut b: Vec<_> = j.family_b.segments.iter().flatten().copied().collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, vec![0, 1]);
        assert_eq!(b, vec![2, 3]);
        assert_joint_invariants(&resolved);
    }

    #[test]
    fn y_junction() {
        let dirs = [0.0_f64, 120.0, 240.0].map(f64::to_radians);
        let inputs = dirs
            .iter()
            .map(|a| line([0.0, 0.0, 0.0], [a.cos(), a.sin(), 0.0], 5))
            .collect();
        let resolved = BuildLinkage::new(inputs, up()).execute().unwrap();
        let j = &resolved.joints()[0];
        let mut counts = [j.num_a(), j.num_b()];
        counts.sort_unstable();
        assert_eq!(counts, [1, 2]);
        assert_joint_invariants(&resolved);
    }

    #[test]
    fn scrambled_chain_is_reoriented() {
        let inputs = (0..5_i32)
            .map(|i| {
                let x = f64::from(i);
                let (a, b) = ([x, 0.0, 0.0], [x + 1.0, 0.0, 0.0]);
                if i % 2 == 0 {
                    line(a, b, 4)
                } else {
                    line(b, a, 4)
                }
            })
            .collect();
        let resolved = BuildLinkage::new(inputs, up()).execute().unwrap();
        assert_eq!(resolved.orientation(), &[true, false, true, false, true]);
        assert_eq!(resolved.joints().len(), 4);

        for s in resolved.graph().segments() {
            let t = s.curve.tangent_at_start().unwrap();
            assert_relative_eq!(t, Vector3::x(), epsilon = 1e-12);
        }
        let keep = ResolveOrientation::new(resolved.links(), resolved.joints()).execute();
        assert!(keep.iter().all(|k| *k));
    }

    #[test]
    fn ordered_chain_keeps_everything() {
        let inputs = (0..5_i32)
            .map(|i| {
                let x = f64::from(i);
                line([x, 0.0, 0.0], [x + 1.0, 0.0, 0.0], 4)
            })
            .collect();
        let resolved = BuildLinkage::new(inputs, up()).execute().unwrap();
        assert!(resolved.orientation().iter().all(|k| *k));
    }

    #[test]
    fn disjoint_chains_are_disconnected() {
        let inputs = vec![
            line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 4),
            line([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], 4),
            line([0.0, 5.0, 0.0], [1.0, 5.0, 0.0], 4),
            line([1.0, 5.0, 0.0], [2.0, 5.0, 0.0], 4),
        ];
        let err = BuildLinkage::new(inputs, up()).execute().unwrap_err();
        assert!(matches!(
            err,
            RodlinkError::Topology(TopologyError::Disconnected {
                reached: 3,
                total: 6
            })
        ));
    }

    #[test]
    fn lone_segment_has_no_joints() {
        let inputs = vec![line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 4)];
        let err = BuildLinkage::new(inputs, up()).execute().unwrap_err();
        assert!(matches!(err, RodlinkError::Topology(TopologyError::NoJoints)));
    }

    #[test]
    fn invalid_subdivision_rejected() {
        let inputs = vec![
            line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1),
            line([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], 4),
        ];
        let err = BuildLinkage::new(inputs, up()).execute().unwrap_err();
        assert!(matches!(
            err,
            RodlinkError::Operation(OperationError::InvalidSubdivision { count: 1 })
        ));
    }

    #[test]
    fn grid_builds_consistent_linkage() {
        let resolved = BuildLinkage::new(grid(), up()).execute().unwrap();
        let g = resolved.graph();
        assert_eq!(g.num_nodes(), 9);
        assert_eq!(resolved.joints().len(), 9);
        assert_joint_invariants(&resolved);

        let valences: Vec<_> = resolved.joints().iter().map(Joint::valence).collect();
        assert_eq!(valences.iter().filter(|v| **v == 4).count(), 1);
        assert_eq!(valences.iter().filter(|v| **v == 3).count(), 4);
        assert_eq!(valences.iter().filter(|v| **v == 2).count(), 4);

        // The two segments of every grid line run the same way.
        for pair in g.segments().chunks(2) {
            let t0 = pair[0].curve.tangent_at_start().unwrap();
            let t1 = pair[1].curve.tangent_at_start().unwrap();
            assert_relative_eq!(t0, t1, epsilon = 1e-12);
        }
        let keep = ResolveOrientation::new(resolved.links(), resolved.joints()).execute();
        assert!(keep.iter().all(|k| *k));

        for (si, pts) in resolved.centerlines().iter().enumerate() {
            assert_eq!(pts.len(), g.segments()[si].subdivision + 1);
        }
        assert_eq!(resolved.ribbons().family_a().len(), 3);
        assert_eq!(resolved.ribbons().family_b().len(), 3);
    }

    #[test]
    fn build_is_deterministic() {
        let a = BuildLinkage::new(grid(), up()).execute().unwrap();
        let b = BuildLinkage::new(grid(), up()).execute().unwrap();
        let (a, b) = (
            SolverArrays::from_resolved(&a).unwrap(),
            SolverArrays::from_resolved(&b).unwrap(),
        );
        assert_eq!(a, b);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.node_coords), bits(&b.node_coords));
    }

    #[test]
    fn curved_segments_with_computed_normals() {
        // Two quarter arcs crossing two straight rods at a common node.
        let arc = |start: f64| {
            Arc::new(
                Point3::new(-1.0, 0.0, 0.0),
                1.0,
                Vector3::y(),
                Vector3::x(),
                start,
                start + std::f64::consts::FRAC_PI_2,
            )
            .unwrap()
        };
        let inputs = vec![
            SegmentInput::new(arc(0.0), 8),
            SegmentInput::new(arc(-std::f64::consts::FRAC_PI_2), 8),
            line([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], 8),
            line([0.0, -1.0, 0.0], [0.0, 0.0, 0.0], 8),
        ];
        let resolved = BuildLinkage::new(inputs, Vec::new()).execute().unwrap();
        assert_eq!(resolved.joints().len(), 1);
        assert_joint_invariants(&resolved);
        assert_eq!(
            resolved.graph().segments()[0].kind,
            crate::topology::SegmentKind::Curved
        );
    }
}
