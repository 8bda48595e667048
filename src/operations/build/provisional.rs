use crate::error::Result;
use crate::operations::{ClassifyJoint, LinkageParams, ResolveOrientation};
use crate::topology::{EdgeGraph, Joint, JointId, JointLinks, NodeId};

use super::resolved::ResolvedGraph;

/// Joints and the segment-to-joint links derived from one graph.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct JointAssignment {
    pub joints: Vec<Joint>,
    pub links: Vec<JointLinks>,
    pub joint_at_node: Vec<Option<JointId>>,
}

impl JointAssignment {
    /// Classifies every node in index order and links incident segments.
    pub fn classify(graph: &EdgeGraph, params: &LinkageParams) -> Result<Self> {
        let mut joints = Vec::new();
        let mut links = vec![JointLinks::default(); graph.num_segments()];
        let mut joint_at_node = vec![None; graph.num_nodes()];

        for node in 0..graph.num_nodes() {
            let Some(joint) = ClassifyJoint::new(node)
                .skip_triangle_check(params.skip_triangle_check)
                .execute(graph)?
            else {
                continue;
            };
            let id = joints.len();
            for &e in graph.incident_edges(node) {
                if graph.segment(e)?.starts_at(node) {
                    links[e].start = Some(id);
                } else {
                    links[e].end = Some(id);
                }
            }
            joint_at_node[node] = Some(id);
            joints.push(joint);
        }

        Ok(Self {
            joints,
            links,
            joint_at_node,
        })
    }

    /// Node of the first joint, in node order.
    pub fn first_joint_node(&self) -> Option<NodeId> {
        self.joints.first().map(|j| j.node)
    }
}

/// First build phase: joints classified on the segments as they were given.
///
/// Segment directions may still disagree along a rod, so the joint edge
/// vectors here are only used to trace rods; [`ProvisionalGraph::resolve`]
/// produces the final linkage.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionalGraph {
    graph: EdgeGraph,
    assignment: JointAssignment,
    params: LinkageParams,
}

impl ProvisionalGraph {
    /// Classifies the joints of `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if a node cannot be classified.
    pub fn new(graph: EdgeGraph, params: &LinkageParams) -> Result<Self> {
        let assignment = JointAssignment::classify(&graph, params)?;
        tracing::debug!(
            joints = assignment.joints.len(),
            "provisional joints classified"
        );
        Ok(Self {
            graph,
            assignment,
            params: *params,
        })
    }

    #[must_use]
    pub fn graph(&self) -> &EdgeGraph {
        &self.graph
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.assignment.joints
    }

    /// Start/end joints of every segment.
    #[must_use]
    pub fn links(&self) -> &[JointLinks] {
        &self.assignment.links
    }

    /// Keep flag per segment from tracing the provisional rods.
    #[must_use]
    pub fn orientation(&self) -> Vec<bool> {
        ResolveOrientation::new(&self.assignment.links, &self.assignment.joints).execute()
    }

    /// Second build phase: reorients segments and rebuilds everything on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the network has no joint, is disconnected, or a
    /// centerline cannot be built.
    pub fn resolve(self) -> Result<ResolvedGraph> {
        let keep = self.orientation();
        let graph = self.graph.reversed(&keep)?;
        ResolvedGraph::build(graph, keep, &self.params)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Line;
    use crate::math::Point3;
    use crate::topology::SegmentInput;

    #[test]
    fn links_follow_segment_direction() {
        // 0 -> 1 <- 2: the middle node is the end of both segments.
        let a = Line::from_points(Point3::origin(), Point3::new(1.0, 0.0, 0.0)).unwrap();
        let b = Line::from_points(Point3::new(2.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)).unwrap();
        let inputs = [SegmentInput::new(a, 4), SegmentInput::new(b, 4)];
        let params = LinkageParams::default();
        let g = EdgeGraph::new(&inputs, &[], &params).unwrap();
        let p = ProvisionalGraph::new(g, &params).unwrap();

        assert_eq!(p.joints().len(), 1);
        assert_eq!(p.links()[0], JointLinks { start: None, end: Some(0) });
        assert_eq!(p.links()[1], JointLinks { start: None, end: Some(0) });
        assert_eq!(p.orientation(), vec![true, false]);
    }
}
