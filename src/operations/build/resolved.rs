use crate::error::{Result, TopologyError};
use crate::math::Point3;
use crate::operations::{BuildCenterline, LinkageParams, RibbonLayout};
use crate::topology::{EdgeGraph, Joint, JointId, JointLinks, NodeId, SegmentId};

use super::connectivity::check_connectivity;
use super::provisional::JointAssignment;

/// The finished linkage: consistently oriented segments, final joints and
/// rebuilt centerlines.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGraph {
    graph: EdgeGraph,
    assignment: JointAssignment,
    orientation: Vec<bool>,
    centerlines: Vec<Vec<Point3>>,
    ribbons: RibbonLayout,
}

impl ResolvedGraph {
    /// Builds the final linkage on an already reoriented graph.
    pub(super) fn build(
        graph: EdgeGraph,
        orientation: Vec<bool>,
        params: &LinkageParams,
    ) -> Result<Self> {
        // Step 1: final joints from consistently oriented tangents.
        let assignment = JointAssignment::classify(&graph, params)?;
        let first = assignment.first_joint_node().ok_or(TopologyError::NoJoints)?;

        // Step 2: every node must hang off the joint network.
        check_connectivity(&graph, first)?;

        // Step 3: centerlines with joint ends reserved.
        let centerlines = (0..graph.num_segments())
            .map(|si| centerline(&graph, &assignment, si))
            .collect::<Result<Vec<_>>>()?;

        let ribbons = RibbonLayout::from_segments(graph.segments());

        tracing::debug!(
            joints = assignment.joints.len(),
            segments = graph.num_segments(),
            ribbons_a = ribbons.family_a().len(),
            ribbons_b = ribbons.family_b().len(),
            "linkage resolved"
        );

        Ok(Self {
            graph,
            assignment,
            orientation,
            centerlines,
            ribbons,
        })
    }

    /// The reoriented graph.
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

    /// Joint sitting at `node`, if any.
    #[must_use]
    pub fn joint_at_node(&self, node: NodeId) -> Option<JointId> {
        self.assignment.joint_at_node.get(node).copied().flatten()
    }

    /// Node the connectivity search started from.
    #[must_use]
    pub fn first_joint_node(&self) -> Option<NodeId> {
        self.assignment.first_joint_node()
    }

    /// Keep flags that were applied to the input segments.
    #[must_use]
    pub fn orientation(&self) -> &[bool] {
        &self.orientation
    }

    #[must_use]
    pub fn centerlines(&self) -> &[Vec<Point3>] {
        &self.centerlines
    }

    #[must_use]
    pub fn centerline(&self, segment: SegmentId) -> Option<&[Point3]> {
        self.centerlines.get(segment).map(Vec::as_slice)
    }

    #[must_use]
    pub fn ribbons(&self) -> &RibbonLayout {
        &self.ribbons
    }
}

/// Centerline of one segment, reserving half a joint edge at linked ends.
fn centerline(
    graph: &EdgeGraph,
    assignment: &JointAssignment,
    si: SegmentId,
) -> Result<Vec<Point3>> {
    let segment = graph.segment(si)?;
    let links = assignment.links[si];

    let half_edge = |joint: JointId| {
        assignment
            .joints
            .get(joint)
            .and_then(|j| j.edge_for(si))
            .map(|v| v * 0.5)
            .ok_or_else(|| {
                TopologyError::InvalidTopology(format!(
                    "segment {si} is linked to joint {joint} but not part of it"
                ))
            })
    };

    let mut op = BuildCenterline::new(&segment.curve, segment.subdivision);
    if let Some(j) = links.start {
        op = op.with_start(half_edge(j)?);
    }
    if let Some(j) = links.end {
        op = op.with_end(half_edge(j)?);
    }
    op.execute()
}
