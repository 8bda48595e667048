use std::collections::BTreeSet;

use crate::error::{OperationError, Result, TopologyError};
use crate::geometry::curve::{Curve, Line};
use crate::math::{
    fit_plane_normal, normalize_angle, project_onto_plane, signed_angle, z_axis, Point3, Vector3,
    TOLERANCE,
};
use crate::operations::LinkageParams;

use super::merge::{nearest_node, NodeMerger};
use super::node::{Node, NodeId, NormalHint};
use super::segment::{Segment, SegmentCurve, SegmentId, SegmentInput, SegmentKind};

/// Nodes, segments and the node-to-segment incidence of a curve network.
///
/// Incident segments are kept in insertion (segment index) order, which
/// makes every query deterministic; cyclic order around a node is only
/// available through [`EdgeGraph::sorted_incident_edges`].
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGraph {
    nodes: Vec<Node>,
    segments: Vec<Segment>,
    incident: Vec<Vec<SegmentId>>,
}

impl EdgeGraph {
    /// Builds the graph from input curves and normal hints.
    ///
    /// Endpoints are merged within `params.merge_tolerance`; node normals
    /// come from the hints, or from the incident edges when no global hint
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns an error for subdivisions below 2, zero normal hints, or a
    /// segment whose endpoints merge into a single node.
    pub fn new(
        inputs: &[SegmentInput],
        hints: &[NormalHint],
        params: &LinkageParams,
    ) -> Result<Self> {
        let mut merger = NodeMerger::new(params.merge_tolerance);
        let mut segments = Vec::with_capacity(inputs.len());

        for (i, input) in inputs.iter().enumerate() {
            if input.subdivision < 2 {
                return Err(OperationError::InvalidSubdivision {
                    count: input.subdivision,
                }
                .into());
            }

            let start = input.curve.point_at_start()?;
            let end = input.curve.point_at_end()?;
            let curve = if params.straighten_segments {
                SegmentCurve::Line(Line::from_points(start, end)?)
            } else {
                input.curve.clone()
            };

            let nodes = [merger.add_node(start), merger.add_node(end)];
            if nodes[0] == nodes[1] {
                return Err(TopologyError::InvalidTopology(format!(
                    "segment {i} starts and ends at node {}",
                    nodes[0]
                ))
                .into());
            }

            let kind = if curve.is_linear(params.linear_tolerance) {
                SegmentKind::Straight
            } else {
                SegmentKind::Curved
            };
            segments.push(Segment {
                nodes,
                rest_length: curve.length(),
                curve,
                subdivision: input.subdivision,
                kind,
                label: input.label,
                index_in_ribbon: input.index_in_ribbon,
            });
        }

        let pending = merger.apply_hints(hints)?;
        let nodes = merger.into_nodes();

        let mut incident = vec![Vec::new(); nodes.len()];
        for (i, s) in segments.iter().enumerate() {
            incident[s.nodes[0]].push(i);
            incident[s.nodes[1]].push(i);
        }

        let mut graph = Self {
            nodes,
            segments,
            incident,
        };
        graph.finalize_normals(&pending)?;

        tracing::debug!(
            nodes = graph.num_nodes(),
            segments = graph.num_segments(),
            "edge graph built"
        );
        Ok(graph)
    }

    /// Gives every node in `pending` a normal derived from its incident edges.
    fn finalize_normals(&mut self, pending: &[NodeId]) -> Result<()> {
        for &node in pending {
            let normal = if (2..=4).contains(&self.valence(node)) {
                self.compute_normal_from_incident_edges(node)?
            } else {
                z_axis()
            };
            self.nodes[node].normal = Some(normal);
        }
        Ok(())
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn node(&self, node: NodeId) -> std::result::Result<&Node, TopologyError> {
        self.nodes
            .get(node)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("node {node}")))
    }

    /// Returns the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn segment(&self, segment: SegmentId) -> std::result::Result<&Segment, TopologyError> {
        self.segments
            .get(segment)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("segment {segment}")))
    }

    /// Number of segments incident to `node`.
    #[must_use]
    pub fn valence(&self, node: NodeId) -> usize {
        self.incident.get(node).map_or(0, Vec::len)
    }

    /// Segments incident to `node`, in segment index order.
    #[must_use]
    pub fn incident_edges(&self, node: NodeId) -> &[SegmentId] {
        self.incident
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The endpoint of `segment` that is not `node`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTopology` if `segment` does not touch `node`.
    pub fn other_endpoint(
        &self,
        node: NodeId,
        segment: SegmentId,
    ) -> std::result::Result<NodeId, TopologyError> {
        let s = self.segment(segment)?;
        if s.nodes[0] == node {
            Ok(s.nodes[1])
        } else if s.nodes[1] == node {
            Ok(s.nodes[0])
        } else {
            Err(TopologyError::InvalidTopology(format!(
                "segment {segment} is not incident to node {node}"
            )))
        }
    }

    /// Nodes reached from `node` through one incident segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the incidence is inconsistent.
    pub fn neighbors(&self, node: NodeId) -> std::result::Result<BTreeSet<NodeId>, TopologyError> {
        self.incident_edges(node)
            .iter()
            .map(|&e| self.other_endpoint(node, e))
            .collect()
    }

    /// Returns whether `node` is the start endpoint of `segment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment does not exist.
    pub fn is_start_node(
        &self,
        node: NodeId,
        segment: SegmentId,
    ) -> std::result::Result<bool, TopologyError> {
        Ok(self.segment(segment)?.starts_at(node))
    }

    /// Unit tangent of `segment` pointing away from `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is not incident or its tangent is degenerate.
    pub fn outward_tangent(&self, node: NodeId, segment: SegmentId) -> Result<Vector3> {
        let s = self.segment(segment)?;
        if s.nodes[0] == node {
            s.curve.tangent_at_start()
        } else if s.nodes[1] == node {
            Ok(-s.curve.tangent_at_end()?)
        } else {
            Err(TopologyError::InvalidTopology(format!(
                "segment {segment} is not incident to node {node}"
            ))
            .into())
        }
    }

    /// Index of the node nearest to `point`.
    #[must_use]
    pub fn closest_node(&self, point: &Point3) -> Option<NodeId> {
        nearest_node(&self.nodes, point).map(|(i, _)| i)
    }

    /// Least-squares plane normal through the far endpoints of the incident
    /// segments; the node itself joins the fit when fewer than three exist.
    fn fitted_normal(&self, node: NodeId) -> std::result::Result<Option<Vector3>, TopologyError> {
        let mut pts: Vec<Point3> = self
            .incident_edges(node)
            .iter()
            .map(|&e| self.other_endpoint(node, e).map(|v| self.nodes[v].point))
            .collect::<std::result::Result<_, _>>()?;
        if pts.len() < 3 {
            pts.push(self.node(node)?.point);
        }
        Ok(fit_plane_normal(&pts))
    }

    /// Incident segments ordered counter-clockwise around the node normal.
    ///
    /// The first incident segment is the reference; the others follow by
    /// increasing angle in `[0, 2pi)` of their projected outward tangents.
    ///
    /// # Errors
    ///
    /// Returns an error if a tangent is degenerate or the incidence is inconsistent.
    pub fn sorted_incident_edges(&self, node: NodeId) -> Result<Vec<SegmentId>> {
        let edges = self.incident_edges(node);
        let Some((&first, rest)) = edges.split_first() else {
            return Ok(Vec::new());
        };

        let normal = match self.node(node)?.normal {
            Some(n) => n,
            None => self.fitted_normal(node)?.unwrap_or_else(z_axis),
        };

        let v0 = project_onto_plane(&self.outward_tangent(node, first)?, &normal);
        let mut angles = Vec::with_capacity(rest.len());
        for &e in rest {
            let vk = project_onto_plane(&self.outward_tangent(node, e)?, &normal);
            angles.push((e, normalize_angle(signed_angle(&normal, &v0, &vk))));
        }
        angles.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut sorted = Vec::with_capacity(edges.len());
        sorted.push(first);
        sorted.extend(angles.into_iter().map(|(e, _)| e));
        Ok(sorted)
    }

    /// Node normal from the outward tangents of the incident segments.
    ///
    /// Sums the cross products of consecutive tangents (cyclically, in
    /// incidence order), flipping each one onto the side of the running sum.
    /// Falls back to a plane fit, then +Z, when the sum vanishes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTopology` if the valence is outside `[2, 4]`.
    pub fn compute_normal_from_incident_edges(&self, node: NodeId) -> Result<Vector3> {
        let edges = self.incident_edges(node);
        let valence = edges.len();
        if !(2..=4).contains(&valence) {
            return Err(TopologyError::InvalidTopology(format!(
                "cannot derive a normal at node {node} with valence {valence}"
            ))
            .into());
        }

        let tangents = edges
            .iter()
            .map(|&e| self.outward_tangent(node, e))
            .collect::<Result<Vec<_>>>()?;

        let mut n = Vector3::zeros();
        for i in 0..valence {
            let cross = tangents[i].cross(&tangents[(i + 1) % valence]);
            if n.dot(&cross) >= 0.0 {
                n += cross;
            } else {
                n -= cross;
            }
        }

        if let Some(n) = n.try_normalize(TOLERANCE) {
            return Ok(n);
        }
        let fallback = self.fitted_normal(node)?;
        tracing::warn!(
            node,
            fitted = fallback.is_some(),
            "incident tangents are collinear; falling back for node normal"
        );
        Ok(fallback.unwrap_or_else(z_axis))
    }

    /// A new graph in which every segment with `keep[i] == false` has its
    /// endpoints and curve direction swapped.
    ///
    /// # Errors
    ///
    /// Returns an error if `keep` does not have one flag per segment.
    pub fn reversed(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.segments.len() {
            return Err(OperationError::InvalidInput(format!(
                "{} orientation flags for {} segments",
                keep.len(),
                self.segments.len()
            ))
            .into());
        }
        let segments = self
            .segments
            .iter()
            .zip(keep)
            .map(|(s, &k)| if k { s.clone() } else { s.reversed() })
            .collect();
        Ok(Self {
            nodes: self.nodes.clone(),
            segments,
            incident: self.incident.clone(),
        })
    }
}
