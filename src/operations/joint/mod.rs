mod frame;
mod pairing;

use crate::error::{Result, TopologyError};
use crate::math::z_axis;
use crate::topology::{EdgeGraph, Joint, NodeId};

use frame::Arm;

/// How the incident segments of a node are split into rod families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointStrategy {
    /// One segment per family.
    Valence2,
    /// The straightest non-triangle pair forms family A.
    Valence3,
    /// Alternating families in cyclic order around the normal.
    Valence4,
}

impl JointStrategy {
    /// Selects the strategy for a node of the given valence.
    ///
    /// Returns `None` for free ends (valence 0 or 1).
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnsupportedValence`] for valence above 4.
    pub fn for_valence(node: NodeId, valence: usize) -> Result<Option<Self>> {
        match valence {
            0 | 1 => Ok(None),
            2 => Ok(Some(Self::Valence2)),
            3 => Ok(Some(Self::Valence3)),
            4 => Ok(Some(Self::Valence4)),
            _ => Err(TopologyError::UnsupportedValence { node, valence }.into()),
        }
    }
}

/// Classifies the segments meeting at a node into two rod families.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyJoint {
    node: NodeId,
    skip_triangle_check: bool,
}

impl ClassifyJoint {
    /// Creates a new `ClassifyJoint` operation.
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            skip_triangle_check: false,
        }
    }

    /// Allows valence-3 pairings that close a triangle.
    #[must_use]
    pub fn skip_triangle_check(mut self, skip: bool) -> Self {
        self.skip_triangle_check = skip;
        self
    }

    /// Executes the classification.
    ///
    /// Returns `None` when the node is a free rod end.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnsupportedValence`] above valence 4,
    /// [`TopologyError::TrianglePairing`] when every valence-3 pairing closes
    /// a triangle, or a geometry error for degenerate tangents.
    pub fn execute(&self, graph: &EdgeGraph) -> Result<Option<Joint>> {
        let node = self.node;
        let Some(strategy) = JointStrategy::for_valence(node, graph.valence(node))? else {
            return Ok(None);
        };

        let incident = graph.incident_edges(node);
        let arms = incident
            .iter()
            .map(|&segment| -> Result<Arm> {
                let s = graph.segment(segment)?;
                Ok(Arm {
                    segment,
                    outward: graph.outward_tangent(node, segment)?,
                    edge_length: s.edge_length(),
                    is_start: s.starts_at(node),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Local arm indices of family A and family B.
        let (a, b): (Vec<usize>, Vec<usize>) = match strategy {
            JointStrategy::Valence2 => (vec![0], vec![1]),
            JointStrategy::Valence3 => {
                let outward: Vec<_> = arms.iter().map(|a| a.outward).collect();
                let (j, k) = pairing::straightest_pair(
                    graph,
                    node,
                    incident,
                    &outward,
                    self.skip_triangle_check,
                )?;
                (vec![j, k], vec![3 - j - k])
            }
            JointStrategy::Valence4 => {
                let sorted = graph.sorted_incident_edges(node)?;
                let local = |segment: usize| incident.iter().position(|&e| e == segment);
                let order = sorted
                    .iter()
                    .map(|&e| {
                        local(e).ok_or_else(|| {
                            TopologyError::InvalidTopology(format!(
                                "segment {e} is not incident to node {node}"
                            ))
                        })
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                (vec![order[0], order[2]], vec![order[1], order[3]])
            }
        };

        let family_a = frame::family(&arms[a[0]], a.get(1).map(|&i| &arms[i]))?;
        let family_b = frame::family(&arms[b[0]], b.get(1).map(|&i| &arms[i]))?;

        let n = graph.node(node)?;
        let normal = n.normal.unwrap_or_else(z_axis);
        let (family_a, family_b) = frame::orient(family_a, family_b, &normal);

        Ok(Some(Joint {
            node,
            position: n.point,
            normal,
            family_a,
            family_b,
        }))
    }
}
