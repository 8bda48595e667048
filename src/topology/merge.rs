use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::node::{Node, NodeId, NormalHint};

/// Deduplicates curve endpoints into a node cloud.
///
/// Merging depends only on insertion order: a point joins the nearest
/// existing node (the first inserted one on exact ties) when it lies within
/// the tolerance, and otherwise becomes a new node.
#[derive(Debug, Clone)]
pub struct NodeMerger {
    nodes: Vec<Node>,
    tolerance: f64,
}

impl NodeMerger {
    /// Creates an empty merger.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            nodes: Vec::new(),
            tolerance,
        }
    }

    /// Returns the index of the node `point` merges into, appending a new
    /// node if none is close enough.
    pub fn add_node(&mut self, point: Point3) -> NodeId {
        match self.closest_with_distance(&point) {
            Some((idx, dist)) if dist <= self.tolerance => idx,
            _ => {
                self.nodes.push(Node::new(point));
                self.nodes.len() - 1
            }
        }
    }

    /// Index of the node nearest to `point`.
    #[must_use]
    pub fn closest_node(&self, point: &Point3) -> Option<NodeId> {
        self.closest_with_distance(point).map(|(idx, _)| idx)
    }

    fn closest_with_distance(&self, point: &Point3) -> Option<(NodeId, f64)> {
        nearest_node(&self.nodes, point)
    }

    /// Applies caller-supplied normals.
    ///
    /// Hints with a reference position overwrite the normal of their nearest
    /// node. The first global hint then fills every node that received no
    /// explicit normal. Returns the global normal, if one was given, and the
    /// nodes still lacking a normal when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a hint vector has zero length.
    pub fn apply_hints(&mut self, hints: &[NormalHint]) -> Result<Vec<NodeId>> {
        let mut explicit = vec![false; self.nodes.len()];

        for hint in hints {
            let Some(reference) = hint.reference else {
                continue;
            };
            let normal = unit_hint(&hint.vector)?;
            if let Some(idx) = self.closest_node(&reference) {
                self.nodes[idx].normal = Some(normal);
                explicit[idx] = true;
            }
        }

        let mut globals = hints.iter().filter(|h| h.reference.is_none());
        let global = globals.next();
        let ignored = globals.count();
        if ignored > 0 {
            tracing::warn!(ignored, "only the first global normal hint is applied");
        }

        let pending: Vec<NodeId> = (0..self.nodes.len()).filter(|&i| !explicit[i]).collect();
        if let Some(global) = global {
            let normal = unit_hint(&global.vector)?;
            for &i in &pending {
                self.nodes[i].normal = Some(normal);
            }
            return Ok(Vec::new());
        }
        Ok(pending)
    }

    /// Returns the merged nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Consumes the merger, returning the node array.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// Nearest node to `point` and its distance; the lowest index wins ties.
pub(super) fn nearest_node(nodes: &[Node], point: &Point3) -> Option<(NodeId, f64)> {
    let mut best: Option<(NodeId, f64)> = None;
    for (i, n) in nodes.iter().enumerate() {
        let d = (n.point - point).norm();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

fn unit_hint(v: &Vector3) -> Result<Vector3> {
    v.try_normalize(TOLERANCE)
        .ok_or_else(|| GeometryError::ZeroVector.into())
}
