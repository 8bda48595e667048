use crate::error::{Result, TopologyError};
use crate::math::Vector3;
use crate::topology::{EdgeGraph, NodeId, SegmentId};

/// Picks the two arms of a valence-3 node that form the straightest rod.
///
/// Pairs are scanned in `(j, k)` order with `j < k`; a strictly smaller
/// cosine replaces the current best, so the first pair wins ties. A pair is
/// skipped when the nodes at its far ends share more than one neighbor,
/// since joining them would close a triangle through the node.
///
/// Returns the local indices of the chosen arms.
pub(super) fn straightest_pair(
    graph: &EdgeGraph,
    node: NodeId,
    arms: &[SegmentId],
    outward: &[Vector3],
    skip_triangle_check: bool,
) -> Result<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut min_cos = f64::INFINITY;

    for j in 0..arms.len() {
        for k in (j + 1)..arms.len() {
            let cos = outward[j].dot(&outward[k]);
            if cos >= min_cos {
                continue;
            }
            if !skip_triangle_check && closes_triangle(graph, node, arms[j], arms[k])? {
                continue;
            }
            min_cos = cos;
            best = Some((j, k));
        }
    }

    best.ok_or_else(|| TopologyError::TrianglePairing { node }.into())
}

/// Do the far ends of `a` and `b` have a common neighbor besides `node`?
fn closes_triangle(
    graph: &EdgeGraph,
    node: NodeId,
    a: SegmentId,
    b: SegmentId,
) -> std::result::Result<bool, TopologyError> {
    let va = graph.other_endpoint(node, a)?;
    let vb = graph.other_endpoint(node, b)?;
    let na = graph.neighbors(va)?;
    let nb = graph.neighbors(vb)?;
    Ok(na.intersection(&nb).count() > 1)
}
