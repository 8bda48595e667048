use std::collections::VecDeque;

use crate::error::{Result, TopologyError};
use crate::topology::{EdgeGraph, NodeId};

/// Verifies that every node is reachable from `start`.
///
/// The search expands through joints only; free rod ends are counted when
/// reached but not walked through.
///
/// # Errors
///
/// Returns [`TopologyError::Disconnected`] with the reached and total node
/// counts if some node cannot be reached.
pub fn check_connectivity(graph: &EdgeGraph, start: NodeId) -> Result<()> {
    let total = graph.num_nodes();
    graph.node(start)?;

    let mut seen = vec![false; total];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    let mut reached = 1usize;

    while let Some(v) = queue.pop_front() {
        for &e in graph.incident_edges(v) {
            let u = graph.other_endpoint(v, e)?;
            if seen[u] {
                continue;
            }
            seen[u] = true;
            reached += 1;
            if graph.valence(u) > 1 {
                queue.push_back(u);
            }
        }
    }

    if reached == total {
        Ok(())
    } else {
        Err(TopologyError::Disconnected { reached, total }.into())
    }
}
