use crate::topology::{Joint, JointId, JointLinks, SegmentId};

/// Which way a rod chain is being walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// From a segment's start joint towards its end joint.
    Forward,
    /// From a segment's end joint towards its start joint.
    Backward,
}

/// Computes a consistent traversal direction for every physical rod.
///
/// Each segment gets a flag: `true` keeps its endpoint order, `false` means
/// the segment runs against its rod and must be reversed. Segments are
/// visited in index order; the first unvisited segment of a chain fixes the
/// chain's direction and the chain is then walked both ways through the
/// joints until it ends, leaves the rod, or closes on itself.
#[derive(Debug)]
pub struct ResolveOrientation<'a> {
    links: &'a [JointLinks],
    joints: &'a [Joint],
}

impl<'a> ResolveOrientation<'a> {
    /// Creates a new `ResolveOrientation` operation over the per-segment
    /// joint links and the joints they refer to.
    #[must_use]
    pub fn new(links: &'a [JointLinks], joints: &'a [Joint]) -> Self {
        Self { links, joints }
    }

    /// Executes the trace, returning one keep flag per segment.
    #[must_use]
    pub fn execute(&self) -> Vec<bool> {
        let n = self.links.len();
        let mut visited = vec![false; n];
        let mut keep = vec![true; n];

        for s in 0..n {
            if visited[s] {
                continue;
            }
            visited[s] = true;
            keep[s] = true;

            if self.links[s].end.is_some() {
                self.trace(s, Direction::Forward, &mut visited, &mut keep);
            }
            if self.links[s].start.is_some() {
                self.trace(s, Direction::Backward, &mut visited, &mut keep);
            }
        }

        tracing::debug!(
            segments = n,
            reversed = keep.iter().filter(|k| !**k).count(),
            "rod orientation resolved"
        );
        keep
    }

    /// Walks from `from` through the joint at its leading end.
    fn trace(&self, from: SegmentId, dir: Direction, visited: &mut [bool], keep: &mut [bool]) {
        let leading = |links: &JointLinks| match dir {
            Direction::Forward => (links.start, links.end),
            Direction::Backward => (links.end, links.start),
        };

        let mut current = from;
        let mut joint: Option<JointId> = leading(&self.links[from]).1;
        let mut length = 1usize;

        while let Some(j) = joint {
            let Some(next) = self.joints.get(j).and_then(|jt| jt.rod_continuation(current)) else {
                break;
            };
            if visited[next] {
                break;
            }
            visited[next] = true;

            let (entry, exit) = leading(&self.links[next]);
            if entry == Some(j) {
                keep[next] = true;
                joint = exit;
            } else {
                keep[next] = false;
                joint = entry;
            }
            current = next;
            length += 1;
        }

        tracing::trace!(from, ?dir, length, "traced rod chain");
    }
}
