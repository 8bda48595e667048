mod build;
mod centerline;
mod export;
mod joint;
mod orientation;
mod ribbon;

pub use build::{check_connectivity, BuildLinkage, ProvisionalGraph, ResolvedGraph};
pub use centerline::BuildCenterline;
pub use export::{JointArrays, SegmentArrays, SolverArrays};
pub use joint::{ClassifyJoint, JointStrategy};
pub use orientation::ResolveOrientation;
pub use ribbon::{RibbonLayout, SplitRibbon};

/// Parameters controlling how a curve network is turned into a linkage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkageParams {
    /// Distance within which curve endpoints merge into one node.
    pub merge_tolerance: f64,
    /// Maximum chord deviation for a segment to count as straight.
    pub linear_tolerance: f64,
    /// Allow valence-3 pairings that close a triangle.
    pub skip_triangle_check: bool,
    /// Replace every input curve by the chord between its endpoints.
    pub straighten_segments: bool,
}

impl Default for LinkageParams {
    fn default() -> Self {
        Self {
            merge_tolerance: 1e-3,
            linear_tolerance: 1e-6,
            skip_triangle_check: false,
            straighten_segments: false,
        }
    }
}
