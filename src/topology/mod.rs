pub mod graph;
pub mod joint;
pub mod merge;
pub mod node;
pub mod segment;

pub use graph::EdgeGraph;
pub use joint::{Family, Joint, JointFamily, JointId};
pub use merge::NodeMerger;
pub use node::{Node, NodeId, NormalHint};
pub use segment::{
    JointLinks, Segment, SegmentCurve, SegmentId, SegmentInput, SegmentKind, SegmentLabel,
};
