use crate::error::Result;
use crate::geometry::curve::{Arc, Curve, CurveDomain, Line, Polyline};
use crate::math::{Point3, Vector3};

use super::joint::JointId;
use super::node::NodeId;

/// Index of a segment (raw edge) in the segment array.
pub type SegmentId = usize;

/// The geometric curve underlying a segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentCurve {
    /// A straight segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
    /// A sampled free-form curve.
    Polyline(Polyline),
}

impl From<Line> for SegmentCurve {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for SegmentCurve {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<Polyline> for SegmentCurve {
    fn from(polyline: Polyline) -> Self {
        Self::Polyline(polyline)
    }
}

macro_rules! dispatch {
    ($self:ident, $c:ident => $body:expr) => {
        match $self {
            SegmentCurve::Line($c) => $body,
            SegmentCurve::Arc($c) => $body,
            SegmentCurve::Polyline($c) => $body,
        }
    };
}

impl Curve for SegmentCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        dispatch!(self, c => c.evaluate(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        dispatch!(self, c => c.tangent(t))
    }

    fn domain(&self) -> CurveDomain {
        dispatch!(self, c => c.domain())
    }

    fn length_between(&self, t0: f64, t1: f64) -> f64 {
        dispatch!(self, c => c.length_between(t0, t1))
    }

    fn parameter_at_length(&self, t0: f64, distance: f64) -> f64 {
        dispatch!(self, c => c.parameter_at_length(t0, distance))
    }

    fn closest_parameter(&self, point: &Point3) -> f64 {
        dispatch!(self, c => c.closest_parameter(point))
    }

    fn is_linear(&self, tolerance: f64) -> bool {
        dispatch!(self, c => c.is_linear(tolerance))
    }

    fn trim(&self, t0: f64, t1: f64) -> Result<Self> {
        Ok(match self {
            Self::Line(c) => Self::Line(c.trim(t0, t1)?),
            Self::Arc(c) => Self::Arc(c.trim(t0, t1)?),
            Self::Polyline(c) => Self::Polyline(c.trim(t0, t1)?),
        })
    }

    fn reversed(&self) -> Self {
        match self {
            Self::Line(c) => Self::Line(c.reversed()),
            Self::Arc(c) => Self::Arc(c.reversed()),
            Self::Polyline(c) => Self::Polyline(c.reversed()),
        }
    }
}

/// Rod family a segment was labelled with by its ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentLabel {
    #[default]
    Undefined,
    RodA,
    RodB,
}

/// Whether the rest shape of a segment is straight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Straight,
    Curved,
}

/// One input curve together with its discretisation and ribbon metadata.
#[derive(Debug, Clone)]
pub struct SegmentInput {
    pub curve: SegmentCurve,
    /// Number of rod edges the centerline is divided into.
    pub subdivision: usize,
    pub label: SegmentLabel,
    /// Position of the segment inside its ribbon, if it belongs to one.
    pub index_in_ribbon: Option<usize>,
}

impl SegmentInput {
    /// Creates an unlabelled input segment.
    #[must_use]
    pub fn new(curve: impl Into<SegmentCurve>, subdivision: usize) -> Self {
        Self {
            curve: curve.into(),
            subdivision,
            label: SegmentLabel::Undefined,
            index_in_ribbon: None,
        }
    }

    /// Attaches ribbon membership.
    #[must_use]
    pub fn with_ribbon(mut self, label: SegmentLabel, index_in_ribbon: usize) -> Self {
        self.label = label;
        self.index_in_ribbon = Some(index_in_ribbon);
        self
    }
}

/// A raw edge of the network: one input curve between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Start and end node. The start node is where the curve begins.
    pub nodes: [NodeId; 2],
    pub curve: SegmentCurve,
    pub subdivision: usize,
    /// Arc length of the curve.
    pub rest_length: f64,
    pub kind: SegmentKind,
    pub label: SegmentLabel,
    pub index_in_ribbon: Option<usize>,
}

impl Segment {
    /// Physical length of one rod edge of this segment.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn edge_length(&self) -> f64 {
        self.rest_length / (self.subdivision - 1) as f64
    }

    /// Returns whether `node` is the start endpoint.
    #[must_use]
    pub fn starts_at(&self, node: NodeId) -> bool {
        self.nodes[0] == node
    }

    /// The same segment with its endpoints and curve direction swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            nodes: [self.nodes[1], self.nodes[0]],
            curve: self.curve.reversed(),
            ..self.clone()
        }
    }
}

/// Joints at the two ends of a segment; `None` marks a free rod end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JointLinks {
    pub start: Option<JointId>,
    pub end: Option<JointId>,
}
