use crate::math::{Point3, Vector3};

/// Index of a node in the node array.
pub type NodeId = usize;

/// A merged curve endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The 3D position of the node.
    pub point: Point3,
    /// Unit normal; `None` until a hint or the incident edges provide one.
    pub normal: Option<Vector3>,
}

impl Node {
    /// Creates a node at the given point with an unset normal.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            normal: None,
        }
    }
}

/// A normal supplied by the caller.
///
/// With a reference position the normal is snapped to the nearest node;
/// without one it acts as the global default for every node that received
/// no explicit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalHint {
    /// Where the normal applies, or `None` for the global hint.
    pub reference: Option<Point3>,
    /// The normal direction.
    pub vector: Vector3,
}

impl NormalHint {
    /// A normal bound to the node closest to `reference`.
    #[must_use]
    pub fn at(reference: Point3, vector: Vector3) -> Self {
        Self {
            reference: Some(reference),
            vector,
        }
    }

    /// A normal applied to every node without an explicit one.
    #[must_use]
    pub fn global(vector: Vector3) -> Self {
        Self {
            reference: None,
            vector,
        }
    }
}
