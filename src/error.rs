use thiserror::Error;

/// Top-level error type for the rod-linkage builder.
#[derive(Debug, Error)]
pub enum RodlinkError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the node/segment/joint topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("node {node} has valence {valence}; joints support valence 2, 3 or 4")]
    UnsupportedValence { node: usize, valence: usize },

    #[error("valence-3 pairing impossible without triangle at node {node}")]
    TrianglePairing { node: usize },

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("disconnected topology: reached {reached} of {total} nodes from the first joint")]
    Disconnected { reached: usize, total: usize },

    #[error("the network contains no joint")]
    NoJoints,
}

/// Errors related to linkage operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid subdivision count {count}; at least 2 is required")]
    InvalidSubdivision { count: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`RodlinkError`].
pub type Result<T> = std::result::Result<T, RodlinkError>;
