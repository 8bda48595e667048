pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{Result, RodlinkError};
pub use operations::{BuildLinkage, LinkageParams, ResolvedGraph, SolverArrays};
