pub mod curve;

pub use curve::{Arc, Curve, CurveDomain, Line, Polyline};
