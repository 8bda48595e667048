pub mod angle;
pub mod plane_fit;

pub use angle::{normalize_angle, project_onto_plane, signed_angle};
pub use plane_fit::fit_plane_normal;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3x3 matrix type.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// The world up axis, used whenever a node normal cannot be derived.
#[must_use]
pub fn z_axis() -> Vector3 {
    Vector3::new(0.0, 0.0, 1.0)
}
