pub mod aabb;

pub use aabb::Aabb;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Minimum volume for a solid to count as a real body, and the slack used
/// when comparing normal components against exact values.
pub const VOLUME_EPSILON: f64 = 1e-3;

/// Angular tolerance in radians (about 5 degrees).
pub const ANGLE_EPSILON: f64 = 0.087;

/// Default tolerance for matching a face against a captured plane.
pub const PLANE_TOLERANCE: f64 = 1e-3;

/// The world up direction. Vertical components are measured along it.
#[must_use]
pub fn up() -> Vector3 {
    Vector3::z()
}
