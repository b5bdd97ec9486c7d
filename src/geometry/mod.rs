pub mod surface;

pub use surface::{Cylinder, Plane, Surface, SurfaceDomain};

use crate::math::{Point3, Vector3};

/// The exact description of a planar face: its unit normal and a point on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarFace {
    /// Outward unit normal of the face.
    pub normal: Vector3,
    /// A point lying on the face.
    pub origin: Point3,
}

impl PlanarFace {
    /// Returns the infinite plane through this face.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored normal is zero-length.
    pub fn plane(&self) -> crate::error::Result<Plane> {
        Plane::from_normal(self.origin, self.normal)
    }
}
