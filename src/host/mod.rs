//! The host document collaborator.
//!
//! The engine never talks to a concrete CAD application. Everything it needs
//! (element geometry, face queries, spatial lookup, paint) goes through the
//! [`Document`] trait, so a real host adapter and the in-memory
//! [`MemoryDocument`](crate::memory::MemoryDocument) are interchangeable.

mod ids;

pub use ids::{ElementId, FaceHandle, MaterialId, SolidHandle};

use crate::error::HostError;
use crate::geometry::PlanarFace;
use crate::math::{Aabb, Point3, Vector3};

/// Result of a single host call.
pub type HostResult<T> = Result<T, HostError>;

/// One triangle of a face tessellation.
pub type Triangle = [Point3; 3];

/// A solid body reported by the host, with its enclosed volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solid {
    /// Host handle used to query the solid's faces.
    pub handle: SolidHandle,
    /// Enclosed volume in model units cubed.
    pub volume: f64,
}

/// One entry of an element's geometric representation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryObject {
    /// A closed body.
    Solid(Solid),
    /// A nested instance (family/block) exposing its own geometry.
    Instance(Vec<GeometryObject>),
    /// Anything the engine does not classify (curves, points, text).
    Other,
}

/// Capabilities the engine consumes from the host document.
///
/// Query methods take `&self`. Paint methods take `&mut self`: holding the
/// exclusive borrow is the caller's mutation scope, and the engine never
/// opens or commits one on its own.
pub trait Document {
    /// Returns the element's geometry at the host's fine detail level.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not exist or has no readable
    /// geometry.
    fn element_geometry(&self, element: ElementId) -> HostResult<Vec<GeometryObject>>;

    /// Returns the faces bounding a solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid handle is stale.
    fn solid_faces(&self, solid: SolidHandle) -> HostResult<Vec<FaceHandle>>;

    /// Computes the unit normal of a face at normalized parameters in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is unknown or its normal is degenerate.
    fn face_normal(&self, face: FaceHandle, u: f64, v: f64) -> HostResult<Vector3>;

    /// Returns the exact normal and origin if the face is planar.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is unknown.
    fn planar_face(&self, face: FaceHandle) -> HostResult<Option<PlanarFace>>;

    /// Triangulates the face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is unknown or cannot be meshed.
    fn triangulate_face(&self, face: FaceHandle) -> HostResult<Vec<Triangle>>;

    /// Lists elements whose bounding box intersects `bbox`.
    ///
    /// # Errors
    ///
    /// Returns an error if the spatial query fails.
    fn elements_intersecting(&self, bbox: &Aabb) -> HostResult<Vec<ElementId>>;

    /// Returns the element's category name.
    fn element_category(&self, element: ElementId) -> Option<String>;

    /// Returns the display value of a named parameter on the element.
    fn element_parameter(&self, element: ElementId, parameter: &str) -> Option<String>;

    /// Assigns a material to one face of an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the paint, e.g. because the face
    /// is already painted.
    fn paint(
        &mut self,
        element: ElementId,
        face: FaceHandle,
        material: MaterialId,
    ) -> HostResult<()>;

    /// Removes the material assignment from one face of an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the call, e.g. because the face
    /// is not painted.
    fn remove_paint(&mut self, element: ElementId, face: FaceHandle) -> HostResult<()>;

    /// Returns the material currently painted on the face, if any.
    fn painted_material(&self, element: ElementId, face: FaceHandle) -> Option<MaterialId>;

    /// Resolves a material by exact, case-sensitive name. First match wins.
    fn material_by_name(&self, name: &str) -> Option<MaterialId>;
}
