//! Geometric face predicates.
//!
//! Every predicate is a pure function of the document's current geometry.
//! The plain forms (`is_side_face`, ...) answer `false` or an empty result
//! when the geometry cannot be read, logging the cause at `debug`. The
//! `try_` forms surface that cause instead, so callers can tell a face that
//! was examined and rejected from one that could not be examined.

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::Plane;
use crate::host::{Document, ElementId, FaceHandle, GeometryObject, Solid};
use crate::math::{up, Aabb, ANGLE_EPSILON, PLANE_TOLERANCE, VOLUME_EPSILON};

/// Parametric point at which face normals are sampled.
const SAMPLE_UV: (f64, f64) = (0.5, 0.5);

/// Returns the first solid of the element whose volume exceeds
/// [`VOLUME_EPSILON`], looking one level into nested instances.
pub fn element_solid<D: Document + ?Sized>(doc: &D, element: ElementId) -> Option<Solid> {
    try_element_solid(doc, element).unwrap_or_else(|e| {
        debug!(%element, error = %e, "element geometry unreadable");
        None
    })
}

/// Fallible form of [`element_solid`].
///
/// # Errors
///
/// Returns an error if the host cannot produce the element's geometry.
pub fn try_element_solid<D: Document + ?Sized>(
    doc: &D,
    element: ElementId,
) -> Result<Option<Solid>> {
    let geometry = doc.element_geometry(element)?;
    for object in &geometry {
        match object {
            GeometryObject::Solid(solid) if solid.volume > VOLUME_EPSILON => {
                return Ok(Some(*solid));
            }
            GeometryObject::Instance(nested) => {
                let found = nested.iter().find_map(|inner| match inner {
                    GeometryObject::Solid(solid) if solid.volume > VOLUME_EPSILON => Some(*solid),
                    _ => None,
                });
                if found.is_some() {
                    return Ok(found);
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Returns `true` if the face is within [`ANGLE_EPSILON`] of vertical.
pub fn is_side_face<D: Document + ?Sized>(doc: &D, face: FaceHandle) -> bool {
    try_is_side_face(doc, face).unwrap_or_else(|e| {
        debug!(?face, error = %e, "side-face test failed");
        false
    })
}

/// Fallible form of [`is_side_face`].
///
/// # Errors
///
/// Returns an error if the face normal cannot be computed.
pub fn try_is_side_face<D: Document + ?Sized>(doc: &D, face: FaceHandle) -> Result<bool> {
    let (u, v) = SAMPLE_UV;
    let normal = doc.face_normal(face, u, v)?;
    Ok(normal.dot(&up()).abs() < ANGLE_EPSILON.sin())
}

/// Returns `true` if the face is horizontal and faces downward.
///
/// Tops (horizontal, upward) are excluded.
pub fn is_bottom_face<D: Document + ?Sized>(doc: &D, face: FaceHandle) -> bool {
    try_is_bottom_face(doc, face).unwrap_or_else(|e| {
        debug!(?face, error = %e, "bottom-face test failed");
        false
    })
}

/// Fallible form of [`is_bottom_face`].
///
/// # Errors
///
/// Returns an error if the face normal cannot be computed.
pub fn try_is_bottom_face<D: Document + ?Sized>(doc: &D, face: FaceHandle) -> Result<bool> {
    let (u, v) = SAMPLE_UV;
    let vertical = doc.face_normal(face, u, v)?.dot(&up());
    let horizontal = (vertical.abs() - 1.0).abs() < VOLUME_EPSILON;
    Ok(horizontal && vertical < -VOLUME_EPSILON)
}

/// Returns `true` if the face is planar, parallel to `plane` and lies on it.
///
/// Parallel faces offset from the plane (the far side of a wall) do not
/// match. Anti-parallel normals do, so the contact face of a neighbouring
/// element matches a plane captured from the other side.
pub fn is_face_on_plane<D: Document + ?Sized>(
    doc: &D,
    face: FaceHandle,
    plane: &Plane,
    tolerance: f64,
) -> bool {
    try_is_face_on_plane(doc, face, plane, tolerance).unwrap_or_else(|e| {
        debug!(?face, error = %e, "plane test failed");
        false
    })
}

/// Fallible form of [`is_face_on_plane`]. Non-planar faces answer
/// `Ok(false)`.
///
/// # Errors
///
/// Returns an error if the face cannot be read.
pub fn try_is_face_on_plane<D: Document + ?Sized>(
    doc: &D,
    face: FaceHandle,
    plane: &Plane,
    tolerance: f64,
) -> Result<bool> {
    let Some(planar) = doc.planar_face(face)? else {
        return Ok(false);
    };
    Ok(plane.is_parallel_to(&planar.normal, tolerance)
        && plane.signed_distance(&planar.origin).abs() <= tolerance)
}

/// Returns `true` if some other element with a real solid has a bounding
/// box touching the face's (slightly expanded) bounding box.
///
/// This is a proximity heuristic, not exact contact detection.
pub fn is_intersecting_face<D: Document + ?Sized>(
    doc: &D,
    face: FaceHandle,
    element: ElementId,
) -> bool {
    try_is_intersecting_face(doc, face, element).unwrap_or_else(|e| {
        debug!(?face, %element, error = %e, "intersection test failed");
        false
    })
}

/// Fallible form of [`is_intersecting_face`].
///
/// # Errors
///
/// Returns an error if the face cannot be triangulated, or
/// [`GeometryError::EmptyTriangulation`] if it yields no triangles.
pub fn try_is_intersecting_face<D: Document + ?Sized>(
    doc: &D,
    face: FaceHandle,
    element: ElementId,
) -> Result<bool> {
    let triangles = doc.triangulate_face(face)?;
    let bbox = Aabb::from_points(triangles.iter().flatten())
        .ok_or(GeometryError::EmptyTriangulation)?
        .expanded(VOLUME_EPSILON);

    let touching = doc.elements_intersecting(&bbox)?;
    Ok(touching
        .into_iter()
        .filter(|&other| other != element)
        .any(|other| element_solid(doc, other).is_some()))
}

/// Returns the faces of the element's solid lying on `plane`, using
/// [`PLANE_TOLERANCE`].
pub fn faces_on_plane<D: Document + ?Sized>(
    doc: &D,
    element: ElementId,
    plane: &Plane,
) -> Vec<FaceHandle> {
    let Some(solid) = element_solid(doc, element) else {
        return Vec::new();
    };
    solid_faces(doc, &solid)
        .into_iter()
        .filter(|&face| is_face_on_plane(doc, face, plane, PLANE_TOLERANCE))
        .collect()
}

/// Returns the faces of a solid, or none if the host cannot list them.
pub fn solid_faces<D: Document + ?Sized>(doc: &D, solid: &Solid) -> Vec<FaceHandle> {
    doc.solid_faces(solid.handle).unwrap_or_else(|e| {
        debug!(solid = ?solid.handle, error = %e, "solid faces unreadable");
        Vec::new()
    })
}
