//! An in-process [`Document`] implementation.
//!
//! `MemoryDocument` owns elements, solids and faces in arenas keyed by
//! generational indices, answers every geometry query the engine needs and
//! keeps paint assignments in a map. It backs the crate's tests and is a
//! reference for writing adapters over a real host.

mod build;
mod tessellate;

use std::collections::{BTreeMap, HashMap};

use slotmap::{Key, KeyData, SlotMap};
use tracing::trace;

use crate::error::{HostError, Result};
use crate::geometry::{Cylinder, PlanarFace, Plane, Surface, SurfaceDomain};
use crate::host::{
    Document, ElementId, FaceHandle, GeometryObject, HostResult, MaterialId, Solid, SolidHandle,
    Triangle,
};
use crate::math::{Aabb, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a solid in a memory document.
    pub struct SolidKey;
    /// Unique identifier for a face in a memory document.
    pub struct FaceKey;
}

/// The geometric surface carrying a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    /// A planar polygon; the plane normal points out of the solid.
    Plane(Plane),
    /// A trimmed patch of a cylinder.
    Cylinder {
        /// The underlying surface.
        surface: Cylinder,
        /// The trimmed parameter range.
        domain: SurfaceDomain,
    },
}

/// A face stored in the document, with its cached tessellation.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The carrying surface.
    pub surface: FaceSurface,
    triangles: Vec<Triangle>,
    bbox: Aabb,
}

/// A closed body: its faces and the volume they enclose.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// Bounding faces.
    pub faces: Vec<FaceKey>,
    /// Enclosed volume.
    pub volume: f64,
}

/// Geometry attached to an element.
#[derive(Debug, Clone)]
pub enum MemoryGeometry {
    /// A solid owned by the document.
    Solid(SolidKey),
    /// A nested instance with its own geometry.
    Instance(Vec<MemoryGeometry>),
    /// Non-solid geometry, such as a curve.
    Curve,
}

/// An element: category, named parameters and geometry.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Category name, e.g. `"Walls"`.
    pub category: String,
    /// Parameter name to display value.
    pub parameters: BTreeMap<String, String>,
    /// Geometric representation.
    pub geometry: Vec<MemoryGeometry>,
}

impl ElementData {
    /// Creates an element of `category` with the given geometry.
    #[must_use]
    pub fn new(category: impl Into<String>, geometry: Vec<MemoryGeometry>) -> Self {
        Self {
            category: category.into(),
            parameters: BTreeMap::new(),
            geometry,
        }
    }

    /// Sets a parameter value.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// In-memory document.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: BTreeMap<ElementId, ElementData>,
    solids: SlotMap<SolidKey, SolidData>,
    faces: SlotMap<FaceKey, FaceData>,
    materials: Vec<(String, MaterialId)>,
    paint: HashMap<(ElementId, FaceKey), MaterialId>,
    next_element: i64,
    next_material: i64,
}

impl MemoryDocument {
    /// Creates a new, empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element and returns its ID.
    pub fn add_element(&mut self, data: ElementData) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(id, data);
        id
    }

    /// Returns the element data, if present.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(&id)
    }

    /// Registers a material under `name` and returns its ID.
    ///
    /// Names need not be unique; lookups return the first registration.
    pub fn add_material(&mut self, name: impl Into<String>) -> MaterialId {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.push((name.into(), id));
        id
    }

    /// Returns the stored data of a solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is stale.
    pub fn solid(&self, key: SolidKey) -> HostResult<&SolidData> {
        self.solids
            .get(key)
            .ok_or(HostError::SolidNotFound(solid_handle(key)))
    }

    /// Returns the host handle of every face of a solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is stale.
    pub fn face_handles(&self, key: SolidKey) -> Result<Vec<FaceHandle>> {
        Ok(self.solid(key)?.faces.iter().map(|&f| face_handle(f)).collect())
    }

    /// Lists the painted faces of an element with their materials, sorted
    /// by face handle.
    #[must_use]
    pub fn painted_faces(&self, element: ElementId) -> Vec<(FaceHandle, MaterialId)> {
        let mut out: Vec<_> = self
            .paint
            .iter()
            .filter(|((e, _), _)| *e == element)
            .map(|((_, f), m)| (face_handle(*f), *m))
            .collect();
        out.sort_by_key(|(f, _)| f.0);
        out
    }

    /// Total number of painted faces in the document.
    #[must_use]
    pub fn paint_count(&self) -> usize {
        self.paint.len()
    }

    fn face(&self, handle: FaceHandle) -> HostResult<&FaceData> {
        self.faces
            .get(face_key(handle))
            .ok_or(HostError::FaceNotFound(handle))
    }

    fn element_data(&self, id: ElementId) -> HostResult<&ElementData> {
        self.elements.get(&id).ok_or(HostError::ElementNotFound(id))
    }

    fn collect_solids(&self, geometry: &[MemoryGeometry], out: &mut Vec<SolidKey>) {
        for g in geometry {
            match g {
                MemoryGeometry::Solid(key) => out.push(*key),
                MemoryGeometry::Instance(nested) => self.collect_solids(nested, out),
                MemoryGeometry::Curve => {}
            }
        }
    }

    fn element_faces(&self, data: &ElementData) -> Vec<FaceKey> {
        let mut solids = Vec::new();
        self.collect_solids(&data.geometry, &mut solids);
        solids
            .iter()
            .filter_map(|&s| self.solids.get(s))
            .flat_map(|s| s.faces.iter().copied())
            .collect()
    }

    fn element_bbox(&self, data: &ElementData) -> Option<Aabb> {
        self.element_faces(data)
            .iter()
            .filter_map(|&f| self.faces.get(f))
            .map(|f| f.bbox)
            .reduce(|a, b| a.union(&b))
    }

    fn to_geometry_object(&self, g: &MemoryGeometry) -> GeometryObject {
        match g {
            MemoryGeometry::Solid(key) => match self.solids.get(*key) {
                Some(s) => GeometryObject::Solid(Solid {
                    handle: solid_handle(*key),
                    volume: s.volume,
                }),
                None => GeometryObject::Other,
            },
            MemoryGeometry::Instance(nested) => GeometryObject::Instance(
                nested.iter().map(|n| self.to_geometry_object(n)).collect(),
            ),
            MemoryGeometry::Curve => GeometryObject::Other,
        }
    }

    fn check_paint_target(
        &self,
        element: ElementId,
        face: FaceHandle,
    ) -> HostResult<FaceKey> {
        let data = self.element_data(element)?;
        let key = face_key(face);
        if !self.element_faces(data).contains(&key) {
            return Err(HostError::FaceNotFound(face));
        }
        Ok(key)
    }
}

impl Document for MemoryDocument {
    fn element_geometry(
        &self,
        element: ElementId,
    ) -> HostResult<Vec<GeometryObject>> {
        let data = self.element_data(element)?;
        Ok(data
            .geometry
            .iter()
            .map(|g| self.to_geometry_object(g))
            .collect())
    }

    fn solid_faces(&self, solid: SolidHandle) -> HostResult<Vec<FaceHandle>> {
        let key = SolidKey::from(KeyData::from_ffi(solid.0));
        let data = self.solids.get(key).ok_or(HostError::SolidNotFound(solid))?;
        Ok(data.faces.iter().map(|&f| face_handle(f)).collect())
    }

    fn face_normal(
        &self,
        face: FaceHandle,
        u: f64,
        v: f64,
    ) -> HostResult<Vector3> {
        let data = self.face(face)?;
        let normal = match &data.surface {
            FaceSurface::Plane(plane) => Ok(*plane.plane_normal()),
            FaceSurface::Cylinder { surface, domain } => {
                let (u, v) = domain.denormalize(u, v);
                surface.normal(u, v)
            }
        };
        normal.map_err(|e| HostError::GeometryUnavailable(e.to_string()))
    }

    fn planar_face(&self, face: FaceHandle) -> HostResult<Option<PlanarFace>> {
        Ok(match &self.face(face)?.surface {
            FaceSurface::Plane(plane) => Some(PlanarFace {
                normal: *plane.plane_normal(),
                origin: *plane.origin(),
            }),
            FaceSurface::Cylinder { .. } => None,
        })
    }

    fn triangulate_face(&self, face: FaceHandle) -> HostResult<Vec<Triangle>> {
        Ok(self.face(face)?.triangles.clone())
    }

    fn elements_intersecting(&self, bbox: &Aabb) -> HostResult<Vec<ElementId>> {
        Ok(self
            .elements
            .iter()
            .filter(|(_, data)| {
                self.element_bbox(data)
                    .is_some_and(|element_box| element_box.intersects(bbox))
            })
            .map(|(id, _)| *id)
            .collect())
    }

    fn element_category(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element).map(|e| e.category.clone())
    }

    fn element_parameter(&self, element: ElementId, parameter: &str) -> Option<String> {
        self.elements
            .get(&element)
            .and_then(|e| e.parameters.get(parameter).cloned())
    }

    fn paint(
        &mut self,
        element: ElementId,
        face: FaceHandle,
        material: MaterialId,
    ) -> HostResult<()> {
        if !self.materials.iter().any(|(_, id)| *id == material) {
            return Err(HostError::Rejected(format!("unknown material {material}")));
        }
        let key = self.check_paint_target(element, face)?;
        if self.paint.contains_key(&(element, key)) {
            return Err(HostError::AlreadyPainted { element, face });
        }
        trace!(%element, ?face, %material, "paint");
        self.paint.insert((element, key), material);
        Ok(())
    }

    fn remove_paint(
        &mut self,
        element: ElementId,
        face: FaceHandle,
    ) -> HostResult<()> {
        let key = self.check_paint_target(element, face)?;
        if self.paint.remove(&(element, key)).is_none() {
            return Err(HostError::NotPainted { element, face });
        }
        trace!(%element, ?face, "remove paint");
        Ok(())
    }

    fn painted_material(&self, element: ElementId, face: FaceHandle) -> Option<MaterialId> {
        self.paint.get(&(element, face_key(face))).copied()
    }

    fn material_by_name(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }
}

fn face_handle(key: FaceKey) -> FaceHandle {
    FaceHandle(key.data().as_ffi())
}

fn face_key(handle: FaceHandle) -> FaceKey {
    FaceKey::from(KeyData::from_ffi(handle.0))
}

fn solid_handle(key: SolidKey) -> SolidHandle {
    SolidHandle(key.data().as_ffi())
}
