use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::Plane;
use crate::host::{Document, ElementId, FaceHandle};

/// A face the user picked as a reference for interface painting.
///
/// The face handle and plane are session-only: they are skipped when the
/// item is serialized, and an item restored from storage carries neither
/// until it is captured again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickedFaceItem {
    pub checked: bool,
    pub display_name: String,
    pub source_category: String,
    pub source_element_id: ElementId,
    #[serde(skip)]
    face: Option<FaceHandle>,
    #[serde(skip)]
    plane: Option<Plane>,
}

impl Default for PickedFaceItem {
    fn default() -> Self {
        Self {
            checked: true,
            display_name: String::new(),
            source_category: String::new(),
            source_element_id: ElementId::INVALID,
            face: None,
            plane: None,
        }
    }
}

impl PickedFaceItem {
    /// Creates a checked item with descriptive fields only.
    #[must_use]
    pub fn new(
        display_name: impl Into<String>,
        source_category: impl Into<String>,
        source_element_id: ElementId,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            source_category: source_category.into(),
            source_element_id,
            ..Self::default()
        }
    }

    /// Captures a planar face of `element` as a reference plane.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotPlanar`] for curved faces, or a host error
    /// if the face cannot be read.
    pub fn capture<D: Document + ?Sized>(
        doc: &D,
        element: ElementId,
        face: FaceHandle,
    ) -> Result<Self> {
        let planar = doc.planar_face(face)?.ok_or(GeometryError::NotPlanar)?;
        let category = doc.element_category(element).unwrap_or_default();
        Ok(Self {
            display_name: format!("{category} : {element}"),
            source_category: category,
            source_element_id: element,
            face: Some(face),
            plane: Some(planar.plane()?),
            ..Self::default()
        })
    }

    /// The captured face, if this item was picked in the current session.
    #[must_use]
    pub fn face(&self) -> Option<FaceHandle> {
        self.face
    }

    /// The captured plane, if this item was picked in the current session.
    #[must_use]
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }
}
