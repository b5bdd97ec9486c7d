//! Applies and removes face paint by face category.
//!
//! Every operation assumes the caller already holds the document's mutation
//! scope (`&mut D`). Invalid input is a logged no-op. A face the host
//! refuses to paint or unpaint is skipped; the remaining faces are still
//! processed, and faces already handled stay handled.

mod report;

pub use report::{PaintReport, PaintStatus};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::classify::{
    element_solid, faces_on_plane, is_bottom_face, is_intersecting_face, is_side_face, solid_faces,
};
use crate::host::{Document, ElementId, FaceHandle, MaterialId};
use crate::mapping::PickedFaceItem;

/// What to do with each selected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Paint(MaterialId),
    Remove,
}

/// Paints the element's vertical faces that do not touch another element.
pub fn paint_side_faces<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
    material: MaterialId,
) -> PaintReport {
    run_on_solid(doc, element, Action::Paint(material), select_side_faces)
}

/// Paints the element's downward-facing horizontal faces.
pub fn paint_bottom_faces<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
    material: MaterialId,
) -> PaintReport {
    run_on_solid(doc, element, Action::Paint(material), select_bottom_faces)
}

/// Paints the element's faces lying on any of the picked faces' planes.
pub fn paint_interfaces<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
    picked: &[PickedFaceItem],
    material: MaterialId,
) -> PaintReport {
    run_on_planes(doc, element, picked, Action::Paint(material))
}

/// Removes paint from the faces [`paint_side_faces`] would paint.
pub fn remove_paint_side_faces<D: Document + ?Sized>(doc: &mut D, element: ElementId) -> PaintReport {
    run_on_solid(doc, element, Action::Remove, select_side_faces)
}

/// Removes paint from the faces [`paint_bottom_faces`] would paint.
pub fn remove_paint_bottom_faces<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
) -> PaintReport {
    run_on_solid(doc, element, Action::Remove, select_bottom_faces)
}

/// Removes paint from the faces [`paint_interfaces`] would paint.
pub fn remove_paint_interfaces<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
    picked: &[PickedFaceItem],
) -> PaintReport {
    run_on_planes(doc, element, picked, Action::Remove)
}

fn select_side_faces<D: Document + ?Sized>(
    doc: &D,
    element: ElementId,
    faces: Vec<FaceHandle>,
) -> Vec<FaceHandle> {
    faces
        .into_iter()
        .filter(|&f| is_side_face(doc, f) && !is_intersecting_face(doc, f, element))
        .collect()
}

fn select_bottom_faces<D: Document + ?Sized>(
    doc: &D,
    _element: ElementId,
    faces: Vec<FaceHandle>,
) -> Vec<FaceHandle> {
    faces.into_iter().filter(|&f| is_bottom_face(doc, f)).collect()
}

fn validate(element: ElementId, action: Action) -> bool {
    if !element.is_valid() {
        warn!(%element, "invalid element, nothing painted");
        return false;
    }
    if let Action::Paint(material) = action {
        if !material.is_valid() {
            warn!(%element, "invalid material, nothing painted");
            return false;
        }
    }
    true
}

fn run_on_solid<D, F>(doc: &mut D, element: ElementId, action: Action, select: F) -> PaintReport
where
    D: Document + ?Sized,
    F: Fn(&D, ElementId, Vec<FaceHandle>) -> Vec<FaceHandle>,
{
    if !validate(element, action) {
        return PaintReport::with_status(PaintStatus::InvalidInput);
    }
    let Some(solid) = element_solid(&*doc, element) else {
        warn!(%element, "element has no solid");
        return PaintReport::with_status(PaintStatus::NoSolid);
    };
    let selected = select(&*doc, element, solid_faces(&*doc, &solid));
    apply(doc, element, &selected, action)
}

fn run_on_planes<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
    picked: &[PickedFaceItem],
    action: Action,
) -> PaintReport {
    if picked.is_empty() {
        return PaintReport::with_status(PaintStatus::NothingPicked);
    }
    if !validate(element, action) {
        return PaintReport::with_status(PaintStatus::InvalidInput);
    }

    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    let mut skipped_items = 0;
    for item in picked {
        let Some(plane) = item.plane() else {
            debug!(item = %item.display_name, "picked face has no captured plane");
            skipped_items += 1;
            continue;
        };
        for face in faces_on_plane(&*doc, element, plane) {
            if seen.insert(face) {
                selected.push(face);
            }
        }
    }

    let mut report = apply(doc, element, &selected, action);
    report.skipped_items = skipped_items;
    report
}

fn apply<D: Document + ?Sized>(
    doc: &mut D,
    element: ElementId,
    faces: &[FaceHandle],
    action: Action,
) -> PaintReport {
    let mut report = PaintReport {
        matched: faces.len(),
        ..PaintReport::default()
    };
    for &face in faces {
        let result = match action {
            Action::Paint(material) => doc.paint(element, face, material),
            Action::Remove => doc.remove_paint(element, face),
        };
        match result {
            Ok(()) => report.applied += 1,
            Err(e) => {
                debug!(%element, ?face, error = %e, "host rejected face");
                report.rejected += 1;
            }
        }
    }
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Plane;
    use crate::math::{Point3, Vector3};
    use crate::memory::{ElementData, MemoryDocument, MemoryGeometry};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn box_element(doc: &mut MemoryDocument, min: Point3, max: Point3) -> ElementId {
        let solid = doc.make_box(min, max).unwrap();
        doc.add_element(ElementData::new("Walls", vec![MemoryGeometry::Solid(solid)]))
    }

    fn top_face_item(doc: &MemoryDocument, element: ElementId, z: f64) -> PickedFaceItem {
        let plane = Plane::from_normal(p(0.0, 0.0, z), Vector3::z()).unwrap();
        let face = faces_on_plane(doc, element, &plane)[0];
        PickedFaceItem::capture(doc, element, face).unwrap()
    }

    #[test]
    fn box_paints_four_sides_and_one_bottom() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let concrete = doc.add_material("Concrete");
        let wall = box_element(&mut doc, p(0.0, 0.0, 0.0), p(4.0, 0.3, 3.0));

        let sides = paint_side_faces(&mut doc, wall, concrete);
        assert_eq!(sides.status, PaintStatus::Completed);
        assert_eq!(sides.applied, 4);

        let bottoms = paint_bottom_faces(&mut doc, wall, concrete);
        assert_eq!(bottoms.applied, 1);
        assert_eq!(doc.painted_faces(wall).len(), 5);

        let top = faces_on_plane(
            &doc,
            wall,
            &Plane::from_normal(p(0.0, 0.0, 3.0), Vector3::z()).unwrap(),
        )[0];
        assert_eq!(doc.painted_material(wall, top), None);
    }

    #[test]
    fn repainting_is_swallowed() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let concrete = doc.add_material("Concrete");
        let wall = box_element(&mut doc, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));

        paint_side_faces(&mut doc, wall, concrete);
        let before = doc.painted_faces(wall);
        let second = paint_side_faces(&mut doc, wall, concrete);
        assert_eq!(second.applied, 0);
        assert_eq!(second.rejected, 4);
        assert_eq!(doc.painted_faces(wall), before);
    }

    #[test]
    fn invalid_material_is_noop() {
        let mut doc = MemoryDocument::new();
        let wall = box_element(&mut doc, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let report = paint_side_faces(&mut doc, wall, MaterialId::INVALID);
        assert_eq!(report.status, PaintStatus::InvalidInput);
        assert_eq!(doc.paint_count(), 0);
    }

    #[test]
    fn invalid_element_is_noop() {
        let mut doc = MemoryDocument::new();
        let concrete = doc.add_material("Concrete");
        let report = paint_bottom_faces(&mut doc, ElementId::INVALID, concrete);
        assert_eq!(report.status, PaintStatus::InvalidInput);
        let report = remove_paint_bottom_faces(&mut doc, ElementId::INVALID);
        assert_eq!(report.status, PaintStatus::InvalidInput);
    }

    #[test]
    fn element_without_solid_reports_no_solid() {
        let mut doc = MemoryDocument::new();
        let concrete = doc.add_material("Concrete");
        let lines = doc.add_element(ElementData::new("Lines", vec![MemoryGeometry::Curve]));
        let report = paint_side_faces(&mut doc, lines, concrete);
        assert_eq!(report.status, PaintStatus::NoSolid);
        assert_eq!(report.applied, 0);
    }

    #[test]
    fn sides_touching_a_neighbour_are_left_alone() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let concrete = doc.add_material("Concrete");
        let wall = box_element(&mut doc, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        box_element(&mut doc, p(1.0, 0.0, 0.0), p(2.0, 1.0, 1.0));

        // The face at x = 1 touches the neighbour; the ones at y = 0 and
        // y = 1 share an edge with it, so their boxes touch as well.
        let report = paint_side_faces(&mut doc, wall, concrete);
        assert_eq!(report.applied, 1);
        let painted = doc.painted_faces(wall)[0].0;
        let planar = doc.planar_face(painted).unwrap().unwrap();
        assert!((planar.normal + Vector3::x()).norm() < 1e-12);
    }

    #[test]
    fn remove_mirrors_paint() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let concrete = doc.add_material("Concrete");
        let wall = box_element(&mut doc, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        paint_side_faces(&mut doc, wall, concrete);
        paint_bottom_faces(&mut doc, wall, concrete);

        let removed = remove_paint_side_faces(&mut doc, wall);
        assert_eq!(removed.applied, 4);
        assert_eq!(doc.painted_faces(wall).len(), 1);

        let again = remove_paint_side_faces(&mut doc, wall);
        assert_eq!(again.applied, 0);
        assert_eq!(again.rejected, 4);

        let bottom = remove_paint_bottom_faces(&mut doc, wall);
        assert_eq!(bottom.applied, 1);
        assert_eq!(doc.paint_count(), 0);
    }

    #[test]
    fn interface_paints_exactly_the_coplanar_face() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let membrane = doc.add_material("Membrane");
        let slab = box_element(&mut doc, p(0.0, 0.0, 0.0), p(5.0, 5.0, 0.3));
        let footing = box_element(&mut doc, p(10.0, 10.0, 0.3), p(11.0, 11.0, 1.3));
        let picked = vec![top_face_item(&doc, slab, 0.3)];

        let report = paint_interfaces(&mut doc, footing, &picked, membrane);
        assert_eq!(report.matched, 1);
        assert_eq!(report.applied, 1);
        let (face, material) = doc.painted_faces(footing)[0];
        assert_eq!(material, membrane);
        assert!(doc.planar_face(face).unwrap().unwrap().normal.z < -0.99);
    }

    #[test]
    fn interface_skips_items_without_plane() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let membrane = doc.add_material("Membrane");
        let slab = box_element(&mut doc, p(0.0, 0.0, 0.0), p(5.0, 5.0, 0.3));
        let footing = box_element(&mut doc, p(0.0, 0.0, 0.3), p(1.0, 1.0, 1.3));
        let restored = PickedFaceItem::new("Floors : 0", "Floors", slab);
        let picked = vec![restored, top_face_item(&doc, slab, 0.3)];

        let report = paint_interfaces(&mut doc, footing, &picked, membrane);
        assert_eq!(report.skipped_items, 1);
        assert_eq!(report.applied, 1);
    }

    #[test]
    fn duplicate_picks_paint_once() {
        let mut doc = MemoryDocument::new();
        let membrane = doc.add_material("Membrane");
        let slab = box_element(&mut doc, p(0.0, 0.0, 0.0), p(5.0, 5.0, 0.3));
        let footing = box_element(&mut doc, p(0.0, 0.0, 0.3), p(1.0, 1.0, 1.3));
        let item = top_face_item(&doc, slab, 0.3);
        let picked = vec![item.clone(), item];

        let report = paint_interfaces(&mut doc, footing, &picked, membrane);
        assert_eq!(report.matched, 1);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn empty_picks_are_noop() {
        let mut doc = MemoryDocument::new();
        let membrane = doc.add_material("Membrane");
        let footing = box_element(&mut doc, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let report = paint_interfaces(&mut doc, footing, &[], membrane);
        assert_eq!(report.status, PaintStatus::NothingPicked);
        assert_eq!(doc.paint_count(), 0);
    }

    #[test]
    fn remove_interfaces_clears_painted_contact() {
        let mut doc = MemoryDocument::new();
        let membrane = doc.add_material("Membrane");
        let slab = box_element(&mut doc, p(0.0, 0.0, 0.0), p(5.0, 5.0, 0.3));
        let footing = box_element(&mut doc, p(0.0, 0.0, 0.3), p(1.0, 1.0, 1.3));
        let picked = vec![top_face_item(&doc, slab, 0.3)];

        paint_interfaces(&mut doc, footing, &picked, membrane);
        let removed = remove_paint_interfaces(&mut doc, footing, &picked);
        assert_eq!(removed.applied, 1);
        assert!(doc.painted_faces(footing).is_empty());
    }

    #[test]
    fn unknown_material_is_rejected_per_face() {
        let mut doc = MemoryDocument::new();
        let wall = box_element(&mut doc, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let report = paint_bottom_faces(&mut doc, wall, MaterialId(77));
        assert_eq!(report.status, PaintStatus::Completed);
        assert_eq!(report.rejected, 1);
        assert_eq!(doc.paint_count(), 0);
    }
}
