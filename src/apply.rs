//! Runs a mapping configuration over a selection of elements.

use tracing::{debug, warn};

use crate::host::{Document, ElementId};
use crate::mapping::{MappingConfiguration, PaintOptions, PickedFaceItem};
use crate::paint::{
    paint_bottom_faces, paint_interfaces, paint_side_faces, remove_paint_bottom_faces,
    remove_paint_interfaces, remove_paint_side_faces, PaintReport,
};

/// What happened to one element of the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementStatus {
    /// The enabled face categories were processed.
    Processed,
    /// No checked mapping applies to the element.
    NoRule,
    /// The mapped material name does not exist in the document.
    UnknownMaterial(String),
}

/// Outcome for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementOutcome {
    pub element: ElementId,
    pub status: ElementStatus,
    /// Face counts over every category processed for this element.
    pub faces: PaintReport,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub outcomes: Vec<ElementOutcome>,
    /// Face counts summed over all elements.
    pub total: PaintReport,
}

impl ApplyReport {
    fn push(&mut self, outcome: ElementOutcome) {
        self.total.merge(&outcome.faces);
        self.outcomes.push(outcome);
    }

    /// Number of elements that were actually processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ElementStatus::Processed)
            .count()
    }
}

/// Paints each element with the material of its first matching mapping,
/// for the face categories enabled in the configuration.
///
/// Elements without a rule, or whose material name does not resolve, are
/// skipped and reported.
pub fn paint_elements<D: Document + ?Sized>(
    doc: &mut D,
    elements: &[ElementId],
    config: &MappingConfiguration,
) -> ApplyReport {
    let picked = config.active_picked_faces();
    let mut report = ApplyReport::default();

    for &element in elements {
        let Some(rule) = config.rule_for(&*doc, element) else {
            debug!(%element, "no mapping applies");
            report.push(skipped(element, ElementStatus::NoRule));
            continue;
        };
        let Some(material) = doc.material_by_name(&rule.material) else {
            warn!(%element, material = %rule.material, "material not found");
            report.push(skipped(
                element,
                ElementStatus::UnknownMaterial(rule.material.clone()),
            ));
            continue;
        };

        let faces = run_categories(&config.options, &picked, |category| match category {
            Category::Side => paint_side_faces(&mut *doc, element, material),
            Category::Bottom => paint_bottom_faces(&mut *doc, element, material),
            Category::Interfaces(items) => paint_interfaces(&mut *doc, element, items, material),
        });
        debug!(%element, applied = faces.applied, rejected = faces.rejected, "element painted");
        report.push(ElementOutcome {
            element,
            status: ElementStatus::Processed,
            faces,
        });
    }
    report
}

/// Removes paint from the enabled face categories of every element,
/// whether or not a mapping applies to it.
pub fn remove_paint_elements<D: Document + ?Sized>(
    doc: &mut D,
    elements: &[ElementId],
    config: &MappingConfiguration,
) -> ApplyReport {
    let picked = config.active_picked_faces();
    let mut report = ApplyReport::default();

    for &element in elements {
        let faces = run_categories(&config.options, &picked, |category| match category {
            Category::Side => remove_paint_side_faces(&mut *doc, element),
            Category::Bottom => remove_paint_bottom_faces(&mut *doc, element),
            Category::Interfaces(items) => remove_paint_interfaces(&mut *doc, element, items),
        });
        report.push(ElementOutcome {
            element,
            status: ElementStatus::Processed,
            faces,
        });
    }
    report
}

enum Category<'a> {
    Side,
    Bottom,
    Interfaces(&'a [PickedFaceItem]),
}

fn run_categories<'a, F>(options: &PaintOptions, picked: &'a [PickedFaceItem], mut run: F) -> PaintReport
where
    F: FnMut(Category<'a>) -> PaintReport,
{
    let mut faces = PaintReport::default();
    if options.side {
        faces.merge(&run(Category::Side));
    }
    if options.bottom {
        faces.merge(&run(Category::Bottom));
    }
    if options.interfaces && !picked.is_empty() {
        faces.merge(&run(Category::Interfaces(picked)));
    }
    faces
}

fn skipped(element: ElementId, status: ElementStatus) -> ElementOutcome {
    ElementOutcome {
        element,
        status,
        faces: PaintReport::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::classify::faces_on_plane;
    use crate::geometry::Plane;
    use crate::mapping::CategoryMapping;
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

    fn element(doc: &mut MemoryDocument, category: &str, min: Point3, max: Point3) -> ElementId {
        let solid = doc.make_box(min, max).unwrap();
        doc.add_element(ElementData::new(category, vec![MemoryGeometry::Solid(solid)]))
    }

    fn walls_to(material: &str) -> MappingConfiguration {
        let mut config = MappingConfiguration::new();
        config
            .mappings
            .push(CategoryMapping::new("Walls").with_material(material));
        config
    }

    #[test]
    fn paints_mapped_elements_and_reports_the_rest() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        let brick = doc.add_material("Brick");
        let wall = element(&mut doc, "Walls", p(0.0, 0.0, 0.0), p(4.0, 0.2, 3.0));
        let door = element(&mut doc, "Doors", p(10.0, 0.0, 0.0), p(11.0, 0.1, 2.0));

        let report = paint_elements(&mut doc, &[wall, door], &walls_to("Brick"));
        assert_eq!(report.processed(), 1);
        assert_eq!(report.outcomes[1].status, ElementStatus::NoRule);
        assert_eq!(report.total.applied, 5);
        assert!(doc.painted_faces(wall).iter().all(|(_, m)| *m == brick));
        assert!(doc.painted_faces(door).is_empty());
    }

    #[test]
    fn unknown_material_is_reported() {
        let mut doc = MemoryDocument::new();
        doc.add_material("brick");
        let wall = element(&mut doc, "Walls", p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));

        let report = paint_elements(&mut doc, &[wall], &walls_to("Brick"));
        assert_eq!(
            report.outcomes[0].status,
            ElementStatus::UnknownMaterial("Brick".into())
        );
        assert_eq!(doc.paint_count(), 0);
    }

    #[test]
    fn options_limit_face_categories() {
        let mut doc = MemoryDocument::new();
        doc.add_material("Brick");
        let wall = element(&mut doc, "Walls", p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let mut config = walls_to("Brick");
        config.options = PaintOptions {
            side: false,
            bottom: true,
            interfaces: false,
        };

        let report = paint_elements(&mut doc, &[wall], &config);
        assert_eq!(report.total.applied, 1);
    }

    #[test]
    fn interfaces_use_checked_picks_only() {
        init_tracing();
        let mut doc = MemoryDocument::new();
        doc.add_material("Membrane");
        let slab = element(&mut doc, "Floors", p(0.0, 0.0, 0.0), p(6.0, 6.0, 0.3));
        let footing = element(&mut doc, "Walls", p(20.0, 0.0, 0.3), p(21.0, 1.0, 1.3));
        let top = faces_on_plane(
            &doc,
            slab,
            &Plane::from_normal(p(0.0, 0.0, 0.3), Vector3::z()).unwrap(),
        )[0];

        let mut config = walls_to("Membrane");
        config.options = PaintOptions {
            side: false,
            bottom: false,
            interfaces: true,
        };
        let mut pick = PickedFaceItem::capture(&doc, slab, top).unwrap();
        pick.checked = false;
        config.picked_faces.push(pick);

        let report = paint_elements(&mut doc, &[footing], &config);
        assert_eq!(report.total.applied, 0);

        config.picked_faces[0].checked = true;
        let report = paint_elements(&mut doc, &[footing], &config);
        assert_eq!(report.total.applied, 1);
    }

    #[test]
    fn remove_clears_what_paint_applied() {
        let mut doc = MemoryDocument::new();
        doc.add_material("Brick");
        let wall = element(&mut doc, "Walls", p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let config = walls_to("Brick");

        paint_elements(&mut doc, &[wall], &config);
        let removed = remove_paint_elements(&mut doc, &[wall], &config);
        assert_eq!(removed.total.applied, 5);
        assert_eq!(doc.paint_count(), 0);
    }
}
