use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::{Cylinder, Plane, SurfaceDomain};
use crate::math::{Aabb, Point3, Vector3, TOLERANCE};

use super::tessellate::{enclosed_volume, triangulate_patch, triangulate_polygon};
use super::{FaceData, FaceKey, FaceSurface, MemoryDocument, SolidData, SolidKey};

impl MemoryDocument {
    /// Creates a solid bounded by planar polygons.
    ///
    /// Each polygon is a vertex loop wound counter-clockwise when seen from
    /// outside the solid, so the derived normal points outward.
    ///
    /// # Errors
    ///
    /// Returns an error if any polygon is degenerate.
    pub fn make_polyhedron(&mut self, polygons: &[Vec<Point3>]) -> Result<SolidKey> {
        let mut faces = Vec::with_capacity(polygons.len());
        for outline in polygons {
            let plane = polygon_plane(outline)?;
            let triangles = triangulate_polygon(&plane, outline)?;
            faces.push(self.insert_face(FaceSurface::Plane(plane), triangles)?);
        }
        Ok(self.insert_solid(faces))
    }

    /// Creates a box solid from two corner points.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is flat along any axis.
    pub fn make_box(&mut self, min_corner: Point3, max_corner: Point3) -> Result<SolidKey> {
        let b = Aabb::new(min_corner, max_corner);
        let footprint = [
            Point3::new(b.min.x, b.min.y, 0.0),
            Point3::new(b.max.x, b.min.y, 0.0),
            Point3::new(b.max.x, b.max.y, 0.0),
            Point3::new(b.min.x, b.max.y, 0.0),
        ];
        self.make_prism(&footprint, b.min.z, b.max.z)
    }

    /// Creates a vertical prism by extruding a footprint from `z_min` to
    /// `z_max`.
    ///
    /// The footprint's z coordinates are ignored. It may be wound either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the footprint is degenerate or the height is not
    /// positive.
    pub fn make_prism(&mut self, footprint: &[Point3], z_min: f64, z_max: f64) -> Result<SolidKey> {
        if footprint.len() < 3 {
            return Err(GeometryError::Degenerate("footprint needs 3 points".into()).into());
        }
        if z_max - z_min < TOLERANCE {
            return Err(GeometryError::Degenerate("prism height must be positive".into()).into());
        }

        let mut ring: Vec<Point3> = footprint.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
        if signed_area_xy(&ring) < 0.0 {
            ring.reverse();
        }
        let at = |p: &Point3, z: f64| Point3::new(p.x, p.y, z);

        let mut polygons = Vec::with_capacity(ring.len() + 2);
        polygons.push(ring.iter().rev().map(|p| at(p, z_min)).collect());
        polygons.push(ring.iter().map(|p| at(p, z_max)).collect());
        for i in 0..ring.len() {
            let a = &ring[i];
            let b = &ring[(i + 1) % ring.len()];
            polygons.push(vec![at(a, z_min), at(b, z_min), at(b, z_max), at(a, z_max)]);
        }
        self.make_polyhedron(&polygons)
    }

    /// Creates a vertical cylinder whose side is one curved face and whose
    /// caps are planar polygons with `segments` sides.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is not positive or fewer
    /// than three segments are requested.
    pub fn make_cylinder(
        &mut self,
        base_center: Point3,
        radius: f64,
        height: f64,
        segments: usize,
    ) -> Result<SolidKey> {
        if segments < 3 {
            return Err(GeometryError::Degenerate("cylinder needs 3 segments".into()).into());
        }
        if height < TOLERANCE {
            return Err(GeometryError::Degenerate("cylinder height must be positive".into()).into());
        }
        let surface = Cylinder::new(base_center, radius, Vector3::z(), Vector3::x())?;
        let domain = SurfaceDomain::new(0.0, TAU, 0.0, height);
        let side_triangles = triangulate_patch(&surface, &domain, segments, 1)?;
        let side = self.insert_face(FaceSurface::Cylinder { surface, domain }, side_triangles)?;

        #[allow(clippy::cast_precision_loss)]
        let ring: Vec<Point3> = (0..segments)
            .map(|i| {
                let a = TAU * i as f64 / segments as f64;
                Point3::new(
                    base_center.x + radius * a.cos(),
                    base_center.y + radius * a.sin(),
                    0.0,
                )
            })
            .collect();
        let cap = |z: f64, reversed: bool| -> Vec<Point3> {
            let pts = ring.iter().map(|p| Point3::new(p.x, p.y, z));
            if reversed {
                pts.rev().collect()
            } else {
                pts.collect()
            }
        };

        let mut faces = vec![side];
        for outline in [cap(base_center.z, true), cap(base_center.z + height, false)] {
            let plane = polygon_plane(&outline)?;
            let triangles = triangulate_polygon(&plane, &outline)?;
            faces.push(self.insert_face(FaceSurface::Plane(plane), triangles)?);
        }
        Ok(self.insert_solid(faces))
    }

    fn insert_face(&mut self, surface: FaceSurface, triangles: Vec<[Point3; 3]>) -> Result<FaceKey> {
        let bbox = Aabb::from_points(triangles.iter().flatten())
            .ok_or(GeometryError::EmptyTriangulation)?;
        Ok(self.faces.insert(FaceData {
            surface,
            triangles,
            bbox,
        }))
    }

    fn insert_solid(&mut self, faces: Vec<FaceKey>) -> SolidKey {
        let triangles: Vec<_> = faces
            .iter()
            .filter_map(|&f| self.faces.get(f))
            .flat_map(|f| f.triangles.iter().copied())
            .collect();
        let volume = enclosed_volume(&triangles).abs();
        self.solids.insert(SolidData { faces, volume })
    }
}

/// Plane of a polygon loop, normal from Newell's method.
fn polygon_plane(outline: &[Point3]) -> Result<Plane> {
    if outline.len() < 3 {
        return Err(GeometryError::Degenerate("polygon needs at least 3 points".into()).into());
    }
    let mut normal = Vector3::zeros();
    for (i, a) in outline.iter().enumerate() {
        let b = &outline[(i + 1) % outline.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    Plane::from_normal(outline[0], normal)
}

fn signed_area_xy(ring: &[Point3]) -> f64 {
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}
