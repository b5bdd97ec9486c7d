use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::FixedFaceHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{GeometryError, Result};
use crate::geometry::{Cylinder, Plane, Surface, SurfaceDomain};
use crate::host::Triangle;
use crate::math::{Point3, TOLERANCE};

/// Triangulates a planar polygon loop using CDT.
///
/// Triangles are wound counter-clockwise around the plane normal.
pub(crate) fn triangulate_polygon(plane: &Plane, outline: &[Point3]) -> Result<Vec<Triangle>> {
    let outline_2d: Vec<_> = outline
        .iter()
        .map(|p| {
            let (u, v) = plane.project(p);
            SpadePoint2::new(u, v)
        })
        .collect();

    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    insert_constraint_loop(&mut cdt, &outline_2d)?;
    let interior_faces = classify_interior_faces(&cdt);

    let lift = |p: SpadePoint2<f64>| -> Point3 {
        *plane.origin() + *plane.u_dir() * p.x + *plane.v_dir() * p.y
    };

    let mut triangles = Vec::with_capacity(interior_faces.len());
    for face_handle in cdt.inner_faces() {
        if !interior_faces.contains(&face_handle.fix().index()) {
            continue;
        }
        let [a, b, c] = face_handle.vertices().map(|vh| lift(vh.position()));
        // spade reports inner faces counter-clockwise in (u, v), which is
        // counter-clockwise around u_dir x v_dir = normal.
        triangles.push([a, b, c]);
    }

    if triangles.is_empty() {
        return Err(GeometryError::EmptyTriangulation.into());
    }
    Ok(triangles)
}

/// Triangulates a curved patch on an `n_u` by `n_v` grid over its domain.
pub(crate) fn triangulate_patch(
    surface: &Cylinder,
    domain: &SurfaceDomain,
    n_u: usize,
    n_v: usize,
) -> Result<Vec<Triangle>> {
    #[allow(clippy::cast_precision_loss)]
    let step = |i: usize, n: usize| i as f64 / n as f64;

    let mut grid = Vec::with_capacity((n_u + 1) * (n_v + 1));
    for j in 0..=n_v {
        for i in 0..=n_u {
            let (u, v) = domain.denormalize(step(i, n_u), step(j, n_v));
            grid.push(surface.evaluate(u, v)?);
        }
    }

    let at = |i: usize, j: usize| grid[j * (n_u + 1) + i];
    let mut triangles = Vec::with_capacity(2 * n_u * n_v);
    for j in 0..n_v {
        for i in 0..n_u {
            let (p00, p10, p01, p11) = (at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1));
            for tri in [[p00, p10, p11], [p00, p11, p01]] {
                if (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).norm() > TOLERANCE {
                    triangles.push(tri);
                }
            }
        }
    }

    if triangles.is_empty() {
        return Err(GeometryError::EmptyTriangulation.into());
    }
    Ok(triangles)
}

/// Signed volume enclosed by outward-wound triangles (divergence theorem).
pub(crate) fn enclosed_volume(triangles: &[Triangle]) -> f64 {
    let six_v: f64 = triangles
        .iter()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
        .sum();
    six_v / 6.0
}

fn insert_constraint_loop(
    cdt: &mut ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
    points: &[SpadePoint2<f64>],
) -> Result<()> {
    if points.len() < 3 {
        return Err(GeometryError::Degenerate("polygon needs at least 3 points".into()).into());
    }

    let mut handles = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt
            .insert(pt)
            .map_err(|e: InsertionError| GeometryError::Degenerate(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    Ok(())
}

/// Flood-fills from the outer face; faces behind an odd number of
/// constraint edges are interior.
fn classify_interior_faces(
    cdt: &ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn area(triangles: &[Triangle]) -> f64 {
        triangles
            .iter()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() / 2.0)
            .sum()
    }

    #[test]
    fn square_gives_two_triangles() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let outline = [p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 2.0, 0.0), p(0.0, 2.0, 0.0)];
        let tris = triangulate_polygon(&plane, &outline).unwrap();
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(area(&tris), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn triangles_wind_around_normal() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), -Vector3::z()).unwrap();
        let outline = [p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(1.0, 1.0, 0.0), p(1.0, 0.0, 0.0)];
        for [a, b, c] in triangulate_polygon(&plane, &outline).unwrap() {
            assert!((b - a).cross(&(c - a)).z < 0.0);
        }
    }

    #[test]
    fn concave_polygon_excludes_notch() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let outline = [
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(1.0, 2.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ];
        let tris = triangulate_polygon(&plane, &outline).unwrap();
        assert_relative_eq!(area(&tris), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn two_points_are_degenerate() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        assert!(triangulate_polygon(&plane, &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn half_cylinder_patch_area() {
        let cyl = Cylinder::new(p(0.0, 0.0, 0.0), 1.0, Vector3::z(), Vector3::x()).unwrap();
        let domain = SurfaceDomain::new(0.0, std::f64::consts::PI, 0.0, 2.0);
        let tris = triangulate_patch(&cyl, &domain, 8, 8).unwrap();
        // Chordal approximation of pi * r * h, slightly under.
        let a = area(&tris);
        assert!(a < std::f64::consts::TAU && a > 6.0, "got {a}");
    }
}
