//! Face and vertex normals, edge measures.
//!
//! Normals are computed from positions alone and never cached implicitly;
//! the `update_*` functions write them into the conventional `f:normal` and
//! `v:normal` columns so downstream passes can read them by key.

use crate::attrib::{FaceAttr, VertexAttr};
use crate::mesh::PolygonMesh;
use crate::mesh_error::MeshHedgeError;
use crate::topology::handle::{Edge, Face, Vertex};
use crate::{Scalar, Vec3};

const EPS: Scalar = 1e-12;

#[inline]
fn normalized_or_zero(n: Vec3) -> Vec3 {
    n.try_normalize(EPS).unwrap_or_else(Vec3::zeros)
}

/// Unit normal of `f`, the zero vector when the face is degenerate.
///
/// Triangles use a single cross product; larger polygons accumulate the
/// corner cross products, which stays meaningful for non-planar and mildly
/// non-convex faces.
pub fn compute_face_normal(mesh: &PolygonMesh, f: Face) -> Vec3 {
    let h0 = mesh.face_halfedge(f);
    let mut p0 = mesh.position(mesh.to_vertex(h0));
    let h1 = mesh.next_halfedge(h0);
    let mut p1 = mesh.position(mesh.to_vertex(h1));
    let h2 = mesh.next_halfedge(h1);
    let mut p2 = mesh.position(mesh.to_vertex(h2));

    if mesh.next_halfedge(h2) == h0 {
        return normalized_or_zero((p2 - p1).cross(&(p0 - p1)));
    }

    let hend = h2;
    let mut h = h2;
    let mut n = Vec3::zeros();
    loop {
        n += (p2 - p1).cross(&(p0 - p1));
        h = mesh.next_halfedge(h);
        p0 = p1;
        p1 = p2;
        p2 = mesh.position(mesh.to_vertex(h));
        if h == hend {
            break;
        }
    }
    normalized_or_zero(n)
}

/// Unit normal of `v`, the normalized average of its incident face normals.
///
/// Zero for isolated vertices and for vertices whose incident faces cancel
/// out.
pub fn compute_vertex_normal(mesh: &PolygonMesh, v: Vertex) -> Vec3 {
    let mut n = Vec3::zeros();
    for f in mesh.faces_around_vertex(v) {
        n += compute_face_normal(mesh, f);
    }
    normalized_or_zero(n)
}

/// Euclidean distance between the endpoints of `e`.
pub fn edge_length(mesh: &PolygonMesh, e: Edge) -> Scalar {
    (mesh.position(mesh.edge_vertex(e, 0)) - mesh.position(mesh.edge_vertex(e, 1))).norm()
}

/// Recomputes all face normals into the `f:normal` column.
///
/// # Errors
///
/// [`MeshHedgeError::AttributeTypeMismatch`] when `f:normal` already exists
/// with a type other than [`Vec3`].
pub fn update_face_normals(mesh: &mut PolygonMesh) -> Result<FaceAttr<Vec3>, MeshHedgeError> {
    let normals = mesh.face_attr_or_add("f:normal", Vec3::zeros())?;
    let faces: Vec<Face> = mesh.faces().collect();
    for f in faces {
        let n = compute_face_normal(mesh, f);
        mesh.face_attr_mut(normals)[f] = n;
    }
    Ok(normals)
}

/// Recomputes all vertex normals into the `v:normal` column.
///
/// # Errors
///
/// [`MeshHedgeError::AttributeTypeMismatch`] when `v:normal` already exists
/// with a type other than [`Vec3`].
pub fn update_vertex_normals(mesh: &mut PolygonMesh) -> Result<VertexAttr<Vec3>, MeshHedgeError> {
    let normals = mesh.vertex_attr_or_add("v:normal", Vec3::zeros())?;
    let vertices: Vec<Vertex> = mesh.vertices().collect();
    for v in vertices {
        let n = compute_vertex_normal(mesh, v);
        mesh.vertex_attr_mut(normals)[v] = n;
    }
    Ok(normals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn triangle_normal_follows_winding() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let f = mesh.add_triangle(a, b, c).unwrap();
        assert_relative_eq!(compute_face_normal(&mesh, f), Vec3::new(0.0, 0.0, 1.0));

        let mut flipped = PolygonMesh::new();
        let a = flipped.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = flipped.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = flipped.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let f = flipped.add_triangle(a, c, b).unwrap();
        assert_relative_eq!(compute_face_normal(&flipped, f), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn nonplanar_quad_normal_averages_corners() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.1));
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.1));
        let f = mesh.add_quad(a, b, c, d).unwrap();
        let n = compute_face_normal(&mesh, f);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert!(n.z > 0.9);
    }

    #[test]
    fn degenerate_face_yields_zero_normal() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(2.0, 0.0, 0.0));
        let f = mesh.add_triangle(a, b, c).unwrap();
        assert_eq!(compute_face_normal(&mesh, f), Vec3::zeros());
    }

    #[test]
    fn vertex_normals_point_away_from_a_tetrahedron() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 0.0, 1.0));
        // wound so every face normal points out of the solid
        mesh.add_triangle(a, c, b).unwrap();
        mesh.add_triangle(a, b, d).unwrap();
        mesh.add_triangle(b, c, d).unwrap();
        mesh.add_triangle(c, a, d).unwrap();

        let centroid = Vec3::new(0.25, 0.25, 0.25);
        for v in mesh.vertices() {
            let n = compute_vertex_normal(&mesh, v);
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            assert!(n.dot(&(mesh.position(v) - centroid)) > 0.0);
        }
    }

    #[test]
    fn update_fills_the_normal_columns() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let f = mesh.add_triangle(a, b, c).unwrap();

        let fnormals = update_face_normals(&mut mesh).unwrap();
        assert_relative_eq!(mesh.face_attr(fnormals)[f], Vec3::new(0.0, 0.0, 1.0));

        let vnormals = update_vertex_normals(&mut mesh).unwrap();
        assert_relative_eq!(mesh.vertex_attr(vnormals)[a], Vec3::new(0.0, 0.0, 1.0));

        // a second call reuses the columns
        assert!(update_face_normals(&mut mesh).is_ok());
        assert!(
            mesh.try_add_face_attr::<Vec3>("f:normal", Vec3::zeros())
                .is_err()
        );
    }

    #[test]
    fn edge_lengths() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(3.0, 4.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(a, b, c).unwrap();
        let e = mesh.edge(mesh.find_halfedge(a, b));
        assert_relative_eq!(edge_length(&mesh, e), 5.0);
    }
}
