//! Circulators: one-lap iterators around a vertex or along a face loop.
//!
//! Each circulator visits its ring exactly once and then ends, so they plug
//! into `for` loops and iterator adapters directly. Ring order around a
//! vertex is counter-clockwise; face loops follow `next`.
//!
//! Starting a vertex circulator on an isolated vertex yields nothing, as
//! does [`FacesAroundVertex`] on a vertex whose star is all boundary.

use crate::mesh::PolygonMesh;
use crate::topology::handle::{Face, Halfedge, Vertex};

/// One-ring neighbour vertices of a vertex, counter-clockwise.
pub struct VerticesAroundVertex<'m> {
    mesh: &'m PolygonMesh,
    start: Halfedge,
    current: Halfedge,
    started: bool,
}

impl<'m> Iterator for VerticesAroundVertex<'m> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        if !self.current.is_valid() || (self.started && self.current == self.start) {
            return None;
        }
        self.started = true;
        let v = self.mesh.to_vertex(self.current);
        self.current = self.mesh.ccw_rotated_halfedge(self.current);
        Some(v)
    }
}

/// Outgoing halfedges of a vertex, counter-clockwise.
pub struct HalfedgesAroundVertex<'m> {
    mesh: &'m PolygonMesh,
    start: Halfedge,
    current: Halfedge,
    started: bool,
}

impl<'m> Iterator for HalfedgesAroundVertex<'m> {
    type Item = Halfedge;

    fn next(&mut self) -> Option<Halfedge> {
        if !self.current.is_valid() || (self.started && self.current == self.start) {
            return None;
        }
        self.started = true;
        let h = self.current;
        self.current = self.mesh.ccw_rotated_halfedge(self.current);
        Some(h)
    }
}

/// Faces incident to a vertex, counter-clockwise, boundary gaps skipped.
pub struct FacesAroundVertex<'m> {
    mesh: &'m PolygonMesh,
    start: Halfedge,
    current: Halfedge,
    started: bool,
}

impl<'m> FacesAroundVertex<'m> {
    fn new(mesh: &'m PolygonMesh, v: Vertex) -> Self {
        // position on an outgoing halfedge with a face; a star that is all
        // boundary circulates empty
        let mut start = mesh.outgoing_halfedge(v);
        if start.is_valid() {
            let h0 = start;
            while mesh.is_boundary_halfedge(start) {
                start = mesh.ccw_rotated_halfedge(start);
                if start == h0 {
                    start = Halfedge::invalid();
                    break;
                }
            }
        }
        Self {
            mesh,
            start,
            current: start,
            started: false,
        }
    }
}

impl<'m> Iterator for FacesAroundVertex<'m> {
    type Item = Face;

    fn next(&mut self) -> Option<Face> {
        if !self.current.is_valid() || (self.started && self.current == self.start) {
            return None;
        }
        self.started = true;
        let f = self.mesh.face(self.current);
        loop {
            self.current = self.mesh.ccw_rotated_halfedge(self.current);
            if !self.mesh.is_boundary_halfedge(self.current) {
                break;
            }
        }
        Some(f)
    }
}

/// Corner vertices of a face, in loop order.
pub struct VerticesOfFace<'m> {
    mesh: &'m PolygonMesh,
    start: Halfedge,
    current: Halfedge,
    started: bool,
}

impl<'m> Iterator for VerticesOfFace<'m> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        if !self.current.is_valid() || (self.started && self.current == self.start) {
            return None;
        }
        self.started = true;
        let v = self.mesh.to_vertex(self.current);
        self.current = self.mesh.next_halfedge(self.current);
        Some(v)
    }
}

/// Halfedges of a face loop, in `next` order.
pub struct HalfedgesOfFace<'m> {
    mesh: &'m PolygonMesh,
    start: Halfedge,
    current: Halfedge,
    started: bool,
}

impl<'m> Iterator for HalfedgesOfFace<'m> {
    type Item = Halfedge;

    fn next(&mut self) -> Option<Halfedge> {
        if !self.current.is_valid() || (self.started && self.current == self.start) {
            return None;
        }
        self.started = true;
        let h = self.current;
        self.current = self.mesh.next_halfedge(self.current);
        Some(h)
    }
}

impl PolygonMesh {
    /// One-ring neighbours of `v`, counter-clockwise.
    pub fn vertices_around_vertex(&self, v: Vertex) -> VerticesAroundVertex<'_> {
        let start = self.outgoing_halfedge(v);
        VerticesAroundVertex {
            mesh: self,
            start,
            current: start,
            started: false,
        }
    }

    /// Outgoing halfedges of `v`, counter-clockwise.
    pub fn halfedges_around_vertex(&self, v: Vertex) -> HalfedgesAroundVertex<'_> {
        let start = self.outgoing_halfedge(v);
        HalfedgesAroundVertex {
            mesh: self,
            start,
            current: start,
            started: false,
        }
    }

    /// Faces incident to `v`, counter-clockwise.
    pub fn faces_around_vertex(&self, v: Vertex) -> FacesAroundVertex<'_> {
        FacesAroundVertex::new(self, v)
    }

    /// Corner vertices of `f`, in loop order.
    pub fn vertices_of_face(&self, f: Face) -> VerticesOfFace<'_> {
        let start = self.face_halfedge(f);
        VerticesOfFace {
            mesh: self,
            start,
            current: start,
            started: false,
        }
    }

    /// Halfedges of the loop of `f`, in `next` order.
    pub fn halfedges_of_face(&self, f: Face) -> HalfedgesOfFace<'_> {
        let start = self.face_halfedge(f);
        HalfedgesOfFace {
            mesh: self,
            start,
            current: start,
            started: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Vec3;
    use crate::mesh::PolygonMesh;

    #[test]
    fn isolated_vertex_circulates_empty() {
        let mut mesh = PolygonMesh::new();
        let v = mesh.add_vertex(Vec3::zeros());
        assert_eq!(mesh.vertices_around_vertex(v).count(), 0);
        assert_eq!(mesh.halfedges_around_vertex(v).count(), 0);
        assert_eq!(mesh.faces_around_vertex(v).count(), 0);
    }

    #[test]
    fn triangle_rings_complete_one_lap() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let f = mesh.add_triangle(a, b, c).unwrap();

        let mut ring: Vec<_> = mesh.vertices_around_vertex(a).collect();
        ring.sort_unstable();
        let mut want = vec![b, c];
        want.sort_unstable();
        assert_eq!(ring, want);

        assert_eq!(mesh.halfedges_around_vertex(a).count(), 2);
        assert_eq!(mesh.faces_around_vertex(a).collect::<Vec<_>>(), vec![f]);

        let corners: Vec<_> = mesh.vertices_of_face(f).collect();
        assert_eq!(corners.len(), 3);
        assert!(corners.contains(&a) && corners.contains(&b) && corners.contains(&c));
        assert_eq!(mesh.halfedges_of_face(f).count(), 3);
    }

    #[test]
    fn face_loop_follows_corner_order() {
        let mut mesh = PolygonMesh::new();
        let v: Vec<_> = (0..4)
            .map(|i| mesh.add_vertex(Vec3::new(i as f64, 0.0, 0.0)))
            .collect();
        let f = mesh.try_add_face(&v).unwrap();
        let corners: Vec<_> = mesh.vertices_of_face(f).collect();
        // the loop visits the corners cyclically in insertion order
        let pos = corners.iter().position(|&c| c == v[0]).unwrap();
        let rotated: Vec<_> = (0..4).map(|i| corners[(pos + i) % 4]).collect();
        assert_eq!(rotated, v);
    }

    #[test]
    fn interior_vertex_sees_all_faces() {
        // fan of two triangles sharing vertex 0
        let mut mesh = PolygonMesh::new();
        let o = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let a = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(-1.0, 0.0, 0.0));
        let f0 = mesh.add_triangle(o, a, b).unwrap();
        let f1 = mesh.add_triangle(o, b, c).unwrap();
        let mut faces: Vec<_> = mesh.faces_around_vertex(o).collect();
        faces.sort_unstable();
        assert_eq!(faces, vec![f0, f1]);
    }
}
