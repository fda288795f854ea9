//! Face insertion.
//!
//! `try_add_face` welds a polygon onto the existing halfedge structure. The
//! hard part is not allocating elements but stitching the new loop into the
//! boundary cycles around each corner vertex without ever leaving the mesh
//! in a half-linked state: all topological checks run before the first
//! mutation, and the `next` pointer rewires are batched in a cache that is
//! applied only once the face exists.

use crate::debug_invariants::DebugInvariants;
use crate::mesh::PolygonMesh;
use crate::mesh_error::MeshHedgeError;
use crate::topology::handle::{Face, Halfedge, Vertex};

impl PolygonMesh {
    /// Adds a triangle face.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`try_add_face`](Self::try_add_face).
    pub fn add_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) -> Result<Face, MeshHedgeError> {
        self.try_add_face(&[a, b, c])
    }

    /// Adds a quad face.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`try_add_face`](Self::try_add_face).
    pub fn add_quad(
        &mut self,
        a: Vertex,
        b: Vertex,
        c: Vertex,
        d: Vertex,
    ) -> Result<Face, MeshHedgeError> {
        self.try_add_face(&[a, b, c, d])
    }

    /// Adds a face over `vertices`, given counter-clockwise.
    ///
    /// Existing edges between consecutive corners are reused; missing ones
    /// are created. On any error the mesh is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`MeshHedgeError::FaceTooSmall`] for fewer than three corners.
    /// - [`MeshHedgeError::NonManifoldVertex`] when a corner already has a
    ///   full disk of faces around it.
    /// - [`MeshHedgeError::NonManifoldEdge`] when a boundary side of the new
    ///   face already carries a face.
    /// - [`MeshHedgeError::PatchRelinkFailed`] when the faces around a
    ///   corner cannot be reordered to open a gap for the new face.
    pub fn try_add_face(&mut self, vertices: &[Vertex]) -> Result<Face, MeshHedgeError> {
        let n = vertices.len();
        if n < 3 {
            return Err(MeshHedgeError::FaceTooSmall { n });
        }

        let mut halfedges: Vec<Halfedge> = vec![Halfedge::invalid(); n];
        let mut is_new: Vec<bool> = vec![false; n];
        let mut needs_adjust: Vec<bool> = vec![false; n];
        let mut next_cache: Vec<(Halfedge, Halfedge)> = Vec::with_capacity(6 * n);

        // topological checks, no mutation yet
        for i in 0..n {
            let ii = (i + 1) % n;
            if !self.is_boundary_vertex(vertices[i]) {
                return Err(MeshHedgeError::NonManifoldVertex(vertices[i]));
            }
            halfedges[i] = self.find_halfedge(vertices[i], vertices[ii]);
            is_new[i] = !halfedges[i].is_valid();
            if !is_new[i] && !self.is_boundary_halfedge(halfedges[i]) {
                return Err(MeshHedgeError::NonManifoldEdge {
                    from: vertices[i],
                    to: vertices[ii],
                });
            }
        }

        // where two reused halfedges meet at a corner but are not chained,
        // the faces between them must be rotated out of the gap
        for i in 0..n {
            let ii = (i + 1) % n;
            if is_new[i] || is_new[ii] {
                continue;
            }
            let inner_prev = halfedges[i];
            let inner_next = halfedges[ii];
            if self.next_halfedge(inner_prev) == inner_next {
                continue;
            }

            // find a free boundary gap somewhere else around the corner
            let outer_prev = self.opposite_halfedge(inner_next);
            let mut boundary_prev = outer_prev;
            let mut steps = 0usize;
            loop {
                boundary_prev = self.opposite_halfedge(self.next_halfedge(boundary_prev));
                steps += 1;
                if steps > self.halfedges_size() {
                    return Err(MeshHedgeError::PatchRelinkFailed(vertices[ii]));
                }
                if self.is_boundary_halfedge(boundary_prev) && boundary_prev != inner_prev {
                    break;
                }
            }
            let boundary_next = self.next_halfedge(boundary_prev);
            debug_assert!(self.is_boundary_halfedge(boundary_next));
            if boundary_next == inner_next {
                return Err(MeshHedgeError::PatchRelinkFailed(vertices[ii]));
            }

            let patch_start = self.next_halfedge(inner_prev);
            let patch_end = self.prev_halfedge(inner_next);

            next_cache.push((boundary_prev, patch_start));
            next_cache.push((patch_end, boundary_next));
            next_cache.push((inner_prev, inner_next));
        }

        // point of no return: allocate missing edges
        for i in 0..n {
            let ii = (i + 1) % n;
            if is_new[i] {
                halfedges[i] = self.new_edge(vertices[i], vertices[ii]);
            }
        }

        let f = self.new_face();
        self.set_face_halfedge(f, halfedges[n - 1]);

        // wire each corner; four cases depending on which sides are new
        for i in 0..n {
            let ii = (i + 1) % n;
            let v = vertices[ii];
            let inner_prev = halfedges[i];
            let inner_next = halfedges[ii];

            let id = (is_new[i] as u8) | ((is_new[ii] as u8) << 1);
            if id > 0 {
                let outer_prev = self.opposite_halfedge(inner_next);
                let outer_next = self.opposite_halfedge(inner_prev);

                match id {
                    // new prev side, old next side
                    1 => {
                        let boundary_prev = self.prev_halfedge(inner_next);
                        next_cache.push((boundary_prev, outer_next));
                        self.set_outgoing_halfedge(v, outer_next);
                    }
                    // old prev side, new next side
                    2 => {
                        let boundary_next = self.next_halfedge(inner_prev);
                        next_cache.push((outer_prev, boundary_next));
                        self.set_outgoing_halfedge(v, boundary_next);
                    }
                    // both sides new
                    _ => {
                        if !self.outgoing_halfedge(v).is_valid() {
                            // formerly isolated corner
                            self.set_outgoing_halfedge(v, outer_next);
                            next_cache.push((outer_prev, outer_next));
                        } else {
                            let boundary_next = self.outgoing_halfedge(v);
                            let boundary_prev = self.prev_halfedge(boundary_next);
                            next_cache.push((boundary_prev, outer_next));
                            next_cache.push((outer_prev, boundary_next));
                        }
                    }
                }
                next_cache.push((inner_prev, inner_next));
            } else {
                needs_adjust[ii] = self.outgoing_halfedge(v) == inner_next;
            }

            self.set_face(halfedges[i], f);
        }

        for (h, nxt) in next_cache {
            self.set_next_halfedge(h, nxt);
        }

        for i in 0..n {
            if needs_adjust[i] {
                self.adjust_outgoing_halfedge(vertices[i]);
            }
        }

        crate::debug_invariants!(self.validate_invariants(), "try_add_face");

        Ok(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::Vec3;
    use crate::mesh::PolygonMesh;
    use crate::mesh_error::MeshHedgeError;
    use crate::topology::handle::Vertex;

    fn grid_vertices(mesh: &mut PolygonMesh, nx: usize, ny: usize) -> Vec<Vertex> {
        (0..ny)
            .flat_map(|y| (0..nx).map(move |x| (x, y)))
            .map(|(x, y)| mesh.add_vertex(Vec3::new(x as f64, y as f64, 0.0)))
            .collect()
    }

    #[test]
    fn too_few_corners() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::zeros());
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(
            mesh.try_add_face(&[a, b]),
            Err(MeshHedgeError::FaceTooSmall { n: 2 })
        ));
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn two_triangles_share_an_edge() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(a, b, c).unwrap();
        mesh.add_triangle(a, c, d).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.face_count(), 2);

        let shared = mesh.find_halfedge(a, c);
        assert!(shared.is_valid());
        assert!(!mesh.is_boundary_edge(mesh.edge(shared)));
        assert!(!mesh.is_boundary_halfedge(shared));
        assert!(!mesh.is_boundary_halfedge(mesh.opposite_halfedge(shared)));
    }

    #[test]
    fn tetrahedron_is_closed() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(a, b, c).unwrap();
        mesh.add_triangle(a, d, b).unwrap();
        mesh.add_triangle(b, d, c).unwrap();
        mesh.add_triangle(c, d, a).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 6);
        assert_eq!(mesh.halfedge_count(), 12);
        assert_eq!(mesh.face_count(), 4);

        for v in mesh.vertices() {
            assert!(!mesh.is_boundary_vertex(v));
            assert_eq!(mesh.vertex_valence(v), 3);
        }
        for e in mesh.edges() {
            assert!(!mesh.is_boundary_edge(e));
        }
        for f in mesh.faces() {
            assert!(!mesh.is_boundary_face(f));
        }
    }

    #[test]
    fn duplicate_face_is_a_non_manifold_edge() {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(a, b, c).unwrap();

        let before = (mesh.vertex_count(), mesh.edge_count(), mesh.face_count());
        assert!(matches!(
            mesh.add_triangle(a, b, c),
            Err(MeshHedgeError::NonManifoldEdge { .. })
        ));
        assert_eq!(
            before,
            (mesh.vertex_count(), mesh.edge_count(), mesh.face_count())
        );
    }

    #[test]
    fn interior_vertex_rejects_further_faces() {
        // close a tetrahedron, then try to grow a face out of one corner
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(a, b, c).unwrap();
        mesh.add_triangle(a, d, b).unwrap();
        mesh.add_triangle(b, d, c).unwrap();
        mesh.add_triangle(c, d, a).unwrap();

        let e = mesh.add_vertex(Vec3::new(2.0, 0.0, 0.0));
        let g = mesh.add_vertex(Vec3::new(2.0, 1.0, 0.0));
        let before = (mesh.edge_count(), mesh.face_count());
        assert!(matches!(
            mesh.add_triangle(b, e, g),
            Err(MeshHedgeError::NonManifoldVertex(v)) if v == b
        ));
        assert_eq!(before, (mesh.edge_count(), mesh.face_count()));
    }

    fn fan_blades(mesh: &mut PolygonMesh, blades: usize) -> (Vertex, Vec<Vertex>) {
        let hub = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let rim: Vec<Vertex> = (0..2 * blades)
            .map(|i| {
                let a = i as f64;
                mesh.add_vertex(Vec3::new(a.cos(), a.sin(), 0.0))
            })
            .collect();
        for b in 0..blades {
            mesh.add_triangle(hub, rim[2 * b], rim[2 * b + 1]).unwrap();
        }
        (hub, rim)
    }

    #[test]
    fn bridging_separate_blades_relinks_the_patch() {
        // three detached fan blades around the hub; bridging two of them
        // reuses halfedges that are not chained, so the third blade has to
        // be rotated into the remaining gap
        let mut mesh = PolygonMesh::new();
        let (hub, rim) = fan_blades(&mut mesh, 3);
        mesh.add_triangle(hub, rim[1], rim[2]).unwrap();

        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 10);
        assert_eq!(mesh.faces_around_vertex(hub).count(), 4);
        assert_eq!(mesh.vertex_valence(hub), 6);
        assert!(mesh.is_boundary_vertex(hub));
        assert!(mesh.is_manifold_vertex(hub));
    }

    #[test]
    fn unresolvable_patch_reports_relink_failure() {
        // with only two blades, welding the first one shut from the back
        // would split the hub star into two sheets; there is no free gap to
        // move the second blade into
        let mut mesh = PolygonMesh::new();
        let (hub, rim) = fan_blades(&mut mesh, 2);
        let before = (mesh.edge_count(), mesh.face_count());
        assert!(matches!(
            mesh.try_add_face(&[rim[0], hub, rim[1]]),
            Err(MeshHedgeError::PatchRelinkFailed(v)) if v == hub
        ));
        assert_eq!(before, (mesh.edge_count(), mesh.face_count()));
    }

    #[test]
    fn quad_grid_builds_cleanly() {
        let mut mesh = PolygonMesh::new();
        let v = grid_vertices(&mut mesh, 3, 3);
        for y in 0..2 {
            for x in 0..2 {
                let i = y * 3 + x;
                mesh.add_quad(v[i], v[i + 1], v[i + 4], v[i + 3]).unwrap();
            }
        }
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 4);
        // the center vertex is interior
        assert!(!mesh.is_boundary_vertex(v[4]));
        assert_eq!(mesh.vertex_valence(v[4]), 4);
        assert_eq!(mesh.faces_around_vertex(v[4]).count(), 4);
    }
}
