//! Tombstone compaction.
//!
//! Deletion only marks elements; this pass actually reclaims them. It runs
//! in three sweeps: compute order-preserving remap tables for every element
//! kind, rewrite the connectivity of live rows through those tables, then
//! relocate the rows and truncate the arrays. User attribute columns move
//! together with their rows.
//!
//! Outstanding handles are invalidated by compaction. The halfedge remap is
//! derived from the edge remap, so twin pairs stay adjacent.

use crate::debug_invariants::DebugInvariants;
use crate::mesh::PolygonMesh;
use crate::topology::handle::{Edge, Face, Halfedge, Vertex};

impl PolygonMesh {
    /// Compacts the element arrays, dropping all tombstoned elements.
    ///
    /// No-op when the mesh carries no garbage. Handles obtained before the
    /// call must be considered invalid afterwards.
    pub fn garbage_collection(&mut self) {
        if !self.garbage {
            return;
        }

        let nv = self.vertices_size();
        let ne = self.edges_size();
        let nf = self.faces_size();

        // order-preserving remaps, invalid for tombstoned rows
        let mut vmap = vec![Vertex::invalid(); nv];
        let mut dest = 0usize;
        for i in 0..nv {
            if !self.is_deleted_vertex(Vertex::new(i)) {
                vmap[i] = Vertex::new(dest);
                dest += 1;
            }
        }
        let live_v = dest;

        let mut emap = vec![Edge::invalid(); ne];
        dest = 0;
        for i in 0..ne {
            if !self.is_deleted_edge(Edge::new(i)) {
                emap[i] = Edge::new(dest);
                dest += 1;
            }
        }
        let live_e = dest;

        let mut fmap = vec![Face::invalid(); nf];
        dest = 0;
        for i in 0..nf {
            if !self.is_deleted_face(Face::new(i)) {
                fmap[i] = Face::new(dest);
                dest += 1;
            }
        }
        let live_f = dest;

        let map_h = |h: Halfedge| -> Halfedge {
            if h.is_valid() {
                Halfedge::new((emap[h.idx() >> 1].idx() << 1) | (h.idx() & 1))
            } else {
                Halfedge::invalid()
            }
        };
        let map_v = |v: Vertex| -> Vertex {
            if v.is_valid() { vmap[v.idx()] } else { Vertex::invalid() }
        };
        let map_f = |f: Face| -> Face {
            if f.is_valid() { fmap[f.idx()] } else { Face::invalid() }
        };

        // rewrite live connectivity in place, the rows move afterwards
        for i in 0..nv {
            if vmap[i].is_valid() {
                let h = self.vconn()[i].halfedge;
                self.vconn_mut()[i].halfedge = map_h(h);
            }
        }
        for i in 0..ne {
            if !emap[i].is_valid() {
                continue;
            }
            for side in 0..2 {
                let hi = (i << 1) | side;
                let conn = self.hconn()[hi];
                let rewired = crate::topology::connectivity::HalfedgeConnectivity {
                    face: map_f(conn.face),
                    vertex: map_v(conn.vertex),
                    next: map_h(conn.next),
                    prev: map_h(conn.prev),
                };
                self.hconn_mut()[hi] = rewired;
            }
        }
        for i in 0..nf {
            if fmap[i].is_valid() {
                let h = self.fconn()[i].halfedge;
                self.fconn_mut()[i].halfedge = map_h(h);
            }
        }

        // relocate rows; ascending order keeps everything below the write
        // cursor final
        for i in 0..nv {
            if vmap[i].is_valid() {
                let d = vmap[i].idx();
                if d != i {
                    self.vattrs.swap_rows(d, i);
                }
            }
        }
        for i in 0..ne {
            if emap[i].is_valid() {
                let d = emap[i].idx();
                if d != i {
                    self.eattrs.swap_rows(d, i);
                    self.hattrs.swap_rows(d << 1, i << 1);
                    self.hattrs.swap_rows((d << 1) | 1, (i << 1) | 1);
                }
            }
        }
        for i in 0..nf {
            if fmap[i].is_valid() {
                let d = fmap[i].idx();
                if d != i {
                    self.fattrs.swap_rows(d, i);
                }
            }
        }

        self.vattrs.resize(live_v);
        self.hattrs.resize(2 * live_e);
        self.eattrs.resize(live_e);
        self.fattrs.resize(live_f);

        self.deleted_vertices = 0;
        self.deleted_edges = 0;
        self.deleted_faces = 0;
        self.garbage = false;

        log::debug!(
            "garbage_collection: compacted to {live_v} vertices, {live_e} edges, {live_f} faces \
             (dropped {} / {} / {})",
            nv - live_v,
            ne - live_e,
            nf - live_f,
        );

        crate::debug_invariants!(self.validate_invariants(), "garbage_collection");
    }
}
