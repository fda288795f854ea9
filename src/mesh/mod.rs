//! The polygon-mesh kernel.
//!
//! [`PolygonMesh`] stores an indexed half-edge structure in
//! struct-of-arrays form: every element kind (vertex, halfedge, edge, face)
//! owns an attribute store, and the connectivity itself lives in built-in
//! columns of those stores. Twin halfedges are allocated in adjacent pairs,
//! so `opposite` and `edge` are index arithmetic rather than lookups.
//!
//! Deletion is deferred: `delete_*` only marks tombstones and flips the
//! garbage flag; [`PolygonMesh::garbage_collection`] compacts the arrays and
//! invalidates outstanding handles.
//!
//! The built-in columns are named `v:connectivity`, `h:connectivity`,
//! `f:connectivity`, `v:point`, `v:deleted`, `e:deleted` and `f:deleted`.

mod add_face;
mod circulators;
mod garbage;
mod iter;
mod validation;

pub use circulators::{
    FacesAroundVertex, HalfedgesAroundVertex, HalfedgesOfFace, VerticesAroundVertex,
    VerticesOfFace,
};
pub use iter::{EdgeIter, FaceIter, HalfedgeIter, VertexIter};

use crate::Vec3;
use crate::attrib::store::{Attr, AttrStore, AttrValue};
use crate::attrib::{
    AttrSlice, AttrSliceMut, EdgeAttr, FaceAttr, HalfedgeAttr, VertexAttr,
};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshHedgeError;
use crate::params::ParameterSet;
use crate::topology::connectivity::{FaceConnectivity, HalfedgeConnectivity, VertexConnectivity};
use crate::topology::handle::{Edge, Face, Halfedge, Vertex};
use std::fmt;

/// An indexed half-edge polygon mesh.
///
/// # Example
///
/// ```rust
/// use mesh_hedge::mesh::PolygonMesh;
/// use mesh_hedge::Vec3;
///
/// let mut mesh = PolygonMesh::new();
/// let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
/// let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
/// let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
/// let f = mesh.add_triangle(a, b, c).unwrap();
/// assert_eq!(mesh.face_count(), 1);
/// assert_eq!(mesh.vertices_of_face(f).count(), 3);
/// ```
#[derive(Clone)]
pub struct PolygonMesh {
    pub(crate) vattrs: AttrStore,
    pub(crate) hattrs: AttrStore,
    pub(crate) eattrs: AttrStore,
    pub(crate) fattrs: AttrStore,

    pub(crate) vconn: Attr<VertexConnectivity>,
    pub(crate) hconn: Attr<HalfedgeConnectivity>,
    pub(crate) fconn: Attr<FaceConnectivity>,
    pub(crate) vpoint: Attr<Vec3>,
    pub(crate) vdeleted: Attr<bool>,
    pub(crate) edeleted: Attr<bool>,
    pub(crate) fdeleted: Attr<bool>,

    pub(crate) deleted_vertices: usize,
    pub(crate) deleted_edges: usize,
    pub(crate) deleted_faces: usize,
    pub(crate) garbage: bool,

    params: ParameterSet,
}

impl Default for PolygonMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PolygonMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolygonMesh")
            .field("vertices", &self.vertex_count())
            .field("edges", &self.edge_count())
            .field("faces", &self.face_count())
            .field("garbage", &self.garbage)
            .finish()
    }
}

impl PolygonMesh {
    /// Creates an empty mesh with the built-in attribute columns.
    pub fn new() -> Self {
        let mut vattrs = AttrStore::new();
        let mut hattrs = AttrStore::new();
        let mut eattrs = AttrStore::new();
        let mut fattrs = AttrStore::new();

        let vconn = vattrs.add_unchecked("v:connectivity", VertexConnectivity::default());
        let vpoint = vattrs.add_unchecked("v:point", Vec3::zeros());
        let vdeleted = vattrs.add_unchecked("v:deleted", false);
        let hconn = hattrs.add_unchecked("h:connectivity", HalfedgeConnectivity::default());
        let edeleted = eattrs.add_unchecked("e:deleted", false);
        let fconn = fattrs.add_unchecked("f:connectivity", FaceConnectivity::default());
        let fdeleted = fattrs.add_unchecked("f:deleted", false);

        Self {
            vattrs,
            hattrs,
            eattrs,
            fattrs,
            vconn,
            hconn,
            fconn,
            vpoint,
            vdeleted,
            edeleted,
            fdeleted,
            deleted_vertices: 0,
            deleted_edges: 0,
            deleted_faces: 0,
            garbage: false,
            params: ParameterSet::new(),
        }
    }

    // ---------------------------------------------------------------------
    // internal column views
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn vconn(&self) -> &[VertexConnectivity] {
        self.vattrs.data(self.vconn)
    }
    #[inline]
    pub(crate) fn vconn_mut(&mut self) -> &mut [VertexConnectivity] {
        self.vattrs.data_mut(self.vconn)
    }
    #[inline]
    pub(crate) fn hconn(&self) -> &[HalfedgeConnectivity] {
        self.hattrs.data(self.hconn)
    }
    #[inline]
    pub(crate) fn hconn_mut(&mut self) -> &mut [HalfedgeConnectivity] {
        self.hattrs.data_mut(self.hconn)
    }
    #[inline]
    pub(crate) fn fconn(&self) -> &[FaceConnectivity] {
        self.fattrs.data(self.fconn)
    }
    #[inline]
    pub(crate) fn fconn_mut(&mut self) -> &mut [FaceConnectivity] {
        self.fattrs.data_mut(self.fconn)
    }

    // ---------------------------------------------------------------------
    // sizes, counts, flags
    // ---------------------------------------------------------------------

    /// Raw length of the vertex arrays, tombstones included.
    #[inline]
    pub fn vertices_size(&self) -> usize {
        self.vattrs.len()
    }
    /// Raw length of the halfedge arrays, tombstones included.
    #[inline]
    pub fn halfedges_size(&self) -> usize {
        self.hattrs.len()
    }
    /// Raw length of the edge arrays, tombstones included.
    #[inline]
    pub fn edges_size(&self) -> usize {
        self.eattrs.len()
    }
    /// Raw length of the face arrays, tombstones included.
    #[inline]
    pub fn faces_size(&self) -> usize {
        self.fattrs.len()
    }

    /// Number of live vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices_size() - self.deleted_vertices
    }
    /// Number of live halfedges.
    #[inline]
    pub fn halfedge_count(&self) -> usize {
        self.halfedges_size() - 2 * self.deleted_edges
    }
    /// Number of live edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges_size() - self.deleted_edges
    }
    /// Number of live faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces_size() - self.deleted_faces
    }

    /// Whether the mesh holds no live vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Whether tombstoned elements are present.
    #[inline]
    pub fn has_garbage(&self) -> bool {
        self.garbage
    }

    /// Whether `v` names a slot inside the vertex arrays.
    #[inline]
    pub fn is_valid_vertex(&self, v: Vertex) -> bool {
        v.is_valid() && v.idx() < self.vertices_size()
    }
    /// Whether `h` names a slot inside the halfedge arrays.
    #[inline]
    pub fn is_valid_halfedge(&self, h: Halfedge) -> bool {
        h.is_valid() && h.idx() < self.halfedges_size()
    }
    /// Whether `e` names a slot inside the edge arrays.
    #[inline]
    pub fn is_valid_edge(&self, e: Edge) -> bool {
        e.is_valid() && e.idx() < self.edges_size()
    }
    /// Whether `f` names a slot inside the face arrays.
    #[inline]
    pub fn is_valid_face(&self, f: Face) -> bool {
        f.is_valid() && f.idx() < self.faces_size()
    }

    /// Whether vertex `v` is tombstoned.
    #[inline]
    pub fn is_deleted_vertex(&self, v: Vertex) -> bool {
        self.vattrs.data(self.vdeleted)[v.idx()]
    }
    /// Whether the edge of `h` is tombstoned.
    #[inline]
    pub fn is_deleted_halfedge(&self, h: Halfedge) -> bool {
        self.is_deleted_edge(self.edge(h))
    }
    /// Whether edge `e` is tombstoned.
    #[inline]
    pub fn is_deleted_edge(&self, e: Edge) -> bool {
        self.eattrs.data(self.edeleted)[e.idx()]
    }
    /// Whether face `f` is tombstoned.
    #[inline]
    pub fn is_deleted_face(&self, f: Face) -> bool {
        self.fattrs.data(self.fdeleted)[f.idx()]
    }

    // ---------------------------------------------------------------------
    // vertex connectivity
    // ---------------------------------------------------------------------

    /// An outgoing halfedge of `v`, invalid if `v` is isolated.
    #[inline]
    pub fn outgoing_halfedge(&self, v: Vertex) -> Halfedge {
        self.vconn()[v.idx()].halfedge
    }

    /// Sets the outgoing halfedge of `v`.
    #[inline]
    pub fn set_outgoing_halfedge(&mut self, v: Vertex, h: Halfedge) {
        self.vconn_mut()[v.idx()].halfedge = h;
    }

    /// Whether `v` has no incident elements at all.
    #[inline]
    pub fn is_isolated(&self, v: Vertex) -> bool {
        !self.outgoing_halfedge(v).is_valid()
    }

    /// Whether `v` lies on a boundary (or is isolated).
    ///
    /// Relies on the invariant that the stored outgoing halfedge of a
    /// boundary vertex is a boundary halfedge.
    #[inline]
    pub fn is_boundary_vertex(&self, v: Vertex) -> bool {
        let h = self.outgoing_halfedge(v);
        !(h.is_valid() && self.face(h).is_valid())
    }

    /// Whether the star of `v` is a single sheet (at most one boundary gap).
    pub fn is_manifold_vertex(&self, v: Vertex) -> bool {
        let mut gaps = 0;
        let h0 = self.outgoing_halfedge(v);
        if h0.is_valid() {
            let mut h = h0;
            loop {
                if self.is_boundary_halfedge(h) {
                    gaps += 1;
                }
                h = self.cw_rotated_halfedge(h);
                if h == h0 {
                    break;
                }
            }
        }
        gaps < 2
    }

    /// Number of edges incident to `v`.
    pub fn vertex_valence(&self, v: Vertex) -> usize {
        self.vertices_around_vertex(v).count()
    }

    // ---------------------------------------------------------------------
    // halfedge/edge connectivity
    // ---------------------------------------------------------------------

    /// The vertex `h` points to.
    #[inline]
    pub fn to_vertex(&self, h: Halfedge) -> Vertex {
        self.hconn()[h.idx()].vertex
    }

    /// The vertex `h` emanates from.
    #[inline]
    pub fn from_vertex(&self, h: Halfedge) -> Vertex {
        self.to_vertex(self.opposite_halfedge(h))
    }

    /// Sets the target vertex of `h`.
    #[inline]
    pub fn set_to_vertex(&mut self, h: Halfedge, v: Vertex) {
        self.hconn_mut()[h.idx()].vertex = v;
    }

    /// The face incident to `h`, invalid on the boundary.
    #[inline]
    pub fn face(&self, h: Halfedge) -> Face {
        self.hconn()[h.idx()].face
    }

    /// Sets the face incident to `h`.
    #[inline]
    pub fn set_face(&mut self, h: Halfedge, f: Face) {
        self.hconn_mut()[h.idx()].face = f;
    }

    /// The halfedge following `h` within its face (or boundary loop).
    #[inline]
    pub fn next_halfedge(&self, h: Halfedge) -> Halfedge {
        self.hconn()[h.idx()].next
    }

    /// The halfedge preceding `h` within its face (or boundary loop).
    #[inline]
    pub fn prev_halfedge(&self, h: Halfedge) -> Halfedge {
        self.hconn()[h.idx()].prev
    }

    /// Chains `nxt` after `h`, keeping the `prev` pointer of `nxt` in sync.
    #[inline]
    pub fn set_next_halfedge(&mut self, h: Halfedge, nxt: Halfedge) {
        let conn = self.hconn_mut();
        conn[h.idx()].next = nxt;
        conn[nxt.idx()].prev = h;
    }

    /// The twin of `h`.
    #[inline]
    pub fn opposite_halfedge(&self, h: Halfedge) -> Halfedge {
        Halfedge::new(h.idx() ^ 1)
    }

    /// Rotates counter-clockwise around the source vertex of `h`.
    #[inline]
    pub fn ccw_rotated_halfedge(&self, h: Halfedge) -> Halfedge {
        self.opposite_halfedge(self.prev_halfedge(h))
    }

    /// Rotates clockwise around the source vertex of `h`.
    #[inline]
    pub fn cw_rotated_halfedge(&self, h: Halfedge) -> Halfedge {
        self.next_halfedge(self.opposite_halfedge(h))
    }

    /// The edge `h` belongs to.
    #[inline]
    pub fn edge(&self, h: Halfedge) -> Edge {
        Edge::new(h.idx() >> 1)
    }

    /// Halfedge `i` (0 or 1) of edge `e`.
    #[inline]
    pub fn edge_halfedge(&self, e: Edge, i: usize) -> Halfedge {
        debug_assert!(i <= 1, "edge side must be 0 or 1");
        Halfedge::new((e.idx() << 1) | i)
    }

    /// Endpoint `i` (0 or 1) of edge `e`.
    #[inline]
    pub fn edge_vertex(&self, e: Edge, i: usize) -> Vertex {
        self.to_vertex(self.edge_halfedge(e, i))
    }

    /// The face on side `i` (0 or 1) of edge `e`, invalid on the boundary.
    #[inline]
    pub fn edge_face(&self, e: Edge, i: usize) -> Face {
        self.face(self.edge_halfedge(e, i))
    }

    /// Whether `h` is a boundary halfedge (has no incident face).
    #[inline]
    pub fn is_boundary_halfedge(&self, h: Halfedge) -> bool {
        !self.face(h).is_valid()
    }

    /// Whether `e` touches the boundary on either side.
    #[inline]
    pub fn is_boundary_edge(&self, e: Edge) -> bool {
        self.is_boundary_halfedge(self.edge_halfedge(e, 0))
            || self.is_boundary_halfedge(self.edge_halfedge(e, 1))
    }

    // ---------------------------------------------------------------------
    // face connectivity
    // ---------------------------------------------------------------------

    /// A halfedge of the loop of `f`.
    #[inline]
    pub fn face_halfedge(&self, f: Face) -> Halfedge {
        self.fconn()[f.idx()].halfedge
    }

    /// Sets the canonical halfedge of `f`.
    #[inline]
    pub fn set_face_halfedge(&mut self, f: Face, h: Halfedge) {
        self.fconn_mut()[f.idx()].halfedge = h;
    }

    /// Whether `f` has at least one edge on the boundary.
    pub fn is_boundary_face(&self, f: Face) -> bool {
        self.halfedges_of_face(f)
            .any(|h| self.is_boundary_halfedge(self.opposite_halfedge(h)))
    }

    /// Number of corners of `f`.
    pub fn face_degree(&self, f: Face) -> usize {
        self.halfedges_of_face(f).count()
    }

    // ---------------------------------------------------------------------
    // searches
    // ---------------------------------------------------------------------

    /// The halfedge from `from` to `to`, invalid if the vertices are not
    /// joined by an edge.
    pub fn find_halfedge(&self, from: Vertex, to: Vertex) -> Halfedge {
        let h0 = self.outgoing_halfedge(from);
        if h0.is_valid() {
            let mut h = h0;
            loop {
                if self.to_vertex(h) == to {
                    return h;
                }
                h = self.cw_rotated_halfedge(h);
                if h == h0 {
                    break;
                }
            }
        }
        Halfedge::invalid()
    }

    /// Rotates the stored outgoing halfedge of `v` onto a boundary halfedge
    /// if the star of `v` has one.
    pub fn adjust_outgoing_halfedge(&mut self, v: Vertex) {
        let h0 = self.outgoing_halfedge(v);
        if h0.is_valid() {
            let mut h = h0;
            loop {
                if self.is_boundary_halfedge(h) {
                    self.set_outgoing_halfedge(v, h);
                    return;
                }
                h = self.cw_rotated_halfedge(h);
                if h == h0 {
                    break;
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // element allocation
    // ---------------------------------------------------------------------

    /// Appends an unconnected vertex row.
    pub fn new_vertex(&mut self) -> Vertex {
        self.vattrs.push_row();
        Vertex::new(self.vertices_size() - 1)
    }

    /// Appends a vertex at position `p`.
    pub fn add_vertex(&mut self, p: Vec3) -> Vertex {
        let v = self.new_vertex();
        self.vattrs.data_mut(self.vpoint)[v.idx()] = p;
        v
    }

    /// Allocates an edge between `from` and `to` and returns the halfedge
    /// pointing to `to`. The pair is not chained into any loop yet.
    pub fn new_edge(&mut self, from: Vertex, to: Vertex) -> Halfedge {
        debug_assert!(from != to, "edge endpoints must differ");
        self.eattrs.push_row();
        self.hattrs.push_row();
        self.hattrs.push_row();
        let h0 = Halfedge::new(self.halfedges_size() - 2);
        let h1 = Halfedge::new(self.halfedges_size() - 1);
        self.set_to_vertex(h0, to);
        self.set_to_vertex(h1, from);
        h0
    }

    /// Appends an unconnected face row.
    pub fn new_face(&mut self) -> Face {
        self.fattrs.push_row();
        Face::new(self.faces_size() - 1)
    }

    // ---------------------------------------------------------------------
    // deletion
    // ---------------------------------------------------------------------

    /// Tombstones `f`, detaching its loop and removing edges that end up
    /// with no incident face. Handles stay stable until
    /// [`garbage_collection`](Self::garbage_collection).
    pub fn delete_face(&mut self, f: Face) {
        if self.is_deleted_face(f) {
            return;
        }
        self.fattrs.data_mut(self.fdeleted)[f.idx()] = true;
        self.deleted_faces += 1;

        let loop_halfedges: Vec<Halfedge> = self.halfedges_of_face(f).collect();
        let mut dead_edges: Vec<Edge> = Vec::with_capacity(3);
        let mut touched: Vec<Vertex> = Vec::with_capacity(loop_halfedges.len());

        for &h in &loop_halfedges {
            self.set_face(h, Face::invalid());
            if self.is_boundary_halfedge(self.opposite_halfedge(h)) {
                dead_edges.push(self.edge(h));
            }
            touched.push(self.to_vertex(h));
        }

        for e in dead_edges {
            self.unlink_wire_edge(e);
        }

        for v in touched {
            self.adjust_outgoing_halfedge(v);
        }

        self.garbage = true;
        self.debug_assert_invariants();
    }

    /// Tombstones `e` together with its incident faces.
    pub fn delete_edge(&mut self, e: Edge) {
        if self.is_deleted_edge(e) {
            return;
        }
        let f0 = self.edge_face(e, 0);
        let f1 = self.edge_face(e, 1);
        if f0.is_valid() {
            self.delete_face(f0);
        }
        if f1.is_valid() {
            self.delete_face(f1);
        }
        // wire edge with no faces on either side
        if !self.is_deleted_edge(e) {
            let v0 = self.edge_vertex(e, 0);
            let v1 = self.edge_vertex(e, 1);
            self.unlink_wire_edge(e);
            if !self.is_deleted_vertex(v0) {
                self.adjust_outgoing_halfedge(v0);
            }
            if !self.is_deleted_vertex(v1) {
                self.adjust_outgoing_halfedge(v1);
            }
            self.garbage = true;
        }
    }

    /// Tombstones `v` together with all faces of its star.
    pub fn delete_vertex(&mut self, v: Vertex) {
        if self.is_deleted_vertex(v) {
            return;
        }
        let incident: Vec<Face> = self.faces_around_vertex(v).collect();
        for f in incident {
            self.delete_face(f);
        }
        // removing the last incident edge may already have tombstoned v
        if !self.is_deleted_vertex(v) {
            self.vattrs.data_mut(self.vdeleted)[v.idx()] = true;
            self.deleted_vertices += 1;
        }
        self.garbage = true;
    }

    /// Splices an edge with no incident faces out of its boundary loops and
    /// tombstones it. Endpoints that become isolated are tombstoned too.
    fn unlink_wire_edge(&mut self, e: Edge) {
        let h0 = self.edge_halfedge(e, 0);
        let h1 = self.edge_halfedge(e, 1);
        let v0 = self.to_vertex(h0);
        let v1 = self.to_vertex(h1);
        let next0 = self.next_halfedge(h0);
        let prev0 = self.prev_halfedge(h0);
        let next1 = self.next_halfedge(h1);
        let prev1 = self.prev_halfedge(h1);

        self.set_next_halfedge(prev0, next1);
        self.set_next_halfedge(prev1, next0);

        self.eattrs.data_mut(self.edeleted)[e.idx()] = true;
        self.deleted_edges += 1;

        if self.outgoing_halfedge(v0) == h1 {
            if next0 == h1 {
                // v0 lost its last edge
                self.vattrs.data_mut(self.vdeleted)[v0.idx()] = true;
                self.deleted_vertices += 1;
                self.set_outgoing_halfedge(v0, Halfedge::invalid());
            } else {
                self.set_outgoing_halfedge(v0, next0);
            }
        }
        if self.outgoing_halfedge(v1) == h0 {
            if next1 == h0 {
                // v1 lost its last edge
                self.vattrs.data_mut(self.vdeleted)[v1.idx()] = true;
                self.deleted_vertices += 1;
                self.set_outgoing_halfedge(v1, Halfedge::invalid());
            } else {
                self.set_outgoing_halfedge(v1, next1);
            }
        }
    }

    // ---------------------------------------------------------------------
    // memory management
    // ---------------------------------------------------------------------

    /// Drops every element. User attribute columns survive at length zero.
    pub fn clear(&mut self) {
        self.vattrs.resize(0);
        self.hattrs.resize(0);
        self.eattrs.resize(0);
        self.fattrs.resize(0);
        self.free_memory();
        self.deleted_vertices = 0;
        self.deleted_edges = 0;
        self.deleted_faces = 0;
        self.garbage = false;
    }

    /// Shrinks every attribute allocation to its length.
    pub fn free_memory(&mut self) {
        self.vattrs.free_memory();
        self.hattrs.free_memory();
        self.eattrs.free_memory();
        self.fattrs.free_memory();
    }

    /// Reserves room for `nv` vertices, `ne` edges and `nf` faces.
    pub fn reserve(&mut self, nv: usize, ne: usize, nf: usize) {
        self.vattrs.reserve(nv);
        self.hattrs.reserve(2 * ne);
        self.eattrs.reserve(ne);
        self.fattrs.reserve(nf);
    }

    // ---------------------------------------------------------------------
    // geometry built-ins
    // ---------------------------------------------------------------------

    /// Position of vertex `v`.
    #[inline]
    pub fn position(&self, v: Vertex) -> Vec3 {
        self.vattrs.data(self.vpoint)[v.idx()]
    }

    /// Moves vertex `v` to `p`.
    #[inline]
    pub fn set_position(&mut self, v: Vertex, p: Vec3) {
        self.vattrs.data_mut(self.vpoint)[v.idx()] = p;
    }

    /// The whole position column, indexable by vertex handle.
    #[inline]
    pub fn positions(&self) -> AttrSlice<'_, Vertex, Vec3> {
        AttrSlice::new(self.vattrs.data(self.vpoint))
    }

    /// Mutable position column, indexable by vertex handle.
    #[inline]
    pub fn positions_mut(&mut self) -> AttrSliceMut<'_, Vertex, Vec3> {
        AttrSliceMut::new(self.vattrs.data_mut(self.vpoint))
    }

    // ---------------------------------------------------------------------
    // parameters
    // ---------------------------------------------------------------------

    /// The parameter registry carried by this mesh.
    #[inline]
    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Mutable access to the parameter registry.
    #[inline]
    pub fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }
}

macro_rules! impl_attr_surface {
    ($store:ident, $key:ident, $handle:ty,
     $try_add:ident, $get:ident, $or_add:ident, $remove:ident,
     $view:ident, $view_mut:ident, $names:ident, $kind:literal) => {
        impl PolygonMesh {
            #[doc = concat!("Adds a per-", $kind, " attribute column.")]
            ///
            /// # Errors
            ///
            /// [`MeshHedgeError::DuplicateAttribute`] if the name is taken.
            pub fn $try_add<T: AttrValue>(
                &mut self,
                name: &str,
                default: T,
            ) -> Result<$key<T>, MeshHedgeError> {
                Ok($key(self.$store.try_add(name, default)?))
            }

            #[doc = concat!("Looks up a per-", $kind, " attribute column by name.")]
            ///
            /// Returns `None` when the name is missing or stores another type.
            pub fn $get<T: AttrValue>(&self, name: &str) -> Option<$key<T>> {
                self.$store.get(name).map($key)
            }

            #[doc = concat!("Looks up or creates a per-", $kind, " attribute column.")]
            ///
            /// # Errors
            ///
            /// [`MeshHedgeError::AttributeTypeMismatch`] when the existing
            /// column stores another type.
            pub fn $or_add<T: AttrValue>(
                &mut self,
                name: &str,
                default: T,
            ) -> Result<$key<T>, MeshHedgeError> {
                Ok($key(self.$store.try_get_or_add(name, default)?))
            }

            #[doc = concat!("Removes a per-", $kind, " attribute column.")]
            pub fn $remove<T: AttrValue>(&mut self, attr: $key<T>) {
                self.$store.remove(attr.0);
            }

            #[doc = concat!("Read-only view of a per-", $kind, " column.")]
            ///
            /// # Panics
            ///
            /// Panics if the column behind `attr` was removed.
            pub fn $view<T: AttrValue>(&self, attr: $key<T>) -> AttrSlice<'_, $handle, T> {
                AttrSlice::new(self.$store.data(attr.0))
            }

            #[doc = concat!("Mutable view of a per-", $kind, " column.")]
            ///
            /// # Panics
            ///
            /// Panics if the column behind `attr` was removed.
            pub fn $view_mut<T: AttrValue>(
                &mut self,
                attr: $key<T>,
            ) -> AttrSliceMut<'_, $handle, T> {
                AttrSliceMut::new(self.$store.data_mut(attr.0))
            }

            #[doc = concat!("Names of all per-", $kind, " columns.")]
            pub fn $names(&self) -> Vec<&str> {
                self.$store.names()
            }
        }
    };
}

impl_attr_surface!(
    vattrs, VertexAttr, Vertex,
    try_add_vertex_attr, get_vertex_attr, vertex_attr_or_add, remove_vertex_attr,
    vertex_attr, vertex_attr_mut, vertex_attr_names, "vertex"
);
impl_attr_surface!(
    hattrs, HalfedgeAttr, Halfedge,
    try_add_halfedge_attr, get_halfedge_attr, halfedge_attr_or_add, remove_halfedge_attr,
    halfedge_attr, halfedge_attr_mut, halfedge_attr_names, "halfedge"
);
impl_attr_surface!(
    eattrs, EdgeAttr, Edge,
    try_add_edge_attr, get_edge_attr, edge_attr_or_add, remove_edge_attr,
    edge_attr, edge_attr_mut, edge_attr_names, "edge"
);
impl_attr_surface!(
    fattrs, FaceAttr, Face,
    try_add_face_attr, get_face_attr, face_attr_or_add, remove_face_attr,
    face_attr, face_attr_mut, face_attr_names, "face"
);

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (PolygonMesh, [Vertex; 3], Face) {
        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let f = mesh.add_triangle(a, b, c).unwrap();
        (mesh, [a, b, c], f)
    }

    #[test]
    fn empty_mesh() {
        let mesh = PolygonMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert!(!mesh.has_garbage());
    }

    #[test]
    fn isolated_vertex() {
        let mut mesh = PolygonMesh::new();
        let v = mesh.add_vertex(Vec3::new(1.0, 2.0, 3.0));
        assert!(mesh.is_isolated(v));
        assert!(mesh.is_boundary_vertex(v));
        assert_eq!(mesh.position(v), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn triangle_connectivity() {
        let (mesh, [a, b, c], f) = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert_eq!(mesh.halfedge_count(), 6);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.face_degree(f), 3);

        let h = mesh.find_halfedge(a, b);
        assert!(h.is_valid());
        assert_eq!(mesh.from_vertex(h), a);
        assert_eq!(mesh.to_vertex(h), b);
        assert_eq!(mesh.face(h), f);
        assert_eq!(mesh.to_vertex(mesh.next_halfedge(h)), c);
        assert_eq!(mesh.opposite_halfedge(mesh.opposite_halfedge(h)), h);
        assert_eq!(mesh.edge(h), mesh.edge(mesh.opposite_halfedge(h)));

        // a lone triangle is all boundary
        for v in [a, b, c] {
            assert!(mesh.is_boundary_vertex(v));
            assert!(mesh.is_manifold_vertex(v));
        }
        assert!(mesh.is_boundary_face(f));
    }

    #[test]
    fn set_next_keeps_prev_in_sync() {
        let (mut mesh, [a, b, _], _) = triangle();
        let h = mesh.find_halfedge(a, b);
        let nxt = mesh.next_halfedge(h);
        mesh.set_next_halfedge(h, nxt);
        assert_eq!(mesh.prev_halfedge(nxt), h);
    }

    #[test]
    fn valence_and_degree() {
        let (mesh, [a, _, _], f) = triangle();
        assert_eq!(mesh.vertex_valence(a), 2);
        assert_eq!(mesh.face_degree(f), 3);
    }

    #[test]
    fn clear_keeps_user_columns() {
        let (mut mesh, _, _) = triangle();
        let weight = mesh.try_add_vertex_attr::<f64>("v:weight", 0.0).unwrap();
        mesh.clear();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_attr(weight).len(), 0);
        assert!(mesh.vertex_attr_names().contains(&"v:weight"));
        // the mesh is usable again
        let v = mesh.add_vertex(Vec3::zeros());
        assert_eq!(mesh.vertex_attr(weight)[v], 0.0);
    }

    #[test]
    fn delete_face_makes_edges_boundary_garbage() {
        let (mut mesh, [a, b, c], f) = triangle();
        mesh.delete_face(f);
        assert!(mesh.has_garbage());
        assert_eq!(mesh.face_count(), 0);
        // a lone triangle's edges all bordered the boundary, so they go too
        assert_eq!(mesh.edge_count(), 0);
        for v in [a, b, c] {
            assert!(mesh.is_deleted_vertex(v));
        }
    }

    #[test]
    fn parameters_travel_with_the_mesh() {
        let (mut mesh, _, _) = triangle();
        mesh.parameters_mut().try_add("tol", 1e-6_f64).unwrap();
        let copy = mesh.clone();
        assert_eq!(copy.parameters().get::<f64>("tol"), Some(&1e-6));
    }
}
