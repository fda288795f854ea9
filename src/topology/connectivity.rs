//! Per-element connectivity records of the half-edge structure.
//!
//! These are the payloads of the built-in `v:connectivity`,
//! `h:connectivity` and `f:connectivity` attribute columns. They are plain
//! `Copy` records; all navigation logic lives on
//! [`PolygonMesh`](crate::mesh::PolygonMesh).

use crate::topology::handle::{Face, Halfedge, Vertex};

/// Connectivity stored per vertex: one outgoing halfedge.
///
/// Invariant: for a boundary vertex the stored halfedge is a boundary
/// halfedge, so boundary walks can start without searching.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexConnectivity {
    /// An outgoing halfedge, or invalid if the vertex is isolated.
    pub halfedge: Halfedge,
}

/// Connectivity stored per halfedge.
///
/// The source vertex is not stored; it is `to_vertex(opposite(h))`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HalfedgeConnectivity {
    /// Incident face, or invalid if this halfedge is on the boundary.
    pub face: Face,
    /// Vertex the halfedge points to.
    pub vertex: Vertex,
    /// Next halfedge in ccw order within the face (or along the boundary).
    pub next: Halfedge,
    /// Previous halfedge within the face (or along the boundary).
    pub prev: Halfedge,
}

/// Connectivity stored per face: one halfedge of its loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceConnectivity {
    /// A halfedge whose `face` is this face.
    pub halfedge: Halfedge,
}
