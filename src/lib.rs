#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-hedge
//!
//! mesh-hedge is a modular, high-performance Rust library for indexed
//! half-edge polygon meshes, designed for geometry processing codes. It
//! stores connectivity in struct-of-arrays attribute columns, keeps twin
//! halfedges in adjacent index pairs, and defers element removal to an
//! explicit garbage-collection pass so handles stay stable while you edit.
//!
//! ## Features
//! - [`PolygonMesh`](mesh::PolygonMesh), an indexed half-edge kernel with
//!   manifold-preserving face insertion and deferred deletion
//! - Named, runtime-typed attribute columns on every element kind, with
//!   typed handle-indexed views
//! - Linear iterators and one-lap circulators for vertices, halfedges,
//!   edges and faces
//! - Face and vertex normals, edge measures
//! - Wavefront OBJ reading and writing
//! - A per-mesh [`ParameterSet`](params::ParameterSet) so algorithm
//!   tunables travel with the mesh instead of living in process globals
//!
//! ## Usage
//! Add `mesh-hedge` as a dependency in your `Cargo.toml` and enable
//! features as needed:
//!
//! ```toml
//! [dependencies]
//! mesh-hedge = "0.3"
//! # Optional features:
//! # features = ["check-invariants","strict-invariants"]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mesh_hedge::prelude::*;
//!
//! let mut mesh = PolygonMesh::new();
//! let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
//! let f = mesh.add_triangle(a, b, c)?;
//!
//! for v in mesh.vertices_of_face(f) {
//!     assert!(mesh.is_boundary_vertex(v));
//! }
//! # Ok::<(), mesh_hedge::mesh_error::MeshHedgeError>(())
//! ```

// Re-export our major subsystems:
pub mod attrib;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod mesh_error;
pub mod params;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// Scalar type used for all geometric quantities.
pub type Scalar = f64;

/// 3D vector of [`Scalar`], used for positions, normals and texcoords.
pub type Vec3 = nalgebra::Vector3<Scalar>;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::attrib::{EdgeAttr, FaceAttr, HalfedgeAttr, VertexAttr};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{
        compute_face_normal, compute_vertex_normal, edge_length, update_face_normals,
        update_vertex_normals,
    };
    pub use crate::io::{read_mesh, write_mesh};
    pub use crate::mesh::PolygonMesh;
    pub use crate::mesh_error::MeshHedgeError;
    pub use crate::params::ParameterSet;
    pub use crate::topology::handle::{Edge, Face, Halfedge, Handle, Vertex};
    pub use crate::{Scalar, Vec3};
}
