//! Geometry utilities for mesh-hedge.
//!
//! This module provides normal computation and basic measures on top of the
//! connectivity kernel.

pub mod normals;

pub use normals::{
    compute_face_normal, compute_vertex_normal, edge_length, update_face_normals,
    update_vertex_normals,
};
