//! MeshHedgeError: Unified error type for mesh-hedge public APIs
//!
//! This error type is used throughout the mesh-hedge library to provide robust,
//! non-panicking error handling for all public APIs.

use crate::topology::handle::Vertex;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for mesh-hedge operations.
///
/// The enum intentionally does not implement `Clone`/`PartialEq`: the
/// [`MeshHedgeError::FileOpen`] variant carries the underlying
/// [`std::io::Error`]. Tests match on variants with `matches!`.
#[derive(Debug, Error)]
pub enum MeshHedgeError {
    /// An attribute with the same name already exists on the element kind.
    #[error("attribute `{name}` already exists")]
    DuplicateAttribute {
        /// Name that collided.
        name: String,
    },
    /// No attribute with the given name exists on the element kind.
    #[error("attribute `{name}` not found")]
    AttributeNotFound {
        /// Name that was looked up.
        name: String,
    },
    /// An attribute with the given name exists but stores a different type.
    #[error("attribute `{name}` stores {found}, requested {expected}")]
    AttributeTypeMismatch {
        /// Name that was looked up.
        name: String,
        /// Type the caller requested.
        expected: &'static str,
        /// Type the column actually stores.
        found: &'static str,
    },
    /// A face corner is an interior vertex and cannot take another face.
    #[error("vertex {0} is not on the boundary (complex vertex)")]
    NonManifoldVertex(Vertex),
    /// An existing edge along the new face loop is already bounded by two faces.
    #[error("edge {from}->{to} is already bounded by two faces (complex edge)")]
    NonManifoldEdge {
        /// Source corner of the offending edge.
        from: Vertex,
        /// Target corner of the offending edge.
        to: Vertex,
    },
    /// No free boundary gap could be found while splicing a face into a fan.
    #[error("patch re-linking failed around vertex {0}: no free boundary gap")]
    PatchRelinkFailed(Vertex),
    /// Fewer than three corners were passed to a face-insertion call.
    #[error("a face needs at least 3 vertices, got {n}")]
    FaceTooSmall {
        /// Number of corners supplied.
        n: usize,
    },
    /// A mesh file could not be opened or created.
    #[error("failed to open `{path}`")]
    FileOpen {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing an open mesh file failed midway.
    #[error("i/o failure on `{path}`")]
    FileIo {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file extension does not map to a known codec.
    #[error("unsupported mesh file extension `{0}`")]
    UnsupportedExtension(String),
    /// A parameter with the same name is already registered.
    #[error("parameter `{name}` already exists")]
    DuplicateParameter {
        /// Name that collided.
        name: String,
    },
    /// No parameter with the given name is registered.
    #[error("parameter `{name}` not found")]
    ParameterNotFound {
        /// Name that was looked up.
        name: String,
    },
    /// A parameter with the given name exists but stores a different type.
    #[error("parameter `{name}` stores a different type than requested")]
    ParameterTypeMismatch {
        /// Name that was looked up.
        name: String,
    },
    /// A structural invariant check failed.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
