//! Opt-in structural validation.
//!
//! The half-edge kernel maintains a web of cross references (`next`/`prev`
//! chains, canonical outgoing halfedges, face loops) that every traversal
//! relies on. [`DebugInvariants`] is the hook for re-checking that web after
//! a mutation, and [`debug_invariants!`] gates the check so release builds
//! pay nothing unless a feature asks for it.

use crate::mesh_error::MeshHedgeError;

/// Full-structure consistency checking for mesh containers.
pub trait DebugInvariants {
    /// Walks the whole structure and returns the first inconsistency found
    /// as [`MeshHedgeError::InvariantViolation`].
    fn validate_invariants(&self) -> Result<(), MeshHedgeError>;

    /// Panics on the first inconsistency when checking is enabled, no-op
    /// otherwise.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "invariant check");
    }
}

/// Runs a fallible invariant check and panics with context on failure.
///
/// Expands to nothing unless `debug_assertions`, `check-invariants`, or
/// `strict-invariants` is active, so mutating operations can call it
/// unconditionally.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
