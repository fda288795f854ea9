//! Strong, zero-cost handles for mesh elements.
//!
//! Every element of a polygon mesh (vertex, halfedge, edge, face) is
//! identified by an index into the per-kind attribute arrays. The raw index
//! is wrapped in a distinct newtype per element kind so that, for example, a
//! `Vertex` can never be passed where a `Face` is expected.
//!
//! All handles wrap an `i32` with `-1` reserved as the invalid/sentinel
//! value. `Default` yields the invalid handle. Handles are `Copy`, ordered,
//! hashable and serde-serializable, so they work in maps, sets, and
//! persisted element references.

use std::fmt;

/// Common surface of the four element handles.
///
/// Generic code (attribute slice views, iterators) uses this trait; most
/// callers work with the concrete types directly.
pub trait Handle: Copy + Eq + Ord + std::hash::Hash + fmt::Debug {
    /// Handle for array slot `idx`.
    fn from_index(idx: usize) -> Self;
    /// Array slot of a valid handle.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when called on the invalid handle.
    fn idx(self) -> usize;
    /// Raw signed index (`-1` when invalid).
    fn index(self) -> i32;
    /// The invalid/sentinel handle.
    fn invalid() -> Self;
    /// Whether this handle refers to an array slot.
    fn is_valid(self) -> bool;
}

macro_rules! impl_handle {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a handle for array slot `idx`.
            #[inline]
            pub fn new(idx: usize) -> Self {
                debug_assert!(idx <= i32::MAX as usize, "handle index out of range");
                $name(idx as i32)
            }

            /// The invalid/sentinel handle.
            #[inline]
            pub const fn invalid() -> Self {
                $name(-1)
            }

            /// Array slot of this handle.
            ///
            /// # Panics
            ///
            /// Panics in debug builds when the handle is invalid.
            #[inline]
            pub fn idx(self) -> usize {
                debug_assert!(self.is_valid(), concat!($prefix, " handle is invalid"));
                self.0 as usize
            }

            /// Raw signed index; `-1` when invalid.
            #[inline]
            pub const fn index(self) -> i32 {
                self.0
            }

            /// Whether this handle refers to an array slot.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 >= 0
            }
        }

        impl Handle for $name {
            #[inline]
            fn from_index(idx: usize) -> Self {
                Self::new(idx)
            }
            #[inline]
            fn idx(self) -> usize {
                $name::idx(self)
            }
            #[inline]
            fn index(self) -> i32 {
                $name::index(self)
            }
            #[inline]
            fn invalid() -> Self {
                $name::invalid()
            }
            #[inline]
            fn is_valid(self) -> bool {
                $name::is_valid(self)
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($prefix, "{}"), self.0)
                } else {
                    write!(f, concat!($prefix, "?"))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

impl_handle!(
    /// Handle to a mesh vertex.
    Vertex,
    "v"
);
impl_handle!(
    /// Handle to a directed halfedge.
    ///
    /// Halfedges are allocated in twin pairs: the opposite of halfedge `2i`
    /// is `2i + 1` and both belong to edge `i`.
    Halfedge,
    "h"
);
impl_handle!(
    /// Handle to an undirected edge (a twin pair of halfedges).
    Edge,
    "e"
);
impl_handle!(
    /// Handle to a polygonal face.
    Face,
    "f"
);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_idx() {
        let v = Vertex::new(42);
        assert_eq!(v.idx(), 42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
    }

    #[test]
    fn invalid_and_default() {
        assert!(!Vertex::invalid().is_valid());
        assert_eq!(Halfedge::default(), Halfedge::invalid());
        assert_eq!(Face::invalid().index(), -1);
    }

    #[test]
    fn debug_and_display() {
        assert_eq!(format!("{:?}", Vertex::new(3)), "v3");
        assert_eq!(format!("{}", Halfedge::new(5)), "h5");
        assert_eq!(format!("{}", Edge::new(2)), "e2");
        assert_eq!(format!("{:?}", Face::invalid()), "f?");
    }

    #[test]
    fn ordering_and_hash() {
        let a = Vertex::new(1);
        let b = Vertex::new(2);
        assert!(a < b);
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }
}
