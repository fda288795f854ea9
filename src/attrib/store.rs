//! Runtime-typed attribute columns over one shared element count.
//!
//! An [`AttrStore`] owns a set of named columns, one `Vec<T>` per column,
//! all kept at the same length. Columns are created and looked up by name
//! at runtime; element access goes through a typed [`Attr`] key so the
//! per-element hot path is a plain slice index with no hashing or downcast.
//!
//! Removing a column tombstones its slot instead of shifting later slots,
//! so outstanding keys for other columns stay valid for the lifetime of the
//! store.

use crate::mesh_error::MeshHedgeError;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// Values storable in an attribute column.
///
/// Blanket-implemented; the bound exists so signatures stay readable.
pub trait AttrValue: Clone + 'static {}
impl<T: Clone + 'static> AttrValue for T {}

/// Typed key into an [`AttrStore`] column.
///
/// Cheap to copy and valid until the column it names is removed. Keys are
/// only meaningful for the store (and element kind) they were issued by.
pub struct Attr<T> {
    slot: u32,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls: derived ones would require `T: Clone`/`T: Copy`.
impl<T> Clone for Attr<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Attr<T> {}

impl<T> fmt::Debug for Attr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attr#{}<{}>", self.slot, std::any::type_name::<T>())
    }
}

/// Object-safe column interface used for untyped bookkeeping
/// (resize, row swaps, cloning) across heterogeneous columns.
trait AttrColumn: Any {
    fn name(&self) -> &str;
    fn value_type(&self) -> TypeId;
    fn value_type_name(&self) -> &'static str;
    fn reserve(&mut self, additional: usize);
    fn resize(&mut self, len: usize);
    fn free_memory(&mut self);
    fn push_default(&mut self);
    fn swap_rows(&mut self, a: usize, b: usize);
    fn clone_boxed(&self) -> Box<dyn AttrColumn>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn AttrColumn> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

struct TypedColumn<T> {
    name: String,
    default: T,
    data: Vec<T>,
}

impl<T: AttrValue> AttrColumn for TypedColumn<T> {
    fn name(&self) -> &str {
        &self.name
    }
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }
    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }
    fn resize(&mut self, len: usize) {
        self.data.resize(len, self.default.clone());
    }
    fn free_memory(&mut self) {
        self.data.shrink_to_fit();
    }
    fn push_default(&mut self) {
        self.data.push(self.default.clone());
    }
    fn swap_rows(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }
    fn clone_boxed(&self) -> Box<dyn AttrColumn> {
        Box::new(TypedColumn {
            name: self.name.clone(),
            default: self.default.clone(),
            data: self.data.clone(),
        })
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A set of named, runtime-typed columns sharing one element count.
///
/// One store exists per element kind of a mesh (vertices, halfedges, edges,
/// faces). Cloning a store deep-clones every column.
#[derive(Clone, Default)]
pub struct AttrStore {
    columns: Vec<Option<Box<dyn AttrColumn>>>,
    size: usize,
}

impl AttrStore {
    /// Creates an empty store with no columns and zero elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements (rows) in every column.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the store holds zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Adds a new column named `name` with per-element default `default`.
    ///
    /// The column is filled with `default` up to the current element count.
    ///
    /// # Errors
    ///
    /// [`MeshHedgeError::DuplicateAttribute`] if a live column already uses
    /// `name`, regardless of its value type.
    pub fn try_add<T: AttrValue>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<Attr<T>, MeshHedgeError> {
        if self.find_slot(name).is_some() {
            return Err(MeshHedgeError::DuplicateAttribute {
                name: name.to_string(),
            });
        }
        Ok(self.add_unchecked(name, default))
    }

    /// Adds a column without the duplicate-name check.
    ///
    /// Used for the built-in columns created while the store is empty.
    pub(crate) fn add_unchecked<T: AttrValue>(&mut self, name: &str, default: T) -> Attr<T> {
        debug_assert!(self.find_slot(name).is_none(), "duplicate attribute name");
        let column = TypedColumn {
            name: name.to_string(),
            default: default.clone(),
            data: vec![default; self.size],
        };
        let slot = self.columns.len() as u32;
        self.columns.push(Some(Box::new(column)));
        Attr {
            slot,
            _marker: PhantomData,
        }
    }

    /// Looks up a column by name, returning `None` when the name is missing
    /// or the stored type differs from `T`.
    pub fn get<T: AttrValue>(&self, name: &str) -> Option<Attr<T>> {
        self.try_get(name).ok()
    }

    /// Looks up a column by name.
    ///
    /// # Errors
    ///
    /// [`MeshHedgeError::AttributeNotFound`] when no live column uses `name`;
    /// [`MeshHedgeError::AttributeTypeMismatch`] when the column stores a
    /// different type.
    pub fn try_get<T: AttrValue>(&self, name: &str) -> Result<Attr<T>, MeshHedgeError> {
        let slot = self
            .find_slot(name)
            .ok_or_else(|| MeshHedgeError::AttributeNotFound {
                name: name.to_string(),
            })?;
        let column = self.column(slot);
        if column.value_type() != TypeId::of::<T>() {
            return Err(MeshHedgeError::AttributeTypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
                found: column.value_type_name(),
            });
        }
        Ok(Attr {
            slot: slot as u32,
            _marker: PhantomData,
        })
    }

    /// Looks up a column by name, creating it when missing.
    ///
    /// # Errors
    ///
    /// [`MeshHedgeError::AttributeTypeMismatch`] when a column with `name`
    /// exists but stores a different type.
    pub fn try_get_or_add<T: AttrValue>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<Attr<T>, MeshHedgeError> {
        match self.try_get::<T>(name) {
            Ok(attr) => Ok(attr),
            Err(MeshHedgeError::AttributeNotFound { .. }) => Ok(self.add_unchecked(name, default)),
            Err(e) => Err(e),
        }
    }

    /// Removes the column behind `attr`, tombstoning its slot.
    ///
    /// Keys for other columns remain valid; further use of `attr` itself is
    /// a caller bug and panics.
    pub fn remove<T: AttrValue>(&mut self, attr: Attr<T>) {
        let slot = attr.slot as usize;
        debug_assert!(
            self.columns.get(slot).is_some_and(Option::is_some),
            "attribute already removed"
        );
        if let Some(entry) = self.columns.get_mut(slot) {
            *entry = None;
        }
    }

    /// Whether a live column named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find_slot(name).is_some()
    }

    /// Names of all live columns, in creation order.
    pub fn names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .flatten()
            .map(|c| c.name())
            .collect()
    }

    /// Read-only view of the column behind `attr`.
    ///
    /// # Panics
    ///
    /// Panics if `attr` names a removed column or a column of another store.
    #[inline]
    pub fn data<T: AttrValue>(&self, attr: Attr<T>) -> &[T] {
        let column = self.column(attr.slot as usize);
        let typed = column
            .as_any()
            .downcast_ref::<TypedColumn<T>>()
            .unwrap_or_else(|| panic!("stale or foreign attribute key {attr:?}"));
        &typed.data
    }

    /// Mutable view of the column behind `attr`.
    ///
    /// # Panics
    ///
    /// Panics if `attr` names a removed column or a column of another store.
    #[inline]
    pub fn data_mut<T: AttrValue>(&mut self, attr: Attr<T>) -> &mut [T] {
        let column = self
            .columns
            .get_mut(attr.slot as usize)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("stale attribute key (column removed)"));
        let typed = column
            .as_any_mut()
            .downcast_mut::<TypedColumn<T>>()
            .unwrap_or_else(|| panic!("foreign attribute key (type mismatch)"));
        &mut typed.data
    }

    /// Appends one default-initialised row to every column.
    pub fn push_row(&mut self) {
        for column in self.columns.iter_mut().flatten() {
            column.push_default();
        }
        self.size += 1;
    }

    /// Swaps rows `a` and `b` in every column.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for column in self.columns.iter_mut().flatten() {
            column.swap_rows(a, b);
        }
    }

    /// Resizes every column to `len` rows, default-filling new rows.
    pub fn resize(&mut self, len: usize) {
        for column in self.columns.iter_mut().flatten() {
            column.resize(len);
        }
        self.size = len;
    }

    /// Reserves capacity for `additional` more rows in every column.
    pub fn reserve(&mut self, additional: usize) {
        for column in self.columns.iter_mut().flatten() {
            column.reserve(additional);
        }
    }

    /// Shrinks every column's allocation to its length.
    pub fn free_memory(&mut self) {
        for column in self.columns.iter_mut().flatten() {
            column.free_memory();
        }
    }

    fn find_slot(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.as_deref().is_some_and(|c| c.name() == name))
    }

    #[inline]
    fn column(&self, slot: usize) -> &dyn AttrColumn {
        self.columns
            .get(slot)
            .and_then(Option::as_deref)
            .unwrap_or_else(|| panic!("stale attribute key (column removed)"))
    }
}

impl fmt::Debug for AttrStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrStore")
            .field("size", &self.size)
            .field("columns", &self.names())
            .finish()
    }
}
