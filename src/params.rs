//! Per-mesh parameter registry.
//!
//! A [`ParameterSet`] is an explicit, owned bag of named, typed values that
//! travels with the mesh it belongs to. Algorithms read their tunables from
//! the mesh they operate on instead of from process-wide state, so two
//! meshes in one process can carry different settings.

use crate::mesh_error::MeshHedgeError;
use hashbrown::HashMap;
use std::any::Any;
use std::fmt;

/// Values storable in a [`ParameterSet`].
///
/// Blanket-implemented for every `Clone + 'static` type.
pub trait ParamValue: Any {
    #[doc(hidden)]
    fn clone_boxed(&self) -> Box<dyn ParamValue>;
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Clone> ParamValue for T {
    fn clone_boxed(&self) -> Box<dyn ParamValue> {
        Box::new(self.clone())
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn ParamValue> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

/// Named, typed key-value registry owned by a mesh.
#[derive(Clone, Default)]
pub struct ParameterSet {
    entries: HashMap<String, Box<dyn ParamValue>>,
}

impl ParameterSet {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `name`.
    ///
    /// # Errors
    ///
    /// [`MeshHedgeError::DuplicateParameter`] if `name` is already taken.
    pub fn try_add<T: ParamValue>(&mut self, name: &str, value: T) -> Result<(), MeshHedgeError> {
        if self.entries.contains_key(name) {
            return Err(MeshHedgeError::DuplicateParameter {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), Box::new(value));
        Ok(())
    }

    /// Inserts or replaces the value under `name`.
    pub fn set<T: ParamValue>(&mut self, name: &str, value: T) {
        self.entries.insert(name.to_string(), Box::new(value));
    }

    /// Looks up `name`, returning `None` when missing or of another type.
    pub fn get<T: ParamValue>(&self, name: &str) -> Option<&T> {
        self.entries
            .get(name)
            .and_then(|v| (**v).as_any().downcast_ref::<T>())
    }

    /// Mutable lookup, `None` when missing or of another type.
    pub fn get_mut<T: ParamValue>(&mut self, name: &str) -> Option<&mut T> {
        self.entries
            .get_mut(name)
            .and_then(|v| (**v).as_any_mut().downcast_mut::<T>())
    }

    /// Looks up `name` with distinguishable failures.
    ///
    /// # Errors
    ///
    /// [`MeshHedgeError::ParameterNotFound`] when `name` is missing;
    /// [`MeshHedgeError::ParameterTypeMismatch`] when the stored value has a
    /// different type than `T`.
    pub fn try_get<T: ParamValue>(&self, name: &str) -> Result<&T, MeshHedgeError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| MeshHedgeError::ParameterNotFound {
                name: name.to_string(),
            })?;
        entry
            .as_ref()
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| MeshHedgeError::ParameterTypeMismatch {
                name: name.to_string(),
            })
    }

    /// Removes the value under `name`; `true` if something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Whether a value is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ParameterSet").field("names", &names).finish()
    }
}
