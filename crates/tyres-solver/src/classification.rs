//! Classification of raw types into maps, collections and nullable wrappers.
//!
//! The engine never hard-codes which classes count as a map or a collection;
//! it asks a [`ClassificationOracle`]. [`TableClassification`] answers from
//! registered class tables, matching map and collection types by
//! assignability and wrapper types exactly.

use crate::hierarchy::TypeHierarchy;
use crate::types::{ClassId, RawType};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;

type ClassTable = IndexSet<ClassId, FxBuildHasher>;

/// Answers "what kind of container is this raw type?".
pub trait ClassificationOracle: Send + Sync {
    /// Whether `raw` is a key/value container.
    fn is_map_like(&self, raw: &RawType) -> bool;

    /// Whether `raw` is an element container beyond what the engine already
    /// recognizes structurally (arrays, iterables, streamables).
    fn is_collection_like(&self, raw: &RawType) -> bool;

    /// Whether `raw` is a transparent single-value wrapper such as `Optional`.
    fn is_nullable_wrapper(&self, raw: &RawType) -> bool;

    /// The generic map class of `raw` whose first two type arguments are the
    /// key and value types.
    fn map_base_type(&self, raw: &RawType) -> ClassId;
}

/// Table-driven [`ClassificationOracle`].
///
/// Starts out knowing `Map`, `Collection` and `Optional` from the
/// hierarchy's well-known types; further classes can be registered.
pub struct TableClassification {
    hierarchy: Arc<dyn TypeHierarchy>,
    map_types: ClassTable,
    collection_types: ClassTable,
    wrapper_types: ClassTable,
    map_base: ClassId,
}

impl TableClassification {
    pub fn new(hierarchy: Arc<dyn TypeHierarchy>) -> Self {
        let well_known = *hierarchy.well_known();
        let mut map_types = ClassTable::default();
        map_types.insert(well_known.map);
        let mut collection_types = ClassTable::default();
        collection_types.insert(well_known.collection);
        let mut wrapper_types = ClassTable::default();
        wrapper_types.insert(well_known.optional);

        Self {
            hierarchy,
            map_types,
            collection_types,
            wrapper_types,
            map_base: well_known.map,
        }
    }

    /// Treat `class` and its subtypes as maps.
    pub fn with_map_type(mut self, class: ClassId) -> Self {
        self.map_types.insert(class);
        self
    }

    /// Treat `class` and its subtypes as collections.
    pub fn with_collection_type(mut self, class: ClassId) -> Self {
        self.collection_types.insert(class);
        self
    }

    /// Treat exactly `class` as a nullable wrapper.
    pub fn with_wrapper_type(mut self, class: ClassId) -> Self {
        self.wrapper_types.insert(class);
        self
    }

    fn any_assignable(&self, table: &ClassTable, raw: &RawType) -> bool {
        table
            .iter()
            .any(|class| self.hierarchy.is_assignable(&RawType::Class(*class), raw))
    }
}

impl ClassificationOracle for TableClassification {
    fn is_map_like(&self, raw: &RawType) -> bool {
        self.any_assignable(&self.map_types, raw)
    }

    fn is_collection_like(&self, raw: &RawType) -> bool {
        self.any_assignable(&self.collection_types, raw)
    }

    fn is_nullable_wrapper(&self, raw: &RawType) -> bool {
        raw.class_id()
            .is_some_and(|class| self.wrapper_types.contains(&class))
    }

    /// The first registered map type `raw` is assignable to, falling back to
    /// the well-known `Map`.
    fn map_base_type(&self, raw: &RawType) -> ClassId {
        self.map_types
            .iter()
            .copied()
            .find(|class| self.hierarchy.is_assignable(&RawType::Class(*class), raw))
            .unwrap_or(self.map_base)
    }
}

#[cfg(test)]
#[path = "../tests/classification_tests.rs"]
mod tests;
