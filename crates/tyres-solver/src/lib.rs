//! Lazy Generic Type Resolution
//!
//! Given a type expression from a program's static declarations, this crate
//! computes on demand what it resolves to: the erased raw type, the element
//! type of arrays and collections, the value type of maps, the type of any
//! (dotted) property path, and the view of the type as one of its ancestors,
//! with generic parameters substituted at every step.
//!
//! - **`TypeInfo`**: memoizing node over a descriptor and a binding map
//! - **`TypeResolver`**: builds root nodes over the collaborator traits
//! - **`ClassRegistry`**: in-memory declarations implementing
//!   `TypeHierarchy` and `PropertyLookup`
//!
//! Key properties:
//! - Every query is a pure function of the node, so nodes can be shared
//!   across threads without coordination
//! - Self-referential generics terminate through the "same descriptor is the
//!   same node" rule and recursion guards
mod bindings;
mod classification;
mod error;
mod hierarchy;
mod property_lookup;
mod property_path;
mod query_trace;
pub mod recursion;
mod registry;
mod resolver;
mod supertype;
mod type_info;
pub mod types;

#[cfg(test)]
mod test_fixtures;

pub use bindings::BindingMap;
pub use classification::{ClassificationOracle, TableClassification};
pub use error::{ResolveError, Result};
pub use hierarchy::TypeHierarchy;
pub use property_lookup::{DeclaredProperty, PropertyLookup};
pub use registry::{
    ClassDef, ClassFlags, ClassRegistry, ConstructorDef, FieldDef, MethodDef, TypeParamDef,
    WellKnownTypes,
};
pub use resolver::TypeResolver;
pub use type_info::{TypeArguments, TypeInfo, TypeInfoKind};
pub use types::{ClassId, RawType, TypeDescriptor, TypeVarId};

#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;
