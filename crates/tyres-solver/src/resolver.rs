//! Entry point: turns descriptors into [`TypeInfo`] nodes.

use crate::bindings::BindingMap;
use crate::classification::{ClassificationOracle, TableClassification};
use crate::error::{ResolveError, Result};
use crate::hierarchy::TypeHierarchy;
use crate::property_lookup::PropertyLookup;
use crate::registry::ClassRegistry;
use crate::type_info::{Environment, TypeInfo, TypeInfoKind};
use crate::types::{ClassId, RawType, TypeDescriptor};
use std::sync::Arc;
use tracing::debug;

/// Builds root nodes over a fixed set of collaborators.
///
/// Cloning a resolver shares its collaborators; nodes from any clone can be
/// compared with each other.
#[derive(Clone)]
pub struct TypeResolver {
    env: Arc<Environment>,
}

impl TypeResolver {
    pub fn new(
        hierarchy: Arc<dyn TypeHierarchy>,
        oracle: Arc<dyn ClassificationOracle>,
        properties: Arc<dyn PropertyLookup>,
    ) -> Self {
        Self {
            env: Arc::new(Environment {
                hierarchy,
                oracle,
                properties,
            }),
        }
    }

    /// A resolver answering every question from `registry`, with the default
    /// [`TableClassification`].
    pub fn for_registry(registry: Arc<ClassRegistry>) -> Self {
        let oracle = TableClassification::new(registry.clone());
        Self::new(registry.clone(), Arc::new(oracle), registry)
    }

    /// Like [`for_registry`](Self::for_registry) with a custom oracle.
    pub fn with_oracle(registry: Arc<ClassRegistry>, oracle: Arc<dyn ClassificationOracle>) -> Self {
        Self::new(registry.clone(), oracle, registry)
    }

    pub fn hierarchy(&self) -> &dyn TypeHierarchy {
        &*self.env.hierarchy
    }

    /// Resolve `descriptor` in the context of `bindings`.
    ///
    /// Fails with `InvalidArgument` for a descriptor naming an undeclared
    /// class or an invalid type variable, and with `UnsupportedType` for a
    /// wildcard without bounds.
    pub fn resolve(&self, descriptor: &TypeDescriptor, bindings: &BindingMap) -> Result<TypeInfo> {
        self.validate(descriptor)?;
        TypeInfo::promote(descriptor, bindings, &self.env)
    }

    /// The class node for a declared class.
    pub fn resolve_class(&self, class: ClassId) -> Result<TypeInfo> {
        self.resolve(&TypeDescriptor::class(class), &BindingMap::new())
    }

    /// The class node of the universal top type.
    pub fn object(&self) -> TypeInfo {
        let object = self.env.hierarchy.well_known().object;
        TypeInfo::new(
            TypeInfoKind::Class,
            TypeDescriptor::class(object),
            BindingMap::new(),
            Arc::clone(&self.env),
        )
    }

    fn validate(&self, descriptor: &TypeDescriptor) -> Result<()> {
        let hierarchy = &self.env.hierarchy;
        let problem = match descriptor {
            TypeDescriptor::Nominal(raw) => {
                let mut element = raw;
                while let RawType::Array(component) = element {
                    element = component;
                }
                match element {
                    RawType::Class(class) if !hierarchy.contains_class(*class) => {
                        Some(format!("undeclared class {}", class.0))
                    }
                    _ => None,
                }
            }
            TypeDescriptor::Parametrized { raw, .. } if !hierarchy.contains_class(*raw) => {
                Some(format!("undeclared class {}", raw.0))
            }
            TypeDescriptor::Variable(var) if !var.is_valid() => Some("invalid type variable".to_string()),
            _ => None,
        };
        match problem {
            Some(message) => {
                let err = ResolveError::invalid_argument(message);
                debug!(%err, "resolve");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
