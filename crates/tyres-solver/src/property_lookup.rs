//! Declared property types.
//!
//! A property named `name` is, in order of preference:
//! 1. a field called `name` on the class or any superclass,
//! 2. a bean accessor (`getName()`/`isName()` returning a value, otherwise
//!    `setName(value)`) on the class or any superclass,
//! 3. an accessor found the same way on an interface implemented by the
//!    class or a superclass, searched depth-first in declaration order.

use crate::hierarchy::declared_class;
use crate::registry::{ClassDef, ClassRegistry};
use crate::types::{ClassId, RawType, TypeDescriptor};
use rustc_hash::FxHashSet;
use tracing::trace;

/// A property's declared type together with the class that declares it.
///
/// The declaring class matters because the type may mention that class's
/// type parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredProperty {
    pub declaring_class: ClassId,
    pub ty: TypeDescriptor,
}

/// Finds the declared generic type of a named property.
pub trait PropertyLookup: Send + Sync {
    fn property_type(&self, owner: &RawType, name: &str) -> Option<DeclaredProperty>;
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ClassRegistry {
    /// The class followed by its superclass chain.
    fn superclass_chain(&self, start: ClassId) -> Vec<(ClassId, ClassDef)> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            let Some(def) = self.get(id) else {
                break;
            };
            current = def.superclass.as_ref().and_then(declared_class);
            chain.push((id, def));
        }
        chain
    }

    fn find_field(&self, start: ClassId, name: &str) -> Option<DeclaredProperty> {
        let atom = self.interner().get(name)?;
        self.superclass_chain(start).into_iter().find_map(|(id, def)| {
            def.fields
                .into_iter()
                .find(|field| field.name == atom)
                .map(|field| DeclaredProperty {
                    declaring_class: id,
                    ty: field.ty,
                })
        })
    }

    fn find_accessor(&self, start: ClassId, name: &str) -> Option<DeclaredProperty> {
        let capitalized = capitalize(name);
        let chain = self.superclass_chain(start);

        let getters = [format!("get{capitalized}"), format!("is{capitalized}")];
        for (id, def) in &chain {
            for getter in &getters {
                let Some(atom) = self.interner().get(getter) else {
                    continue;
                };
                let found = def.methods.iter().find_map(|method| {
                    if method.name != atom || !method.params.is_empty() {
                        return None;
                    }
                    method.return_type.clone()
                });
                if let Some(ty) = found {
                    return Some(DeclaredProperty {
                        declaring_class: *id,
                        ty,
                    });
                }
            }
        }

        let setter = self.interner().get(&format!("set{capitalized}"))?;
        chain.iter().find_map(|(id, def)| {
            def.methods
                .iter()
                .find(|method| method.name == setter && method.params.len() == 1)
                .map(|method| DeclaredProperty {
                    declaring_class: *id,
                    ty: method.params[0].clone(),
                })
        })
    }

    fn find_in_interfaces(
        &self,
        class: ClassId,
        name: &str,
        visited: &mut FxHashSet<ClassId>,
    ) -> Option<DeclaredProperty> {
        let interfaces = self.get(class)?.interfaces;
        for interface in interfaces.iter().filter_map(declared_class) {
            if !visited.insert(interface) {
                continue;
            }
            if let Some(found) = self.find_accessor(interface, name) {
                return Some(found);
            }
            if let Some(found) = self.find_in_interfaces(interface, name, visited) {
                return Some(found);
            }
        }
        None
    }
}

impl PropertyLookup for ClassRegistry {
    fn property_type(&self, owner: &RawType, name: &str) -> Option<DeclaredProperty> {
        let RawType::Class(class) = owner else {
            return None;
        };
        let found = self
            .find_field(*class, name)
            .or_else(|| self.find_accessor(*class, name))
            .or_else(|| {
                let mut visited = FxHashSet::default();
                self.superclass_chain(*class)
                    .into_iter()
                    .find_map(|(id, _)| self.find_in_interfaces(id, name, &mut visited))
            });
        trace!(
            owner = class.0,
            property = name,
            found = found.is_some(),
            "property_type"
        );
        found
    }
}

#[cfg(test)]
#[path = "../tests/property_lookup_tests.rs"]
mod tests;
