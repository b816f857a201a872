//! Binding maps: type variable identity to the descriptor bound to it.
//!
//! A binding map is threaded top-down through resolution so that a variable
//! met deep inside a declaration resolves to the argument supplied at the
//! root. Maps are persistent: extending one always yields a new map and
//! never mutates a map another node already holds.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{TypeDescriptor, TypeVarId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable mapping from [`TypeVarId`] to [`TypeDescriptor`].
///
/// Backed by a shared `BTreeMap` so iteration order and hashing are
/// deterministic and cloning is a reference-count bump.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BindingMap {
    entries: Arc<BTreeMap<TypeVarId, TypeDescriptor>>,
}

impl BindingMap {
    /// The empty map.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The descriptor bound directly to `var`, without following chains.
    #[inline]
    pub fn get(&self, var: TypeVarId) -> Option<&TypeDescriptor> {
        self.entries.get(&var)
    }

    #[inline]
    pub fn contains(&self, var: TypeVarId) -> bool {
        self.entries.contains_key(&var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &TypeDescriptor)> {
        self.entries.iter().map(|(var, desc)| (*var, desc))
    }

    /// A new map with `var` bound to `descriptor`.
    pub fn with(&self, var: TypeVarId, descriptor: TypeDescriptor) -> Self {
        self.extended(std::iter::once((var, descriptor)))
    }

    /// A new map with all `bindings` added; later entries win.
    pub fn extended(&self, bindings: impl IntoIterator<Item = (TypeVarId, TypeDescriptor)>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.extend(bindings);
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Follow variable-to-variable links until reaching a descriptor that is
    /// not a bound variable.
    ///
    /// Non-variable descriptors are returned unchanged. A chain that loops
    /// back on itself stops at the variable where the loop was detected.
    pub fn flatten(&self, source: &TypeDescriptor) -> TypeDescriptor {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::BindingChain);
        let mut current = source;
        let mut entered = Vec::new();

        while let TypeDescriptor::Variable(var) = current {
            let Some(value) = self.entries.get(var) else {
                break;
            };
            match guard.enter(*var) {
                RecursionResult::Entered => entered.push(*var),
                _ => break,
            }
            current = value;
        }

        for var in entered.into_iter().rev() {
            guard.leave(var);
        }
        current.clone()
    }

    /// The descriptor `var` ultimately resolves to, or `None` when `var` has
    /// no binding in this map.
    pub fn lookup(&self, var: TypeVarId) -> Option<TypeDescriptor> {
        if !self.contains(var) {
            return None;
        }
        Some(self.flatten(&TypeDescriptor::Variable(var)))
    }
}

impl FromIterator<(TypeVarId, TypeDescriptor)> for BindingMap {
    fn from_iter<I: IntoIterator<Item = (TypeVarId, TypeDescriptor)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/bindings_tests.rs"]
mod tests;
