//! Name table for class, member and type-parameter names.
//!
//! The registry stores every declared name as an [`Atom`] and compares
//! atoms instead of strings when it matches members. Queries go through
//! [`NameTable::get`], which never adds an entry, so asking for a property
//! nobody declared leaves the table unchanged.

use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Handle to a name stored in a [`NameTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

#[derive(Default)]
struct Names {
    atoms: FxHashMap<Arc<str>, Atom>,
    text: Vec<Arc<str>>,
}

/// Append-only name table shared by registry readers and writers.
#[derive(Default)]
pub struct NameTable {
    names: RwLock<Names>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The atom for `name`, adding it on first use.
    pub fn intern(&self, name: &str) -> Atom {
        if let Some(atom) = self.get(name) {
            return atom;
        }
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have added it between the read and the write.
        if let Some(&atom) = names.atoms.get(name) {
            return atom;
        }
        let atom = Atom(names.text.len() as u32);
        let text: Arc<str> = Arc::from(name);
        names.text.push(text.clone());
        names.atoms.insert(text, atom);
        atom
    }

    /// The atom for `name` if it was ever declared.
    pub fn get(&self, name: &str) -> Option<Atom> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        names.atoms.get(name).copied()
    }

    /// The declared text behind `atom`.
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        names.text.get(atom.0 as usize).cloned()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
