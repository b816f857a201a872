//! Declared classes, interfaces and type parameters.
//!
//! The registry is the in-memory model of a program's static type
//! declarations: for every class it records the declared type parameters,
//! the generic superclass and interfaces, and the fields, methods and
//! constructors with their generic signatures.
//!
//! It is the default implementation of all three collaborator interfaces the
//! engine consumes ([`crate::TypeHierarchy`], [`crate::PropertyLookup`] and,
//! through [`crate::TableClassification`], the classification oracle).
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ClassRegistry::new();
//! let repo = registry.declare_interface("Repository");
//! let t = registry.add_type_param(repo, "T", vec![]);
//! let customer_repo = registry.declare_class("CustomerRepository");
//! registry.add_interface(
//!     customer_repo,
//!     TypeDescriptor::parametrized(repo, [TypeDescriptor::class(customer)]),
//! );
//! ```

use crate::types::{ClassId, RawType, TypeDescriptor, TypeVarId};
use bitflags::bitflags;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;
use tyres_common::interner::{Atom, NameTable};

bitflags! {
    /// Declaration modifiers relevant to resolution.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u8 {
        const INTERFACE = 1 << 0;
        const ABSTRACT = 1 << 1;
        const FINAL = 1 << 2;
    }
}

// =============================================================================
// Declarations
// =============================================================================

/// A declared field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Atom,
    pub ty: TypeDescriptor,
}

/// A declared method with its generic signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub owner: ClassId,
    pub name: Atom,
    pub params: Vec<TypeDescriptor>,
    /// `None` for `void` methods.
    pub return_type: Option<TypeDescriptor>,
}

/// A declared constructor with its generic parameter types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorDef {
    pub owner: ClassId,
    pub params: Vec<TypeDescriptor>,
}

/// A declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: Atom,
    pub owner: ClassId,
    /// Declared upper bounds; empty means the universal top type.
    pub bounds: Vec<TypeDescriptor>,
}

/// Everything the engine needs to know about one class or interface.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: Atom,
    pub flags: ClassFlags,
    pub type_params: Vec<TypeVarId>,
    /// Generic superclass; `None` for interfaces and the top type.
    pub superclass: Option<TypeDescriptor>,
    /// Generic interfaces in declaration order.
    pub interfaces: Vec<TypeDescriptor>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub constructors: Vec<ConstructorDef>,
}

impl ClassDef {
    fn new(name: Atom, flags: ClassFlags, superclass: Option<TypeDescriptor>) -> Self {
        Self {
            name,
            flags,
            type_params: Vec::new(),
            superclass,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }
}

// =============================================================================
// WellKnownTypes
// =============================================================================

/// Classes every registry declares up front.
///
/// ```text
/// class Object
/// interface Iterable<T>
/// interface Collection<E> extends Iterable<E>
/// interface List<E> extends Collection<E>
/// interface Set<E> extends Collection<E>
/// interface Map<K, V>
/// final class Optional<T>
/// interface Streamable<T> extends Iterable<T>
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub iterable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub set: ClassId,
    pub map: ClassId,
    pub optional: ClassId,
    pub streamable: ClassId,
}

// =============================================================================
// ClassRegistry
// =============================================================================

/// Thread-safe store of class declarations.
///
/// Uses `DashMap` so declarations can be registered and read from several
/// threads; reads hand out clones and never hold a shard lock across calls.
pub struct ClassRegistry {
    interner: NameTable,
    classes: DashMap<ClassId, ClassDef>,
    type_params: DashMap<TypeVarId, TypeParamDef>,
    by_name: DashMap<Atom, ClassId>,
    next_class: AtomicU32,
    next_type_param: AtomicU32,
    well_known: WellKnownTypes,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry with the [`WellKnownTypes`] declared.
    pub fn new() -> Self {
        let mut registry = Self {
            interner: NameTable::new(),
            classes: DashMap::new(),
            type_params: DashMap::new(),
            by_name: DashMap::new(),
            next_class: AtomicU32::new(ClassId::FIRST_VALID),
            next_type_param: AtomicU32::new(TypeVarId::FIRST_VALID),
            well_known: WellKnownTypes {
                object: ClassId::INVALID,
                iterable: ClassId::INVALID,
                collection: ClassId::INVALID,
                list: ClassId::INVALID,
                set: ClassId::INVALID,
                map: ClassId::INVALID,
                optional: ClassId::INVALID,
                streamable: ClassId::INVALID,
            },
        };
        registry.well_known = registry.declare_well_known();
        registry
    }

    fn declare_well_known(&self) -> WellKnownTypes {
        let object = self.insert_class("Object", ClassFlags::empty(), None);

        let iterable = self.declare_interface("Iterable");
        self.add_type_param(iterable, "T", vec![]);

        let collection = self.declare_sub_interface("Collection", "E", iterable);
        let list = self.declare_sub_interface("List", "E", collection);
        let set = self.declare_sub_interface("Set", "E", collection);

        let map = self.declare_interface("Map");
        self.add_type_param(map, "K", vec![]);
        self.add_type_param(map, "V", vec![]);

        let optional = self.insert_class(
            "Optional",
            ClassFlags::FINAL,
            Some(TypeDescriptor::class(object)),
        );
        self.add_type_param(optional, "T", vec![]);

        let streamable = self.declare_sub_interface("Streamable", "T", iterable);

        WellKnownTypes {
            object,
            iterable,
            collection,
            list,
            set,
            map,
            optional,
            streamable,
        }
    }

    /// `interface Name<P> extends Parent<P>`
    fn declare_sub_interface(&self, name: &str, param: &str, parent: ClassId) -> ClassId {
        let id = self.declare_interface(name);
        let var = self.add_type_param(id, param, vec![]);
        self.add_interface(
            id,
            TypeDescriptor::parametrized(parent, [TypeDescriptor::Variable(var)]),
        );
        id
    }

    fn insert_class(&self, name: &str, flags: ClassFlags, superclass: Option<TypeDescriptor>) -> ClassId {
        let id = ClassId(self.next_class.fetch_add(1, Ordering::SeqCst));
        let name = self.interner.intern(name);
        trace!(class_id = id.0, ?flags, "ClassRegistry::declare");
        self.classes.insert(id, ClassDef::new(name, flags, superclass));
        self.by_name.insert(name, id);
        id
    }

    /// The classes declared by [`ClassRegistry::new`].
    #[inline]
    pub fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    /// The table holding all declared names.
    #[inline]
    pub fn interner(&self) -> &NameTable {
        &self.interner
    }

    // -------------------------------------------------------------------------
    // Declaration
    // -------------------------------------------------------------------------

    /// Declare a class with the given modifiers. Non-interface classes
    /// extend the top type until [`set_superclass`](Self::set_superclass)
    /// says otherwise.
    pub fn declare(&self, name: &str, flags: ClassFlags) -> ClassId {
        let superclass = if flags.contains(ClassFlags::INTERFACE) {
            None
        } else {
            Some(TypeDescriptor::class(self.well_known.object))
        };
        self.insert_class(name, flags, superclass)
    }

    pub fn declare_class(&self, name: &str) -> ClassId {
        self.declare(name, ClassFlags::empty())
    }

    pub fn declare_interface(&self, name: &str) -> ClassId {
        self.declare(name, ClassFlags::INTERFACE)
    }

    /// Append a type parameter to `owner`'s declaration.
    pub fn add_type_param(&self, owner: ClassId, name: &str, bounds: Vec<TypeDescriptor>) -> TypeVarId {
        let var = TypeVarId(self.next_type_param.fetch_add(1, Ordering::SeqCst));
        let def = TypeParamDef {
            name: self.interner.intern(name),
            owner,
            bounds,
        };
        trace!(owner = owner.0, type_var = var.0, "ClassRegistry::add_type_param");
        self.type_params.insert(var, def);
        if let Some(mut class) = self.classes.get_mut(&owner) {
            class.type_params.push(var);
        }
        var
    }

    /// Replace the bounds of a type parameter.
    ///
    /// Needed for self-referential bounds (`T extends Comparable<T>`), where
    /// the bound mentions the parameter being declared.
    pub fn set_type_param_bounds(&self, var: TypeVarId, bounds: Vec<TypeDescriptor>) {
        if let Some(mut def) = self.type_params.get_mut(&var) {
            def.bounds = bounds;
        }
    }

    pub fn set_superclass(&self, id: ClassId, superclass: TypeDescriptor) {
        if let Some(mut class) = self.classes.get_mut(&id) {
            class.superclass = Some(superclass);
        }
    }

    pub fn add_interface(&self, id: ClassId, interface: TypeDescriptor) {
        if let Some(mut class) = self.classes.get_mut(&id) {
            class.interfaces.push(interface);
        }
    }

    pub fn add_field(&self, id: ClassId, name: &str, ty: TypeDescriptor) {
        let name = self.interner.intern(name);
        if let Some(mut class) = self.classes.get_mut(&id) {
            class.fields.push(FieldDef { name, ty });
        }
    }

    /// Declare a method; `return_type` is `None` for `void`.
    pub fn add_method(
        &self,
        id: ClassId,
        name: &str,
        params: Vec<TypeDescriptor>,
        return_type: Option<TypeDescriptor>,
    ) -> MethodDef {
        let method = MethodDef {
            owner: id,
            name: self.interner.intern(name),
            params,
            return_type,
        };
        if let Some(mut class) = self.classes.get_mut(&id) {
            class.methods.push(method.clone());
        }
        method
    }

    pub fn add_constructor(&self, id: ClassId, params: Vec<TypeDescriptor>) -> ConstructorDef {
        let constructor = ConstructorDef { owner: id, params };
        if let Some(mut class) = self.classes.get_mut(&id) {
            class.constructors.push(constructor.clone());
        }
        constructor
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Get a class declaration by id.
    pub fn get(&self, id: ClassId) -> Option<ClassDef> {
        self.classes.get(&id).map(|r| r.clone())
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    /// Find a class by its declared name.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        let atom = self.interner.get(name)?;
        self.by_name.get(&atom).map(|r| *r)
    }

    pub fn class_name(&self, id: ClassId) -> Option<Arc<str>> {
        self.classes
            .get(&id)
            .map(|r| r.name)
            .and_then(|atom| self.interner.try_resolve(atom))
    }

    pub fn type_param_def(&self, var: TypeVarId) -> Option<TypeParamDef> {
        self.type_params.get(&var).map(|r| r.clone())
    }

    pub fn type_param_name(&self, var: TypeVarId) -> Option<Arc<str>> {
        self.type_params
            .get(&var)
            .map(|r| r.name)
            .and_then(|atom| self.interner.try_resolve(atom))
    }

    /// Methods declared directly on `id` with the given name.
    pub fn methods_named(&self, id: ClassId, name: &str) -> Vec<MethodDef> {
        let Some(atom) = self.interner.get(name) else {
            return Vec::new();
        };
        self.classes
            .get(&id)
            .map(|r| r.methods.iter().filter(|m| m.name == atom).cloned().collect())
            .unwrap_or_default()
    }

    pub fn constructors(&self, id: ClassId) -> Vec<ConstructorDef> {
        self.classes
            .get(&id)
            .map(|r| r.constructors.clone())
            .unwrap_or_default()
    }

    /// Human-readable name of a raw type, e.g. `Customer[]`.
    pub fn raw_type_name(&self, raw: &RawType) -> String {
        match raw {
            RawType::Class(id) => self
                .class_name(*id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("<class {}>", id.0)),
            RawType::Array(component) => format!("{}[]", self.raw_type_name(component)),
        }
    }

    /// Number of declared classes, including the well-known ones.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
