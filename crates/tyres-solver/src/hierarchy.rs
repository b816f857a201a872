//! Declared type hierarchy: the structural questions the engine asks about
//! classes without needing any generic context.
//!
//! [`TypeHierarchy`] is the seam between the resolution engine and whatever
//! holds the program's declarations. [`ClassRegistry`] implements it for the
//! in-memory model; other hosts can implement it over their own metadata.
//!
//! The provided methods (`is_assignable`, `erase`, `resolve_type_arguments`)
//! are built on the required accessors, so implementors only describe
//! declarations.

use crate::bindings::BindingMap;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::{ClassRegistry, WellKnownTypes};
use crate::types::{ClassId, RawType, TypeDescriptor, TypeVarId};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Read access to class declarations.
pub trait TypeHierarchy: Send + Sync {
    /// The built-in classes the engine treats specially.
    fn well_known(&self) -> &WellKnownTypes;

    /// Declared type parameters of `class`, in declaration order.
    fn type_params(&self, class: ClassId) -> Vec<TypeVarId>;

    /// Declared upper bounds of a type parameter. Empty means the top type.
    fn type_param_bounds(&self, var: TypeVarId) -> Vec<TypeDescriptor>;

    /// Generic superclass of a raw type. Arrays extend the top type;
    /// interfaces and the top type itself have none.
    fn generic_superclass(&self, raw: &RawType) -> Option<TypeDescriptor>;

    /// Generic interfaces directly implemented by a raw type.
    fn generic_interfaces(&self, raw: &RawType) -> Vec<TypeDescriptor>;

    /// Printable name of a raw type, used in errors and debug output.
    fn raw_type_name(&self, raw: &RawType) -> String;

    /// Whether `class` is declared at all.
    fn contains_class(&self, class: ClassId) -> bool;

    /// Whether a value of raw type `from` can be assigned to `target`.
    ///
    /// Everything is assignable to the top type, arrays are covariant, and a
    /// class is assignable to each class and interface it transitively
    /// extends.
    fn is_assignable(&self, target: &RawType, from: &RawType) -> bool {
        if target == from {
            return true;
        }
        let object = self.well_known().object;
        match (target, from) {
            (RawType::Class(t), _) if *t == object => true,
            (RawType::Array(t), RawType::Array(f)) => self.is_assignable(t, f),
            (RawType::Array(_), RawType::Class(_)) => false,
            (RawType::Class(_), RawType::Array(_)) => false,
            (RawType::Class(t), RawType::Class(f)) => is_subclass(self, *t, *f),
        }
    }

    /// Erase a descriptor to its raw type under `bindings`.
    ///
    /// Bound variables erase to what they are bound to, unbound ones to their
    /// first declared bound and then to the top type. Wildcards erase to
    /// their representative bound.
    fn erase(&self, descriptor: &TypeDescriptor, bindings: &BindingMap) -> RawType {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::RawTypeResolution);
        erase_guarded(self, descriptor, bindings, &mut guard)
    }

    /// Raw type arguments `raw` supplies to the generic class `base`.
    ///
    /// Returns `None` when `base` declares no type parameters, `raw` is not a
    /// subtype of `base`, or none of the arguments can be determined (for
    /// example when `raw` is `base` itself, or reaches it only through a raw
    /// supertype reference). Individual undetermined arguments erase to the
    /// bound of the corresponding parameter.
    fn resolve_type_arguments(&self, raw: &RawType, base: ClassId) -> Option<Vec<RawType>> {
        let params = self.type_params(base);
        if params.is_empty() {
            return None;
        }
        let RawType::Class(start) = raw else {
            return None;
        };
        if *start == base || !self.is_assignable(&RawType::Class(base), raw) {
            return None;
        }

        let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeWalk);
        let found = find_base_arguments(self, *start, base, &BindingMap::new(), &mut guard);
        trace!(
            raw = %self.raw_type_name(raw),
            base = base.0,
            found = found.is_some(),
            "resolve_type_arguments"
        );

        let args = found?;
        if args.iter().all(Option::is_none) {
            return None;
        }
        let empty = BindingMap::new();
        Some(
            args.into_iter()
                .zip(params)
                .map(|(arg, param)| {
                    arg.unwrap_or_else(|| self.erase(&TypeDescriptor::Variable(param), &empty))
                })
                .collect(),
        )
    }
}

/// Class id a supertype reference names, if it names one.
pub(crate) fn declared_class(descriptor: &TypeDescriptor) -> Option<ClassId> {
    match descriptor {
        TypeDescriptor::Nominal(RawType::Class(id)) => Some(*id),
        TypeDescriptor::Parametrized { raw, .. } => Some(*raw),
        TypeDescriptor::SyntheticParametrized { base, .. } => Some(*base),
        _ => None,
    }
}

fn direct_supertypes<H: TypeHierarchy + ?Sized>(hierarchy: &H, class: ClassId) -> Vec<TypeDescriptor> {
    let raw = RawType::Class(class);
    let mut supertypes = Vec::new();
    supertypes.extend(hierarchy.generic_superclass(&raw));
    supertypes.extend(hierarchy.generic_interfaces(&raw));
    supertypes
}

fn is_subclass<H: TypeHierarchy + ?Sized>(hierarchy: &H, target: ClassId, from: ClassId) -> bool {
    let mut visited = FxHashSet::default();
    let mut stack = vec![from];
    while let Some(class) = stack.pop() {
        if class == target {
            return true;
        }
        if !visited.insert(class) {
            continue;
        }
        stack.extend(
            direct_supertypes(hierarchy, class)
                .iter()
                .filter_map(declared_class),
        );
    }
    false
}

fn erase_guarded<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    descriptor: &TypeDescriptor,
    bindings: &BindingMap,
    guard: &mut RecursionGuard<TypeVarId>,
) -> RawType {
    let object = RawType::Class(hierarchy.well_known().object);
    match descriptor {
        TypeDescriptor::Nominal(raw) => raw.clone(),
        TypeDescriptor::Parametrized { raw, .. } => RawType::Class(*raw),
        TypeDescriptor::SyntheticParametrized { base, .. } => RawType::Class(*base),
        TypeDescriptor::Array(element) => {
            RawType::array_of(erase_guarded(hierarchy, element, bindings, guard))
        }
        TypeDescriptor::Wildcard { .. } => match descriptor.representative_bound() {
            Some(bound) => erase_guarded(hierarchy, bound, bindings, guard),
            None => object,
        },
        TypeDescriptor::Variable(var) => {
            if guard.enter(*var) != RecursionResult::Entered {
                trace!(type_var = var.0, "erase: variable cycle, falling back to top type");
                return object;
            }
            let raw = match bindings.flatten(descriptor) {
                TypeDescriptor::Variable(unbound) if !bindings.contains(unbound) => {
                    match hierarchy.type_param_bounds(unbound).first() {
                        Some(bound) => erase_guarded(hierarchy, bound, bindings, guard),
                        None => object,
                    }
                }
                // A binding chain that loops back on itself.
                TypeDescriptor::Variable(_) => object,
                other => erase_guarded(hierarchy, &other, bindings, guard),
            };
            guard.leave(*var);
            raw
        }
    }
}

/// Raw type of one supertype argument, or `None` if it is an unresolved
/// variable or an unbounded wildcard.
fn resolve_argument<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    arg: &TypeDescriptor,
    bindings: &BindingMap,
) -> Option<RawType> {
    match bindings.flatten(arg) {
        TypeDescriptor::Variable(_) => None,
        wildcard @ TypeDescriptor::Wildcard { .. } => wildcard
            .representative_bound()
            .map(|bound| hierarchy.erase(bound, bindings)),
        other => Some(hierarchy.erase(&other, bindings)),
    }
}

/// Depth-first search from `class` for the parametrized reference to `base`,
/// carrying the variable bindings accumulated along the way.
fn find_base_arguments<H: TypeHierarchy + ?Sized>(
    hierarchy: &H,
    class: ClassId,
    base: ClassId,
    bindings: &BindingMap,
    guard: &mut RecursionGuard<ClassId>,
) -> Option<Vec<Option<RawType>>> {
    if guard.enter(class) != RecursionResult::Entered {
        return None;
    }
    let mut result = None;
    for supertype in direct_supertypes(hierarchy, class) {
        let Some(sup) = declared_class(&supertype) else {
            continue;
        };
        if !hierarchy.is_assignable(&RawType::Class(base), &RawType::Class(sup)) {
            continue;
        }
        let TypeDescriptor::Parametrized { args, .. } = &supertype else {
            // A raw reference drops every argument above it.
            continue;
        };
        if sup == base {
            result = Some(
                args.iter()
                    .map(|arg| resolve_argument(hierarchy, arg, bindings))
                    .collect(),
            );
            break;
        }
        let params = hierarchy.type_params(sup);
        let next = bindings.extended(params.into_iter().zip(args.iter().cloned()));
        result = find_base_arguments(hierarchy, sup, base, &next, guard);
        if result.is_some() {
            break;
        }
    }
    guard.leave(class);
    result
}

// =============================================================================
// ClassRegistry
// =============================================================================

impl TypeHierarchy for ClassRegistry {
    fn well_known(&self) -> &WellKnownTypes {
        ClassRegistry::well_known(self)
    }

    fn type_params(&self, class: ClassId) -> Vec<TypeVarId> {
        self.get(class).map(|def| def.type_params).unwrap_or_default()
    }

    fn type_param_bounds(&self, var: TypeVarId) -> Vec<TypeDescriptor> {
        self.type_param_def(var).map(|def| def.bounds).unwrap_or_default()
    }

    fn generic_superclass(&self, raw: &RawType) -> Option<TypeDescriptor> {
        match raw {
            RawType::Class(id) => self.get(*id).and_then(|def| def.superclass),
            RawType::Array(_) => Some(TypeDescriptor::class(ClassRegistry::well_known(self).object)),
        }
    }

    fn generic_interfaces(&self, raw: &RawType) -> Vec<TypeDescriptor> {
        match raw {
            RawType::Class(id) => self.get(*id).map(|def| def.interfaces).unwrap_or_default(),
            RawType::Array(_) => Vec::new(),
        }
    }

    fn raw_type_name(&self, raw: &RawType) -> String {
        ClassRegistry::raw_type_name(self, raw)
    }

    fn contains_class(&self, class: ClassId) -> bool {
        self.contains(class)
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
