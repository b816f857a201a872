//! Supertype walking, assignability and specialization.
//!
//! ```text
//! interface Repository<T>
//! class CustomerRepository implements Repository<Customer>
//!
//! CustomerRepository.super_type_information(Repository) -> Repository<Customer>
//! Repository<T>.specialize(CustomerRepository)          -> CustomerRepository<Customer>
//! ```

use crate::bindings::BindingMap;
use crate::error::{ResolveError, Result};
use crate::query_trace;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::type_info::{TypeInfo, TypeInfoKind};
use crate::types::{RawType, TypeDescriptor};
use tracing::{debug, trace};

type WalkKey = (TypeDescriptor, BindingMap);

impl TypeInfo {
    /// This type viewed as its ancestor `target`, with the generic arguments
    /// bound along the way.
    ///
    /// Returns `None` when the raw type is not assignable to `target` and
    /// `self` when the raw types are identical. Otherwise the generic
    /// superclass and then each generic interface are searched depth-first,
    /// in declaration order.
    pub fn super_type_information(&self, target: &RawType) -> Result<Option<TypeInfo>> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeWalk);
        self.super_type_walk(target, &mut guard)
    }

    fn super_type_walk(
        &self,
        target: &RawType,
        guard: &mut RecursionGuard<WalkKey>,
    ) -> Result<Option<TypeInfo>> {
        let raw = self.raw_type();
        if !self.hierarchy().is_assignable(target, raw) {
            return Ok(None);
        }
        if raw == target {
            return Ok(Some(self.clone()));
        }
        if let Some(delegate) = self.variable_target()? {
            return delegate.super_type_walk(target, guard);
        }

        let key: WalkKey = (self.descriptor().clone(), self.bindings().clone());
        match guard.enter(key.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return Ok(None),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                let err = ResolveError::RecursionLimit {
                    operation: "supertype walk",
                };
                debug!(%err, target = %self.hierarchy().raw_type_name(target), "super_type_information");
                return Err(err);
            }
        }
        let result = self.walk_candidates(raw, target, guard);
        guard.leave(key);
        result
    }

    fn walk_candidates(
        &self,
        raw: &RawType,
        target: &RawType,
        guard: &mut RecursionGuard<WalkKey>,
    ) -> Result<Option<TypeInfo>> {
        let hierarchy = self.hierarchy();
        let candidates = hierarchy
            .generic_superclass(raw)
            .into_iter()
            .chain(hierarchy.generic_interfaces(raw));

        for candidate in candidates {
            let info = self.create_info(&candidate)?;
            trace!(
                candidate = %hierarchy.raw_type_name(info.raw_type()),
                target = %hierarchy.raw_type_name(target),
                "supertype candidate"
            );
            if info.raw_type() == target {
                return Ok(Some(info));
            }
            if let Some(found) = info.super_type_walk(target, guard)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Whether a value of type `other` can be assigned to this type.
    ///
    /// Class nodes compare raw types. Generic nodes additionally require
    /// `other`'s view of this raw type to carry exactly this node's resolved
    /// type arguments.
    pub fn is_assignable_from(&self, other: &TypeInfo) -> Result<bool> {
        let query_id = query_trace::begin();
        if let Some(id) = query_id {
            query_trace::relation_start(id, "is_assignable_from", other.hash_value(), self.hash_value());
        }

        let result = self.check_assignable_from(other);
        if let Some(id) = query_id {
            query_trace::relation_end(id, "is_assignable_from", matches!(result, Ok(true)));
        }
        result
    }

    fn check_assignable_from(&self, other: &TypeInfo) -> Result<bool> {
        if self == other {
            return Ok(true);
        }
        if self.kind() == TypeInfoKind::Class {
            return Ok(self.hierarchy().is_assignable(self.raw_type(), other.raw_type()));
        }
        let Some(view) = other.super_type_information(self.raw_type())? else {
            return Ok(false);
        };
        Ok(view == *self || view.resolved_descriptor() == self.resolved_descriptor())
    }

    /// Re-parametrize the subtype `concrete` with this type's arguments.
    ///
    /// Fails with `InvalidArgument` unless this raw type is assignable from
    /// `concrete`'s. Without type arguments to carry, `concrete` is returned
    /// unchanged. Arguments this node leaves unresolved are taken from
    /// `concrete`'s own view of this type.
    pub fn specialize(&self, concrete: &TypeInfo) -> Result<TypeInfo> {
        let hierarchy = self.hierarchy();
        if !hierarchy.is_assignable(self.raw_type(), concrete.raw_type()) {
            let err = ResolveError::invalid_argument(format!(
                "{} must be assignable from {}",
                hierarchy.raw_type_name(self.raw_type()),
                hierarchy.raw_type_name(concrete.raw_type()),
            ));
            debug!(%err, "specialize");
            return Err(err);
        }

        let arguments = self.type_arguments()?;
        if arguments.is_empty() {
            return Ok(concrete.clone());
        }
        let RawType::Class(base) = concrete.raw_type() else {
            return Ok(concrete.clone());
        };

        let concrete_view = match concrete.super_type_information(self.raw_type())? {
            Some(view) if view.kind() == TypeInfoKind::Parametrized => view.type_arguments()?,
            _ => Default::default(),
        };
        let arguments = arguments.into_iter().enumerate().map(|(index, argument)| {
            let unresolved = matches!(argument.resolved_descriptor(), TypeDescriptor::Variable(_));
            match concrete_view.get(index) {
                Some(bound) if unresolved => bound.clone(),
                _ => argument,
            }
        });

        trace!(base = base.0, "specialize");
        concrete.create_info(&TypeDescriptor::synthetic(*base, arguments))
    }
}

#[cfg(test)]
#[path = "../tests/supertype_tests.rs"]
mod tests;
