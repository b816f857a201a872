//! Identifiers, raw types and type descriptors.
//!
//! A [`TypeDescriptor`] is a type expression as it was written in a
//! declaration: `Map<String, List<T>>`, `T[]`, `? super Number`. A
//! [`RawType`] is what such an expression erases to at runtime. Both are
//! immutable values; cloning a descriptor only bumps reference counts.

use crate::type_info::TypeInfo;
use std::sync::Arc;

// =============================================================================
// Identifiers
// =============================================================================

/// Registry-allocated identity of a declared class or interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Sentinel value for invalid `ClassId`.
    pub const INVALID: Self = Self(0);

    /// First valid `ClassId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `ClassId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Identity of a declared type parameter.
///
/// Unique per declaring owner and name; two classes declaring a parameter
/// called `T` get different ids. This is the key of a [`crate::BindingMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub u32);

impl TypeVarId {
    /// Sentinel value for invalid `TypeVarId`.
    pub const INVALID: Self = Self(0);

    /// First valid `TypeVarId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `TypeVarId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// RawType
// =============================================================================

/// The erased, non-generic runtime type of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawType {
    /// A declared class or interface.
    Class(ClassId),
    /// An array of the given component type.
    Array(Arc<RawType>),
}

impl RawType {
    pub fn array_of(component: RawType) -> Self {
        Self::Array(Arc::new(component))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Component type of an array raw type.
    pub fn component(&self) -> Option<&RawType> {
        match self {
            Self::Array(component) => Some(component),
            Self::Class(_) => None,
        }
    }

    /// The class id, if this is not an array.
    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(*id),
            Self::Array(_) => None,
        }
    }
}

impl From<ClassId> for RawType {
    fn from(id: ClassId) -> Self {
        Self::Class(id)
    }
}

// =============================================================================
// TypeDescriptor
// =============================================================================

/// A type expression taken from a static declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A concrete, non-generic type reference (including `String[]`).
    Nominal(RawType),

    /// A generic instantiation such as `List<String>`.
    Parametrized {
        raw: ClassId,
        args: Arc<[TypeDescriptor]>,
    },

    /// An unbound generic parameter.
    Variable(TypeVarId),

    /// A generic array expression such as `T[]` or `List<T>[]`.
    Array(Arc<TypeDescriptor>),

    /// A bounded or unbounded wildcard.
    ///
    /// Only the first lower bound, else the first upper bound, is meaningful.
    Wildcard {
        lower: Arc<[TypeDescriptor]>,
        upper: Arc<[TypeDescriptor]>,
    },

    /// A concrete type re-parametrized with arguments taken from an abstract
    /// type. Only built by specialization.
    SyntheticParametrized {
        base: ClassId,
        args: Arc<[TypeInfo]>,
    },
}

impl TypeDescriptor {
    pub fn nominal(raw: impl Into<RawType>) -> Self {
        Self::Nominal(raw.into())
    }

    /// Shorthand for a nominal reference to a declared class.
    pub fn class(id: ClassId) -> Self {
        Self::Nominal(RawType::Class(id))
    }

    pub fn parametrized(raw: ClassId, args: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::Parametrized {
            raw,
            args: args.into_iter().collect(),
        }
    }

    pub fn variable(var: TypeVarId) -> Self {
        Self::Variable(var)
    }

    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Arc::new(element))
    }

    pub fn wildcard(
        lower: impl IntoIterator<Item = TypeDescriptor>,
        upper: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self::Wildcard {
            lower: lower.into_iter().collect(),
            upper: upper.into_iter().collect(),
        }
    }

    /// `? extends upper`
    pub fn wildcard_extends(upper: TypeDescriptor) -> Self {
        Self::wildcard([], [upper])
    }

    /// `? super lower`
    pub fn wildcard_super(lower: TypeDescriptor) -> Self {
        Self::wildcard([lower], [])
    }

    /// A wildcard with no bound at all.
    pub fn unbounded_wildcard() -> Self {
        Self::wildcard([], [])
    }

    pub(crate) fn synthetic(base: ClassId, args: impl IntoIterator<Item = TypeInfo>) -> Self {
        Self::SyntheticParametrized {
            base,
            args: args.into_iter().collect(),
        }
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// The bound a wildcard stands for: the first lower bound if present,
    /// otherwise the first upper bound. `None` for non-wildcards and for
    /// wildcards without any bound.
    pub fn representative_bound(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Wildcard { lower, upper } => lower.first().or_else(|| upper.first()),
            _ => None,
        }
    }
}

impl From<ClassId> for TypeDescriptor {
    fn from(id: ClassId) -> Self {
        Self::class(id)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
