//! Centralized limits and thresholds for the type-resolution engine.
//!
//! Every recursive walk in the solver is bounded by one of these values. They
//! are only reached by malformed or adversarial declaration graphs; well-formed
//! hierarchies terminate long before any limit applies.
//!
//! The solver groups them into named presets in
//! `tyres_solver::recursion::RecursionProfile`, which is what call sites use.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum length of a variable-to-variable chain followed inside a binding map.
///
/// Binding maps are flattened when a parametrized node is built, so chains are
/// normally one or two links long.
///
/// # Example
///
/// ```text
/// class Outer<A> { Inner<A> inner; }
/// class Inner<B> { Leaf<B> leaf; }
/// class Leaf<C>  { C value; }
/// // Outer<String>.inner.leaf.value walks C -> B -> A -> String
/// ```
pub const MAX_BINDING_CHAIN_DEPTH: u32 = 64;

/// Maximum nesting depth when erasing a descriptor to its raw type.
///
/// Bounds the walk through array elements and declared type-variable bounds.
///
/// # Example
///
/// ```text
/// class Node<T extends Node<T>> { ... }
/// // erasing T follows the bound Node<T> once and stops at Node
/// ```
pub const MAX_RAW_RESOLUTION_DEPTH: u32 = 64;

/// Maximum depth of the superclass/interface search.
///
/// Deep framework hierarchies rarely exceed a dozen levels; this limit only
/// protects against cyclic declarations registered by mistake.
pub const MAX_SUPERTYPE_DEPTH: u32 = 128;

/// Maximum number of segments in a dotted property path.
pub const MAX_PROPERTY_PATH_SEGMENTS: u32 = 256;

// =============================================================================
// Operation Counts
// =============================================================================

/// Maximum number of entries a recursion guard's visiting set may hold.
pub const MAX_VISITING_SET_SIZE: u32 = 10_000;

/// Maximum number of enter calls a single recursion guard accepts.
pub const MAX_GUARD_ITERATIONS: u32 = 100_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Inline capacity for type-argument lists.
///
/// Almost every generic declaration has one or two parameters (`List<E>`,
/// `Map<K, V>`), so small vectors avoid a heap allocation in the common case.
pub const TYPE_ARGS_INLINE: usize = 4;
