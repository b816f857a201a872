//! Recursion guard for cycle detection, depth limiting and iteration
//! bounding in recursive resolution walks.
//!
//! Three walks in the engine can, on a malformed declaration graph, fail to
//! terminate on their own:
//! 1. following variable-to-variable chains in a binding map,
//! 2. erasing a descriptor through declared type-variable bounds,
//! 3. the depth-first superclass/interface search.
//!
//! Each of them runs under a `RecursionGuard` built from a named
//! [`RecursionProfile`]:
//!
//! ```ignore
//! let mut guard = RecursionGuard::with_profile(RecursionProfile::SupertypeWalk);
//! match guard.enter(key) {
//!     RecursionResult::Entered => {
//!         let result = walk(&mut guard);
//!         guard.leave(key);
//!         result
//!     }
//!     RecursionResult::Cycle => handle_cycle(),
//!     _ => handle_exceeded(),
//! }
//! ```
//!
//! In debug builds, dropping a guard with active entries panics, catching
//! forgotten `leave()` calls.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use tyres_common::limits;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
///
/// Each profile encodes a `(max_depth, max_iterations)` pair for one kind of
/// recursive walk, so call sites never carry magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Variable-to-variable chains inside a binding map.
    ///
    /// depth = `MAX_BINDING_CHAIN_DEPTH`
    BindingChain,

    /// Erasure of a descriptor to its raw type (array elements, bounds).
    ///
    /// depth = `MAX_RAW_RESOLUTION_DEPTH`
    RawTypeResolution,

    /// Depth-first superclass/interface search.
    ///
    /// depth = `MAX_SUPERTYPE_DEPTH`
    SupertypeWalk,

    /// Dotted property paths.
    ///
    /// depth = `MAX_PROPERTY_PATH_SEGMENTS`
    PropertyPath,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    /// Maximum recursion depth for this profile.
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::BindingChain => limits::MAX_BINDING_CHAIN_DEPTH,
            Self::RawTypeResolution => limits::MAX_RAW_RESOLUTION_DEPTH,
            Self::SupertypeWalk => limits::MAX_SUPERTYPE_DEPTH,
            Self::PropertyPath => limits::MAX_PROPERTY_PATH_SEGMENTS,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    /// Maximum iteration count for this profile.
    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::BindingChain
            | Self::RawTypeResolution
            | Self::SupertypeWalk
            | Self::PropertyPath => limits::MAX_GUARD_ITERATIONS,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    /// Returns `true` if entry was successful.
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks recursion state for cycle detection, depth limiting,
/// and iteration bounding.
///
/// Keys only need `Clone`, so a walk can key on a whole descriptor rather
/// than a hash of it.
pub struct RecursionGuard<K: Hash + Eq + Clone> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    max_visiting: u32,
}

impl<K: Hash + Eq + Clone> RecursionGuard<K> {
    /// Create a guard with explicit limits.
    ///
    /// Prefer [`with_profile`](Self::with_profile) for standard use cases.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            max_visiting: limits::MAX_VISITING_SET_SIZE,
        }
    }

    /// Create a guard from a named [`RecursionProfile`].
    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.visiting.len() as u32 >= self.max_visiting {
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    ///
    /// # Debug panics
    ///
    /// Panics in debug builds if `key` is not in the visiting set.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );

        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Clone> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
