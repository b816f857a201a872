//! Common types and utilities for the tyres type-resolution engine.
//!
//! This crate provides foundational types shared by the engine crates:
//! - Name interning (`Atom`, `NameTable`) for class, member and
//!   type-parameter names
//! - Recursion limits and inline-capacity thresholds

// String interning for name deduplication
pub mod interner;
pub use interner::{Atom, NameTable};

// Centralized limits and thresholds
pub mod limits;
