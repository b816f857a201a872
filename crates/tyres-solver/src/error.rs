//! Errors surfaced by the resolution engine.
//!
//! Every error is a usage error reported synchronously to the direct caller.
//! "Nothing found" outcomes (no property, no component type, no matching
//! supertype) are `Option::None`, never an error.

use std::fmt;

/// Error returned by resolution queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A required input was missing or a precondition on an argument failed,
    /// e.g. specializing to a type that is not a subtype.
    InvalidArgument { message: String },

    /// A wildcard with neither a lower nor an upper bound reached promotion.
    UnsupportedType { descriptor: String },

    /// `required_property` found no property for the given path.
    MissingProperty { owner: String, path: String },

    /// A recursion limit was hit while walking a malformed declaration graph.
    RecursionLimit { operation: &'static str },
}

impl ResolveError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::UnsupportedType { descriptor } => {
                write!(f, "unsupported type: {descriptor} has no bound to resolve")
            }
            Self::MissingProperty { owner, path } => {
                write!(f, "no property '{path}' on {owner}")
            }
            Self::RecursionLimit { operation } => {
                write!(f, "recursion limit exceeded during {operation}")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Result alias used throughout the solver.
pub type Result<T> = std::result::Result<T, ResolveError>;
