//! Error types for binding resolution.

use crate::schema::{MethodSignature, TypeId, join_types};
use crate::store::BindingsKey;
use std::fmt;

/// Where an implementation of a method comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplementationSite {
    View(MethodSignature),
    Delegate(MethodSignature),
}

impl ImplementationSite {
    pub fn method(&self) -> &MethodSignature {
        match self {
            Self::View(method) | Self::Delegate(method) => method,
        }
    }
}

impl fmt::Display for ImplementationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View(method) => write!(f, "view {method}"),
            Self::Delegate(method) => write!(f, "delegate {method}"),
        }
    }
}

/// Validation failures detected while resolving a binding plan.
///
/// All of these are terminal: the same inputs always fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// An abstract accessor has no counterpart and nothing implements it.
    #[error(
        "property '{property}' is not valid: it must both have an abstract getter as well as a setter (found {found})",
        found = render_methods(.declared)
    )]
    IncompleteProperty {
        property: String,
        declared: Vec<MethodSignature>,
    },

    /// Abstract accessors for one property disagree on its type.
    #[error(
        "property '{property}' is not valid: it must have a consistent type, but it's defined as {found}",
        found = join_types(.types)
    )]
    InconsistentPropertyType { property: String, types: Vec<TypeId> },

    /// A method is implemented by more than one unrelated source.
    #[error("method {method} is implemented by both {first} and {second}")]
    ConflictingImplementation {
        method: String,
        first: ImplementationSite,
        second: ImplementationSite,
    },

    /// A property's accessors are split between a view and the delegate.
    #[error(
        "property '{property}' is implemented partly by view {view} and partly by delegate {delegate}"
    )]
    DualImplementation {
        property: String,
        view: MethodSignature,
        delegate: MethodSignature,
    },

    /// A non-accessor method has no implementation anywhere.
    #[error(
        "method {0} is not a property accessor, and it has no implementation on a view or the delegate"
    )]
    UnimplementedMethod(MethodSignature),

    /// The schema provider does not know a requested type.
    #[error("no schema available for type {0}")]
    UnknownType(TypeId),
}

impl BindingError {
    /// True for both the conflicting and the dual implementation kinds.
    pub fn is_conflicting_implementation(&self) -> bool {
        matches!(
            self,
            Self::ConflictingImplementation { .. } | Self::DualImplementation { .. }
        )
    }
}

/// A failed resolution as surfaced by the bindings store.
///
/// Wraps the underlying [`BindingError`] without altering it; the original is
/// available through [`cause`](Self::cause) and `Error::source`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to compute struct bindings for {key}")]
pub struct BindingsComputationError {
    pub key: BindingsKey,
    #[source]
    pub cause: BindingError,
}

impl BindingsComputationError {
    pub fn cause(&self) -> &BindingError {
        &self.cause
    }

    pub fn into_cause(self) -> BindingError {
        self.cause
    }
}

fn render_methods(methods: &[MethodSignature]) -> String {
    methods
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
