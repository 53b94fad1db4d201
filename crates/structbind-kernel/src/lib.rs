//! # Structbind Kernel
//!
//! Binding-plan resolution for managed structs: given the view contracts a
//! struct must expose and an optional delegate type supplying method bodies,
//! compute how every exposed method is satisfied.
//!
//! This crate is **introspection-agnostic**: it never looks at live type
//! metadata. Types arrive as pre-computed [`TypeSchema`]s through a
//! [`SchemaProvider`].
//!
//! ## Architecture
//!
//! ```text
//! SchemaProvider        ← External introspection (or SchemaCatalog)
//!     │
//! Convergence           ← Most-derived members of a type list
//!     │
//! DeclarationIndex      ← Declarations grouped by signature family
//!     │
//! PropertyAggregator    ← Abstract accessor pairs → managed properties
//!     │
//! MethodResolver        ← One binding per declaration: managed/direct/delegate
//!     │
//! BindingsStore         ← Memoized StructBindings per (views, delegate)
//! ```

pub mod bindings;
pub mod catalog;
pub mod convergence;
mod declarations;
pub mod error;
mod method;
pub mod property;
pub mod resolve;
pub mod schema;
pub mod store;

pub use bindings::{MethodBinding, PropertySpec, StructBindings, ViewSet};
pub use catalog::{CatalogError, MethodDecl, SchemaCatalog, TypeDecl};
pub use convergence::{converge_by, find_converging_types};
pub use error::{BindingError, BindingsComputationError, ImplementationSite};
pub use property::{AccessorKind, accessor_of};
pub use resolve::resolve_bindings;
pub use schema::{MethodKey, MethodSignature, SchemaProvider, TypeId, TypeSchema};
pub use store::{BindingsKey, BindingsStore};
