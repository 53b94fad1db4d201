//! The resolution pipeline for one (views, delegate) pair.

use crate::bindings::{StructBindings, ViewSet};
use crate::declarations::DeclarationIndex;
use crate::error::BindingError;
use crate::schema::{SchemaProvider, TypeSchema};
use crate::{method, property};
use std::sync::Arc;

/// Compute the binding plan for `views` backed by an optional `delegate`.
///
/// Property aggregation runs before method resolution, so accessor errors
/// are reported ahead of implementation conflicts. Pure: the same inputs
/// always produce an equal result or the same error.
pub fn resolve_bindings<P>(
    views: ViewSet,
    delegate: Option<Arc<TypeSchema>>,
    provider: &P,
) -> Result<StructBindings, BindingError>
where
    P: SchemaProvider + ?Sized,
{
    let index = DeclarationIndex::collect(&views, delegate.as_deref(), provider);
    let properties = property::aggregate(&index)?;
    let methods = method::resolve(&index, &properties, provider)?;

    Ok(StructBindings {
        views,
        delegate,
        properties,
        methods,
    })
}
