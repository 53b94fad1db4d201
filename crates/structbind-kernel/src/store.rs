//! Memoizing bindings store.
//!
//! Resolution is pure, so the store never holds a lock while computing:
//! concurrent callers for the same key may each resolve, and the first result
//! inserted is the one every caller gets back. Failures are never cached;
//! the next request for a failing key resolves again from scratch.

use crate::bindings::{StructBindings, ViewSet};
use crate::error::{BindingError, BindingsComputationError};
use crate::resolve::resolve_bindings;
use crate::schema::{SchemaProvider, TypeId, TypeSchema};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Canonical identity of a resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingsKey {
    pub primary: TypeId,
    /// Additional views, without the primary and without duplicates.
    pub additional: Vec<TypeId>,
    pub delegate: Option<TypeId>,
}

impl BindingsKey {
    /// Canonicalize a request: first occurrence of each view wins.
    ///
    /// Views are de-duplicated but not convergence-reduced, so `[Base, Derived]`
    /// and `[Derived]` are distinct keys. The declared views, primary
    /// included, are part of the result; reduction happens only when
    /// declarations are scanned.
    pub fn canonical(primary: &TypeId, additional: &[TypeId], delegate: Option<&TypeId>) -> Self {
        let mut unique: Vec<TypeId> = Vec::with_capacity(additional.len());
        for view in additional {
            if view != primary && !unique.contains(view) {
                unique.push(view.clone());
            }
        }
        Self {
            primary: primary.clone(),
            additional: unique,
            delegate: delegate.cloned(),
        }
    }

    /// Every view id, primary first.
    pub fn views(&self) -> impl Iterator<Item = &TypeId> {
        std::iter::once(&self.primary).chain(&self.additional)
    }
}

impl fmt::Display for BindingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let views: Vec<&str> = self.views().map(TypeId::as_str).collect();
        write!(f, "[{}]", views.join(", "))?;
        match &self.delegate {
            Some(delegate) => write!(f, " with delegate {delegate}"),
            None => Ok(()),
        }
    }
}

/// Shared, concurrently accessed cache of binding plans.
pub struct BindingsStore<P> {
    provider: P,
    cache: DashMap<BindingsKey, Arc<StructBindings>>,
}

impl<P: SchemaProvider> BindingsStore<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Bindings for `primary` plus `additional` views, optionally backed by
    /// `delegate`.
    pub fn get_bindings(
        &self,
        primary: &TypeId,
        additional: &[TypeId],
        delegate: Option<&TypeId>,
    ) -> Result<Arc<StructBindings>, BindingsComputationError> {
        let key = BindingsKey::canonical(primary, additional, delegate);

        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "struct bindings cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        debug!(%key, "struct bindings cache miss");
        let computed = match self.compute(&key) {
            Ok(bindings) => Arc::new(bindings),
            Err(cause) => {
                debug!(%key, error = %cause, "struct bindings resolution failed");
                return Err(BindingsComputationError { key, cause });
            }
        };

        let retained = match self.cache.entry(key) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(entry.insert(computed).value()),
        };
        Ok(retained)
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, key: &BindingsKey) -> bool {
        self.cache.contains_key(key)
    }

    fn compute(&self, key: &BindingsKey) -> Result<StructBindings, BindingError> {
        let primary = self.lookup(&key.primary)?;
        let additional = key
            .additional
            .iter()
            .map(|id| self.lookup(id))
            .collect::<Result<Vec<_>, _>>()?;
        let delegate = key
            .delegate
            .as_ref()
            .map(|id| self.lookup(id))
            .transpose()?;

        let views = ViewSet::new(primary, additional);
        resolve_bindings(views, delegate, &self.provider)
    }

    fn lookup(&self, id: &TypeId) -> Result<Arc<TypeSchema>, BindingError> {
        self.provider
            .schema(id)
            .ok_or_else(|| BindingError::UnknownType(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_puts_primary_first_and_drops_duplicates() {
        let key = BindingsKey::canonical(
            &TypeId::from("A"),
            &[TypeId::from("B"), TypeId::from("A"), TypeId::from("B")],
            Some(&TypeId::from("Impl")),
        );
        assert_eq!(key.additional, vec![TypeId::from("B")]);
        assert_eq!(key.to_string(), "[A, B] with delegate Impl");
    }

    #[test]
    fn ancestor_views_are_not_reduced_out_of_the_key() {
        let both = BindingsKey::canonical(&TypeId::from("Base"), &[TypeId::from("Derived")], None);
        let derived = BindingsKey::canonical(&TypeId::from("Derived"), &[], None);
        assert_ne!(both, derived);
        assert_eq!(both.to_string(), "[Base, Derived]");
    }

    #[test]
    fn key_without_delegate_renders_views_only() {
        let key = BindingsKey::canonical(&TypeId::from("A"), &[], None);
        assert_eq!(key.to_string(), "[A]");
    }
}
