//! Declaration index shared by the property aggregator and method resolver.
//!
//! Scans the views (then the delegate) once, groups every declaration by
//! signature family and records the bound sources in output order.

use crate::bindings::ViewSet;
use crate::convergence::converge_by;
use crate::error::{BindingError, ImplementationSite};
use crate::schema::{MethodKey, MethodSignature, SchemaProvider, TypeSchema};
use indexmap::IndexMap;

/// All declarations sharing one [`MethodKey`].
#[derive(Debug, Clone)]
pub(crate) struct SignatureFamily {
    pub key: MethodKey,
    pub view_declarations: Vec<MethodSignature>,
    pub delegate_declarations: Vec<MethodSignature>,
}

impl SignatureFamily {
    fn new(key: MethodKey) -> Self {
        Self {
            key,
            view_declarations: Vec::new(),
            delegate_declarations: Vec::new(),
        }
    }

    pub fn view_implementations(&self) -> Vec<MethodSignature> {
        self.view_declarations
            .iter()
            .filter(|method| method.implemented)
            .cloned()
            .collect()
    }

    /// Delegate bodies, excluding declarations the delegate merely inherits
    /// from one of the views.
    pub fn delegate_implementations(&self) -> Vec<MethodSignature> {
        self.delegate_declarations
            .iter()
            .filter(|method| method.implemented && !self.view_declarations.contains(method))
            .cloned()
            .collect()
    }

    pub fn implemented_by_view(&self) -> bool {
        self.view_declarations.iter().any(|method| method.implemented)
    }

    pub fn implemented_by_delegate(&self) -> bool {
        !self.delegate_implementations().is_empty()
    }

    pub fn is_implemented(&self) -> bool {
        self.implemented_by_view() || self.implemented_by_delegate()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DeclarationIndex {
    families: IndexMap<MethodKey, SignatureFamily>,
    /// Every distinct view declaration, in scan order.
    declarations: Vec<MethodSignature>,
    /// Distinct view declarations by shape, first declaration wins.
    view_sources: Vec<MethodSignature>,
    /// Distinct delegate declarations of families no view declares.
    delegate_sources: Vec<MethodSignature>,
}

impl DeclarationIndex {
    pub fn collect<P>(views: &ViewSet, delegate: Option<&TypeSchema>, provider: &P) -> Self
    where
        P: SchemaProvider + ?Sized,
    {
        let mut index = Self::default();

        for view in views.converged(provider) {
            for method in &view.methods {
                let family = index
                    .families
                    .entry(method.key())
                    .or_insert_with(|| SignatureFamily::new(method.key()));
                if !family.view_declarations.contains(method) {
                    family.view_declarations.push(method.clone());
                    index.declarations.push(method.clone());
                }
                if !index.view_sources.iter().any(|s| s.same_shape(method)) {
                    index.view_sources.push(method.clone());
                }
            }
        }

        if let Some(delegate) = delegate {
            for method in &delegate.methods {
                let family = index
                    .families
                    .entry(method.key())
                    .or_insert_with(|| SignatureFamily::new(method.key()));
                if !family.delegate_declarations.contains(method) {
                    family.delegate_declarations.push(method.clone());
                }
                if family.view_declarations.is_empty()
                    && !index.delegate_sources.iter().any(|s| s.same_shape(method))
                {
                    index.delegate_sources.push(method.clone());
                }
            }
        }

        index
    }

    pub fn family(&self, key: &MethodKey) -> Option<&SignatureFamily> {
        self.families.get(key)
    }

    /// Every declaration visible on a view, in scan order.
    pub fn view_declarations(&self) -> impl Iterator<Item = &MethodSignature> {
        self.declarations.iter()
    }

    /// Bound sources: view declarations first, then delegate-only ones.
    pub fn sources(&self) -> impl Iterator<Item = &MethodSignature> {
        self.view_sources.iter().chain(&self.delegate_sources)
    }
}

/// The single most specific declaration among `candidates`.
///
/// Declaring types are converged first; if several unrelated declarers
/// remain, the narrowest return type breaks the tie. Anything still
/// ambiguous is a conflict between the first two survivors.
pub(crate) fn most_specific<P>(
    candidates: &[MethodSignature],
    provider: &P,
    site: fn(MethodSignature) -> ImplementationSite,
) -> Result<Option<MethodSignature>, BindingError>
where
    P: SchemaProvider + ?Sized,
{
    let by_declarer = converge_by(candidates, |a, b| {
        provider.is_strict_subtype_of(&a.declaring_type, &b.declaring_type)
    });
    let survivors = converge_by(&by_declarer, |a, b| {
        provider.is_strict_subtype_of(&a.return_type, &b.return_type)
    });

    match survivors.as_slice() {
        [] => Ok(None),
        [winner] => Ok(Some(winner.clone())),
        [first, second, ..] => Err(BindingError::ConflictingImplementation {
            method: first.unqualified(),
            first: site(first.clone()),
            second: site(second.clone()),
        }),
    }
}
