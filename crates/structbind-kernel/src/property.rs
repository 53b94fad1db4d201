//! Property aggregation: pair abstract accessors into managed properties.
//!
//! A name becomes a managed property only when no accessor family for it is
//! implemented by any view or by the delegate. Names with at least one
//! implemented half are left to the method resolver, but every abstract half
//! must still be satisfied by something.

use crate::bindings::PropertySpec;
use crate::declarations::DeclarationIndex;
use crate::error::BindingError;
use crate::schema::{MethodSignature, TypeId};
use indexmap::IndexMap;
use std::sync::Arc;

/// Which half of a property an accessor declaration is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// Classify `method` as an accessor, returning its property name.
///
/// Getters are `getX()` returning a value or `isX()` returning `boolean`;
/// setters are `setX(T)` returning `void`.
pub fn accessor_of(method: &MethodSignature) -> Option<(AccessorKind, String)> {
    let (kind, rest) = if let Some(rest) = method.name.strip_prefix("get") {
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method.name.strip_prefix("is") {
        if method.return_type.as_str() != TypeId::BOOLEAN {
            return None;
        }
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method.name.strip_prefix("set") {
        (AccessorKind::Setter, rest)
    } else {
        return None;
    };

    if !rest.starts_with(|c: char| c.is_uppercase()) {
        return None;
    }

    let shaped = match kind {
        AccessorKind::Getter => method.params.is_empty() && !method.return_type.is_void(),
        AccessorKind::Setter => method.params.len() == 1 && method.return_type.is_void(),
    };
    shaped.then(|| (kind, property_name(rest)))
}

/// Bean-style decapitalization: `Z` -> `z`, `Name` -> `name`, `URL` -> `URL`.
pub fn property_name(suffix: &str) -> String {
    let mut chars = suffix.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) {
        return suffix.to_string();
    }
    let mut name: String = first.to_lowercase().collect();
    name.push_str(&suffix[first.len_utf8()..]);
    name
}

/// The type an accessor carries: getter return or setter parameter.
fn accessor_type(kind: AccessorKind, method: &MethodSignature) -> &TypeId {
    match kind {
        AccessorKind::Getter => &method.return_type,
        AccessorKind::Setter => &method.params[0],
    }
}

#[derive(Debug, Default)]
struct Candidate {
    /// Accessor declarations in scan order.
    accessors: Vec<(AccessorKind, MethodSignature)>,
}

/// Group accessors into managed properties, validating pairing and types.
pub(crate) fn aggregate(
    index: &DeclarationIndex,
) -> Result<IndexMap<String, Arc<PropertySpec>>, BindingError> {
    let mut candidates: IndexMap<String, Candidate> = IndexMap::new();
    for method in index.view_declarations() {
        if let Some((kind, name)) = accessor_of(method) {
            candidates
                .entry(name)
                .or_default()
                .accessors
                .push((kind, method.clone()));
        }
    }

    let mut properties = IndexMap::new();
    for (name, candidate) in candidates {
        if let Some(spec) = check_candidate(index, &name, &candidate)? {
            properties.insert(name, Arc::new(spec));
        }
    }
    Ok(properties)
}

fn check_candidate(
    index: &DeclarationIndex,
    name: &str,
    candidate: &Candidate,
) -> Result<Option<PropertySpec>, BindingError> {
    let family_of = |method: &MethodSignature| index.family(&method.key());

    let implemented = |kind: AccessorKind, by_view: bool| {
        candidate.accessors.iter().any(|(k, method)| {
            *k == kind
                && family_of(method).is_some_and(|family| {
                    if by_view {
                        family.implemented_by_view()
                    } else {
                        family.implemented_by_delegate()
                    }
                })
        })
    };

    let abstract_accessors: Vec<&(AccessorKind, MethodSignature)> = candidate
        .accessors
        .iter()
        .filter(|(_, method)| !method.implemented)
        .collect();
    let any_implemented = candidate
        .accessors
        .iter()
        .any(|(_, method)| family_of(method).is_some_and(|family| family.is_implemented()));

    if any_implemented {
        check_split_implementation(index, name, candidate, &implemented)?;

        let unsatisfied: Vec<MethodSignature> = abstract_accessors
            .iter()
            .filter(|(_, method)| !family_of(method).is_some_and(|family| family.is_implemented()))
            .map(|(_, method)| method.clone())
            .collect();
        if !unsatisfied.is_empty() {
            return Err(BindingError::IncompleteProperty {
                property: name.to_string(),
                declared: unsatisfied,
            });
        }
        return Ok(None);
    }

    let getters: Vec<MethodSignature> = abstract_accessors
        .iter()
        .filter(|(kind, _)| *kind == AccessorKind::Getter)
        .map(|(_, method)| method.clone())
        .collect();
    let setters: Vec<MethodSignature> = abstract_accessors
        .iter()
        .filter(|(kind, _)| *kind == AccessorKind::Setter)
        .map(|(_, method)| method.clone())
        .collect();

    if getters.is_empty() || setters.is_empty() {
        return Err(BindingError::IncompleteProperty {
            property: name.to_string(),
            declared: abstract_accessors
                .iter()
                .map(|(_, method)| method.clone())
                .collect(),
        });
    }

    let mut types: Vec<TypeId> = Vec::new();
    for (kind, method) in &abstract_accessors {
        let property_type = accessor_type(*kind, method);
        if !types.contains(property_type) {
            types.push(property_type.clone());
        }
    }
    if types.len() > 1 {
        return Err(BindingError::InconsistentPropertyType {
            property: name.to_string(),
            types,
        });
    }

    Ok(Some(PropertySpec {
        name: name.to_string(),
        property_type: types.remove(0),
        getters,
        setters,
    }))
}

/// Reject a property whose getter lives only on a view while its setter
/// lives only on the delegate, or the other way around.
fn check_split_implementation(
    index: &DeclarationIndex,
    name: &str,
    candidate: &Candidate,
    implemented: &dyn Fn(AccessorKind, bool) -> bool,
) -> Result<(), BindingError> {
    let view_only = |kind: AccessorKind| implemented(kind, true) && !implemented(kind, false);
    let delegate_only = |kind: AccessorKind| implemented(kind, false) && !implemented(kind, true);

    let split = if view_only(AccessorKind::Getter) && delegate_only(AccessorKind::Setter) {
        Some((AccessorKind::Getter, AccessorKind::Setter))
    } else if view_only(AccessorKind::Setter) && delegate_only(AccessorKind::Getter) {
        Some((AccessorKind::Setter, AccessorKind::Getter))
    } else {
        None
    };
    let Some((view_kind, delegate_kind)) = split else {
        return Ok(());
    };

    let families_of = move |kind: AccessorKind| {
        candidate
            .accessors
            .iter()
            .filter(move |(k, _)| *k == kind)
            .filter_map(move |(_, method)| index.family(&method.key()))
    };
    let view = families_of(view_kind)
        .find_map(|family| family.view_implementations().into_iter().next());
    let delegate = families_of(delegate_kind)
        .find_map(|family| family.delegate_implementations().into_iter().next());

    match (view, delegate) {
        (Some(view), Some(delegate)) => Err(BindingError::DualImplementation {
            property: name.to_string(),
            view,
            delegate,
        }),
        _ => Ok(()),
    }
}
