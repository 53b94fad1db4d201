//! Method binding resolution.
//!
//! Every bound source gets exactly one [`MethodBinding`]. Implementors are
//! chosen per signature family by converging the implementing declarations;
//! a view body and a delegate body for the same family is a conflict.

use crate::bindings::{MethodBinding, PropertySpec};
use crate::declarations::{DeclarationIndex, SignatureFamily, most_specific};
use crate::error::{BindingError, ImplementationSite};
use crate::schema::{MethodKey, MethodSignature, SchemaProvider};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
enum FamilyResolution {
    Managed(Arc<PropertySpec>),
    Direct(MethodSignature),
    Delegate(MethodSignature),
}

pub(crate) fn resolve<P>(
    index: &DeclarationIndex,
    properties: &IndexMap<String, Arc<PropertySpec>>,
    provider: &P,
) -> Result<Vec<MethodBinding>, BindingError>
where
    P: SchemaProvider + ?Sized,
{
    let mut claimed: HashMap<MethodKey, Arc<PropertySpec>> = HashMap::new();
    for property in properties.values() {
        for accessor in property.getters.iter().chain(&property.setters) {
            claimed.insert(accessor.key(), Arc::clone(property));
        }
    }

    let mut resolved: HashMap<MethodKey, FamilyResolution> = HashMap::new();
    let mut bindings = Vec::new();

    for source in index.sources() {
        let key = source.key();
        let resolution = match resolved.get(&key) {
            Some(resolution) => resolution.clone(),
            None => {
                let Some(family) = index.family(&key) else {
                    continue;
                };
                let Some(resolution) = resolve_family(family, source, &claimed, provider)? else {
                    continue;
                };
                resolved.insert(key, resolution.clone());
                resolution
            }
        };

        bindings.push(match resolution {
            FamilyResolution::Managed(property) => MethodBinding::ManagedProperty {
                source: source.clone(),
                property,
            },
            FamilyResolution::Direct(implementor) => MethodBinding::Direct {
                source: source.clone(),
                implementor,
            },
            FamilyResolution::Delegate(implementor) => MethodBinding::Delegate {
                source: source.clone(),
                implementor,
            },
        });
    }

    Ok(bindings)
}

fn resolve_family<P>(
    family: &SignatureFamily,
    source: &MethodSignature,
    claimed: &HashMap<MethodKey, Arc<PropertySpec>>,
    provider: &P,
) -> Result<Option<FamilyResolution>, BindingError>
where
    P: SchemaProvider + ?Sized,
{
    if let Some(property) = claimed.get(&family.key) {
        trace!(method = %family.key, property = %property.name, "managed property binding");
        return Ok(Some(FamilyResolution::Managed(Arc::clone(property))));
    }

    let view = most_specific(
        &family.view_implementations(),
        provider,
        ImplementationSite::View,
    )?;
    let delegate = most_specific(
        &family.delegate_implementations(),
        provider,
        ImplementationSite::Delegate,
    )?;

    match (view, delegate) {
        (Some(view), Some(delegate)) => Err(BindingError::ConflictingImplementation {
            method: family.key.to_string(),
            first: ImplementationSite::View(view),
            second: ImplementationSite::Delegate(delegate),
        }),
        (Some(view), None) => {
            trace!(method = %family.key, implementor = %view, "direct binding");
            Ok(Some(FamilyResolution::Direct(view)))
        }
        (None, Some(delegate)) => {
            trace!(method = %family.key, implementor = %delegate, "delegate binding");
            Ok(Some(FamilyResolution::Delegate(delegate)))
        }
        // Abstract declarations the delegate never implements are not exposed.
        (None, None) if family.view_declarations.is_empty() => Ok(None),
        (None, None) => Err(BindingError::UnimplementedMethod(source.clone())),
    }
}
