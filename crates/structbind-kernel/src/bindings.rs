//! The binding plan: how every exposed method is satisfied.

use crate::convergence::find_converging_types;
use crate::schema::{MethodSignature, SchemaProvider, TypeId, TypeSchema};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A synthesized managed property.
///
/// Only produced when no view and no delegate implements any accessor for
/// the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: String,
    pub property_type: TypeId,
    /// Abstract getter declarations backed by this property.
    pub getters: Vec<MethodSignature>,
    /// Abstract setter declarations backed by this property.
    pub setters: Vec<MethodSignature>,
}

impl PropertySpec {
    /// Whether `method` is one of the accessors this property backs.
    pub fn backs(&self, method: &MethodSignature) -> bool {
        self.getters.iter().chain(&self.setters).any(|a| a == method)
    }
}

/// The resolved decision for one method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodBinding {
    /// Backed by a synthesized property.
    ManagedProperty {
        source: MethodSignature,
        property: Arc<PropertySpec>,
    },
    /// Implemented by one of the views itself.
    Direct {
        source: MethodSignature,
        implementor: MethodSignature,
    },
    /// Forwarded to the delegate.
    ///
    /// `implementor` may narrow the return type of `source`.
    Delegate {
        source: MethodSignature,
        implementor: MethodSignature,
    },
}

impl MethodBinding {
    /// The declaration this binding satisfies.
    pub fn source(&self) -> &MethodSignature {
        match self {
            Self::ManagedProperty { source, .. }
            | Self::Direct { source, .. }
            | Self::Delegate { source, .. } => source,
        }
    }

    /// The declaration supplying the body, if any.
    pub fn implementor(&self) -> Option<&MethodSignature> {
        match self {
            Self::ManagedProperty { .. } => None,
            Self::Direct { implementor, .. } | Self::Delegate { implementor, .. } => {
                Some(implementor)
            }
        }
    }

    /// For direct bindings, the view type supplying the implementation.
    pub fn implementing_view(&self) -> Option<&TypeId> {
        match self {
            Self::Direct { implementor, .. } => Some(&implementor.declaring_type),
            _ => None,
        }
    }

    pub fn property(&self) -> Option<&PropertySpec> {
        match self {
            Self::ManagedProperty { property, .. } => Some(property.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for MethodBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManagedProperty { source, property } => {
                write!(f, "{source} -> managed property '{}'", property.name)
            }
            Self::Direct {
                source,
                implementor,
            } => write!(f, "{source} -> direct {implementor}"),
            Self::Delegate {
                source,
                implementor,
            } => write!(
                f,
                "{source}: {} -> delegate {implementor}: {}",
                source.return_type, implementor.return_type
            ),
        }
    }
}

/// The ordered, de-duplicated set of views requested on a struct.
///
/// The primary view is always first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSet {
    views: Vec<Arc<TypeSchema>>,
}

impl ViewSet {
    pub fn new(
        primary: Arc<TypeSchema>,
        additional: impl IntoIterator<Item = Arc<TypeSchema>>,
    ) -> Self {
        let mut views = vec![primary];
        for view in additional {
            if !views.iter().any(|existing| existing.id == view.id) {
                views.push(view);
            }
        }
        Self { views }
    }

    pub fn primary(&self) -> &Arc<TypeSchema> {
        &self.views[0]
    }

    pub fn declared(&self) -> &[Arc<TypeSchema>] {
        &self.views
    }

    pub fn type_ids(&self) -> Vec<TypeId> {
        self.views.iter().map(|view| view.id.clone()).collect()
    }

    /// The most-derived views, in declaration order.
    ///
    /// Every declaration visible on a dropped view is also visible on a
    /// surviving descendant.
    pub fn converged<P>(&self, provider: &P) -> Vec<Arc<TypeSchema>>
    where
        P: SchemaProvider + ?Sized,
    {
        let maximal = find_converging_types(&self.type_ids(), provider);
        self.views
            .iter()
            .filter(|view| maximal.contains(&view.id))
            .cloned()
            .collect()
    }
}

/// The resolution result for one (views, delegate) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructBindings {
    pub(crate) views: ViewSet,
    pub(crate) delegate: Option<Arc<TypeSchema>>,
    pub(crate) properties: IndexMap<String, Arc<PropertySpec>>,
    pub(crate) methods: Vec<MethodBinding>,
}

impl StructBindings {
    pub fn declared_views(&self) -> &[Arc<TypeSchema>] {
        self.views.declared()
    }

    pub fn view_set(&self) -> &ViewSet {
        &self.views
    }

    pub fn delegate(&self) -> Option<&Arc<TypeSchema>> {
        self.delegate.as_ref()
    }

    /// Managed properties in first-encountered order.
    pub fn managed_properties(&self) -> &IndexMap<String, Arc<PropertySpec>> {
        &self.properties
    }

    pub fn managed_property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.get(name).map(Arc::as_ref)
    }

    pub fn method_bindings(&self) -> &[MethodBinding] {
        &self.methods
    }
}

impl fmt::Display for StructBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let views: Vec<&str> = self.views.declared().iter().map(|v| v.id.as_str()).collect();
        writeln!(f, "views: {}", views.join(", "))?;
        match &self.delegate {
            Some(delegate) => writeln!(f, "delegate: {}", delegate.id)?,
            None => writeln!(f, "delegate: none")?,
        }
        writeln!(f, "properties: {}", self.properties.len())?;
        for property in self.properties.values() {
            writeln!(f, "  {}: {}", property.name, property.property_type)?;
        }
        writeln!(f, "bindings: {}", self.methods.len())?;
        for binding in &self.methods {
            writeln!(f, "  {binding}")?;
        }
        Ok(())
    }
}
