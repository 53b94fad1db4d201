//! Type schemas: the descriptor contract consumed by the kernel.
//!
//! A [`TypeSchema`] is what an external introspection service reports for one
//! type: its identity, its direct supertypes, and the full ordered set of
//! method signatures visible on it (inherited declarations included, each
//! carrying the type that declares it).
//!
//! The kernel never inspects live type metadata. Everything it knows about a
//! type arrives through a [`SchemaProvider`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Opaque identifier for a type.
///
/// Views, delegates, parameter types and return types all share this one
/// identifier space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub String);

impl TypeId {
    pub const VOID: &'static str = "void";
    pub const BOOLEAN: &'static str = "boolean";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The "no value" return type.
    pub fn void() -> Self {
        Self::new(Self::VOID)
    }

    pub fn is_void(&self) -> bool {
        self.0 == Self::VOID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of a signature family: name plus parameter types.
///
/// Declarations sharing a key override one another; their return types may
/// narrow covariantly along the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodKey {
    pub name: String,
    pub params: Vec<TypeId>,
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, join_types(&self.params))
    }
}

/// One declaration of a method on a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// The type whose body introduces this declaration.
    pub declaring_type: TypeId,
    pub name: String,
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
    /// Whether the declaration carries a body (false = abstract).
    pub implemented: bool,
}

impl MethodSignature {
    pub fn new(
        declaring_type: impl Into<TypeId>,
        name: impl Into<String>,
        params: Vec<TypeId>,
        return_type: impl Into<TypeId>,
        implemented: bool,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            params,
            return_type: return_type.into(),
            implemented,
        }
    }

    pub fn key(&self) -> MethodKey {
        MethodKey {
            name: self.name.clone(),
            params: self.params.clone(),
        }
    }

    /// Whether `other` declares the same name, parameters and return type.
    pub fn same_shape(&self, other: &MethodSignature) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.return_type == other.return_type
    }

    /// The declaration without its owner, e.g. `getZ()`.
    pub fn unqualified(&self) -> String {
        format!("{}({})", self.name, join_types(&self.params))
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.unqualified())
    }
}

/// The full descriptor for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    pub id: TypeId,
    /// Direct supertypes, in declaration order.
    pub supertypes: Vec<TypeId>,
    /// Every visible method declaration, inherited ones included.
    pub methods: Vec<MethodSignature>,
}

impl TypeSchema {
    pub fn new(id: TypeId, supertypes: Vec<TypeId>, methods: Vec<MethodSignature>) -> Self {
        Self {
            id,
            supertypes,
            methods,
        }
    }

    /// Methods whose declaring type is this type itself.
    pub fn own_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods
            .iter()
            .filter(move |method| method.declaring_type == self.id)
    }

    pub fn abstract_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.iter().filter(|method| !method.implemented)
    }
}

/// Source of type schemas.
///
/// Implementations must be total and side-effect free for any identifier they
/// answer: the same id always yields the same schema.
pub trait SchemaProvider: Send + Sync {
    fn schema(&self, id: &TypeId) -> Option<Arc<TypeSchema>>;

    /// Whether `sub` equals `sup` or transitively extends it.
    ///
    /// Identifiers the provider does not know relate only to themselves.
    fn is_subtype_of(&self, sub: &TypeId, sup: &TypeId) -> bool {
        if sub == sup {
            return true;
        }
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([sub.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(schema) = self.schema(&current) else {
                continue;
            };
            for parent in &schema.supertypes {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent.clone());
            }
        }
        false
    }

    fn is_strict_subtype_of(&self, sub: &TypeId, sup: &TypeId) -> bool {
        sub != sup && self.is_subtype_of(sub, sup)
    }
}

pub(crate) fn join_types(types: &[TypeId]) -> String {
    types
        .iter()
        .map(TypeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
