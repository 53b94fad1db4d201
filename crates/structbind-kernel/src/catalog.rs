//! In-memory schema catalog.
//!
//! Builds [`TypeSchema`]s from declarative type records, the way an
//! introspection service would report them: each type's method set lists its
//! supertypes' declarations first (in supertype order), then its own.
//!
//! Catalog documents are JSON or TOML:
//!
//! ```json
//! { "types": [
//!     { "id": "Number" },
//!     { "id": "HasValue", "methods": [ { "name": "getValue", "returns": "Number" } ] }
//! ] }
//! ```

use crate::schema::{MethodSignature, SchemaProvider, TypeId, TypeSchema};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

/// Errors raised while loading or building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("type declared more than once: {0}")]
    DuplicateType(TypeId),

    #[error("type {type_id} extends unknown type {supertype}")]
    UnknownSupertype { type_id: TypeId, supertype: TypeId },

    #[error("inheritance cycle through {0}")]
    Cycle(TypeId),
}

/// A declared type as it appears in a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub id: TypeId,
    #[serde(default)]
    pub supertypes: Vec<TypeId>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// A method introduced by a [`TypeDecl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeId>,
    #[serde(default = "TypeId::void")]
    pub returns: TypeId,
    #[serde(default)]
    pub implemented: bool,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, params: &[&str], returns: &str, implemented: bool) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| TypeId::from(*p)).collect(),
            returns: TypeId::from(returns),
            implemented,
        }
    }

    fn declared_on(&self, owner: &TypeId) -> MethodSignature {
        MethodSignature {
            declaring_type: owner.clone(),
            name: self.name.clone(),
            params: self.params.clone(),
            return_type: self.returns.clone(),
            implemented: self.implemented,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// Immutable set of schemas keyed by type id.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: BTreeMap<TypeId, Arc<TypeSchema>>,
    order: Vec<TypeId>,
}

impl SchemaCatalog {
    /// Build a catalog, flattening inherited declarations into every schema.
    pub fn from_decls(decls: Vec<TypeDecl>) -> Result<Self, CatalogError> {
        let mut index: BTreeMap<TypeId, TypeDecl> = BTreeMap::new();
        let mut order = Vec::with_capacity(decls.len());
        for decl in decls {
            if index.contains_key(&decl.id) {
                return Err(CatalogError::DuplicateType(decl.id));
            }
            order.push(decl.id.clone());
            index.insert(decl.id.clone(), decl);
        }

        for decl in index.values() {
            for supertype in &decl.supertypes {
                if !index.contains_key(supertype) {
                    return Err(CatalogError::UnknownSupertype {
                        type_id: decl.id.clone(),
                        supertype: supertype.clone(),
                    });
                }
            }
        }

        let mut flattened: BTreeMap<TypeId, Vec<MethodSignature>> = BTreeMap::new();
        for id in &order {
            let mut visiting = BTreeSet::new();
            flatten(id, &index, &mut flattened, &mut visiting)?;
        }

        let schemas = order
            .iter()
            .filter_map(|id| {
                let decl = index.get(id)?;
                let methods = flattened.remove(id)?;
                let schema = TypeSchema::new(id.clone(), decl.supertypes.clone(), methods);
                Some((id.clone(), Arc::new(schema)))
            })
            .collect();

        Ok(Self { schemas, order })
    }

    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(input)?;
        Self::from_decls(document.types)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = toml::from_str(input)?;
        Self::from_decls(document.types)
    }

    /// Load a catalog file; `.toml` files are read as TOML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&input),
            _ => Self::from_json_str(&input),
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schemas in declaration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Arc<TypeSchema>> {
        self.order.iter().filter_map(|id| self.schemas.get(id))
    }
}

impl SchemaProvider for SchemaCatalog {
    fn schema(&self, id: &TypeId) -> Option<Arc<TypeSchema>> {
        self.schemas.get(id).cloned()
    }
}

fn flatten(
    id: &TypeId,
    index: &BTreeMap<TypeId, TypeDecl>,
    flattened: &mut BTreeMap<TypeId, Vec<MethodSignature>>,
    visiting: &mut BTreeSet<TypeId>,
) -> Result<(), CatalogError> {
    if flattened.contains_key(id) {
        return Ok(());
    }
    if !visiting.insert(id.clone()) {
        return Err(CatalogError::Cycle(id.clone()));
    }
    let Some(decl) = index.get(id) else {
        return Ok(());
    };

    let mut methods: Vec<MethodSignature> = Vec::new();
    for supertype in &decl.supertypes {
        flatten(supertype, index, flattened, visiting)?;
        for inherited in flattened.get(supertype).into_iter().flatten() {
            if !methods.contains(inherited) {
                methods.push(inherited.clone());
            }
        }
    }
    for own in &decl.methods {
        let signature = own.declared_on(id);
        if !methods.contains(&signature) {
            methods.push(signature);
        }
    }

    visiting.remove(id);
    flattened.insert(id.clone(), methods);
    Ok(())
}
