//! In-memory type catalog and the scoped provider it opens

use super::{MetadataSource, TypeDefinition, TypeMetadataProvider, type_names};
use crate::error::{DiscoveryError, Result};
use crate::exclusion::ExclusionRules;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

/// Every type an extractor produced, keyed by full name.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Arc<BTreeMap<String, TypeDefinition>>,
}

impl TypeCatalog {
    pub fn from_definitions(definitions: impl IntoIterator<Item = TypeDefinition>) -> Self {
        let mut types = BTreeMap::new();
        for mut definition in definitions {
            let name = type_names::strip_qualifier(&definition.name).to_string();
            definition.name.clone_from(&name);
            if types.insert(name.clone(), definition).is_some() {
                tracing::warn!("Type {} defined more than once; keeping the last definition", name);
            }
        }
        TypeCatalog {
            types: Arc::new(types),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_definitions(file.types))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!("Loaded {} types from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Open a provider scoped to `namespace` that honors `exclusions`.
    pub fn index(&self, namespace: &str, exclusions: &ExclusionRules) -> TypeIndex {
        TypeIndex {
            namespace: namespace.to_string(),
            exclusions: exclusions.clone(),
            types: Arc::clone(&self.types),
            reference_cache: DashMap::new(),
        }
    }
}

impl MetadataSource for TypeCatalog {
    fn open(
        &self,
        namespace: &str,
        exclusions: &ExclusionRules,
    ) -> Result<Box<dyn TypeMetadataProvider>> {
        Ok(Box::new(self.index(namespace, exclusions)))
    }
}

/// A [`TypeMetadataProvider`] over a shared catalog, scoped to one namespace.
///
/// Referenced types are memoized per type name for the lifetime of the index;
/// open a new index to start from an empty cache.
pub struct TypeIndex {
    namespace: String,
    exclusions: ExclusionRules,
    types: Arc<BTreeMap<String, TypeDefinition>>,
    reference_cache: DashMap<String, Arc<BTreeSet<String>>>,
}

impl TypeIndex {
    /// Number of types whose references have been computed.
    pub fn cached_reference_count(&self) -> usize {
        self.reference_cache.len()
    }

    fn compute_references(&self, name: &str) -> BTreeSet<String> {
        let Some(definition) = self.types.get(name) else {
            tracing::debug!("No metadata for {}; treating it as a leaf", name);
            return BTreeSet::new();
        };
        definition
            .mentioned_types()
            .into_iter()
            .filter(|referenced| !self.exclusions.is_excluded(referenced))
            .collect()
    }
}

impl TypeMetadataProvider for TypeIndex {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn all_types(&self) -> Vec<&TypeDefinition> {
        self.types
            .values()
            .filter(|t| type_names::in_namespace(&t.name, &self.namespace))
            .filter(|t| !self.exclusions.is_excluded(&t.name))
            .collect()
    }

    fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(type_names::strip_qualifier(name))
    }

    fn referenced_types(&self, name: &str) -> Arc<BTreeSet<String>> {
        let name = type_names::strip_qualifier(name);
        if let Some(cached) = self.reference_cache.get(name) {
            return Arc::clone(cached.value());
        }
        let references = Arc::new(self.compute_references(name));
        self.reference_cache
            .insert(name.to_string(), Arc::clone(&references));
        references
    }
}
