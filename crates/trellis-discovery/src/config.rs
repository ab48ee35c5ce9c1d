//! `trellis.toml`: which container to populate and how to find its components

use crate::error::{DiscoveryError, Result};
use crate::exclusion::ExclusionRule;
use crate::finder::ComponentFinder;
use crate::matcher::{
    CustomMarkerTypeMatcher, ExtendsClassTypeMatcher, ImplementsInterfaceTypeMatcher,
    NameSuffixTypeMatcher, TypeMatcher,
};
use crate::metadata::{MarkerIdentity, MetadataSource};
use crate::strategy::{
    ComponentFinderStrategy, MarkerComponentFinderStrategy, TypeMatcherComponentFinderStrategy,
};
use crate::supporting::{
    NamespaceSupportingTypesStrategy, ReferencedTypesSupportingTypesStrategy,
    SupportingTypesStrategy,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use trellis_core::{ArchitectureModel, ElementId, ElementKind};

/// Default config file name
pub const CONFIG_FILE: &str = "trellis.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Namespace (package prefix) to scan.
    pub namespace: String,
    /// Software system owning the container.
    pub system: String,
    /// Container the discovered components are added to.
    pub container: String,
    #[serde(default)]
    pub container_technology: String,
    /// Regular expressions over full type names.
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Globs over full type names.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub people: Vec<ElementConfig>,
    #[serde(default)]
    pub software_systems: Vec<ElementConfig>,
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
    /// Used by strategies that don't configure their own.
    #[serde(default)]
    pub supporting_types: SupportingTypesConfig,
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    pub system: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technology: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SupportingTypesKind {
    #[default]
    Referenced,
    Namespace,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupportingTypesConfig {
    #[serde(default)]
    pub strategy: SupportingTypesKind,
    #[serde(default)]
    pub include_indirect: bool,
}

impl SupportingTypesConfig {
    fn build(&self) -> Vec<Box<dyn SupportingTypesStrategy>> {
        let strategy: Box<dyn SupportingTypesStrategy> = match self.strategy {
            SupportingTypesKind::Referenced => {
                Box::new(ReferencedTypesSupportingTypesStrategy::new(self.include_indirect))
            }
            SupportingTypesKind::Namespace => Box::new(NamespaceSupportingTypesStrategy),
        };
        vec![strategy]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StrategyConfig {
    TypeMatcher {
        matchers: Vec<MatcherConfig>,
        #[serde(default)]
        supporting_types: Option<SupportingTypesConfig>,
    },
    Markers {
        #[serde(default)]
        supporting_types: Option<SupportingTypesConfig>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatcherConfig {
    NameSuffix {
        target: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        technology: String,
    },
    Marker {
        target: String,
        #[serde(default)]
        origin: Option<String>,
        #[serde(default)]
        description: String,
        #[serde(default)]
        technology: String,
    },
    Extends {
        target: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        technology: String,
    },
    Implements {
        target: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        technology: String,
    },
}

impl MatcherConfig {
    fn build(&self) -> Result<Box<dyn TypeMatcher>> {
        let matcher: Box<dyn TypeMatcher> = match self {
            MatcherConfig::NameSuffix { target, description, technology } => {
                Box::new(NameSuffixTypeMatcher::new(target, description, technology)?)
            }
            MatcherConfig::Marker { target, origin, description, technology } => {
                Box::new(CustomMarkerTypeMatcher::new(
                    MarkerIdentity::new(target.as_str(), origin.as_deref()),
                    description,
                    technology,
                )?)
            }
            MatcherConfig::Extends { target, description, technology } => {
                Box::new(ExtendsClassTypeMatcher::new(target, description, technology)?)
            }
            MatcherConfig::Implements { target, description, technology } => {
                Box::new(ImplementsInterfaceTypeMatcher::new(target, description, technology)?)
            }
        };
        Ok(matcher)
    }
}

impl DiscoveryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded discovery config from {}", path.display());
        Ok(config)
    }

    /// Build the model skeleton: the scanned system and container plus any
    /// extra people, systems and containers that markers may refer to.
    /// Returns the model and the container to populate.
    pub fn build_model(&self) -> Result<(ArchitectureModel, ElementId)> {
        let mut model = ArchitectureModel::new();
        let system = model.add_software_system(&self.system, "")?;
        let container = model.add_container(system, &self.container, "", &self.container_technology)?;

        for person in &self.people {
            model.add_person(&person.name, &person.description)?;
        }
        for other in &self.software_systems {
            model.add_software_system(&other.name, &other.description)?;
        }
        for extra in &self.containers {
            let owner = model
                .find_by_name(ElementKind::SoftwareSystem, None, &extra.system)
                .ok_or_else(|| {
                    DiscoveryError::InvalidConfig(format!(
                        "container '{}' belongs to unknown software system '{}'",
                        extra.name, extra.system
                    ))
                })?;
            model.add_container(owner, &extra.name, &extra.description, &extra.technology)?;
        }

        Ok((model, container))
    }

    /// Build a finder for `container` reading types from `source`.
    pub fn build_finder(
        &self,
        source: Arc<dyn MetadataSource>,
        container: ElementId,
    ) -> Result<ComponentFinder> {
        let mut strategies: Vec<Box<dyn ComponentFinderStrategy>> = Vec::new();
        for strategy in &self.strategies {
            match strategy {
                StrategyConfig::TypeMatcher { matchers, supporting_types } => {
                    if matchers.is_empty() {
                        return Err(DiscoveryError::InvalidConfig(
                            "a type-matcher strategy needs at least one matcher".to_string(),
                        ));
                    }
                    let matchers = matchers
                        .iter()
                        .map(MatcherConfig::build)
                        .collect::<Result<Vec<_>>>()?;
                    let supporting = supporting_types.as_ref().unwrap_or(&self.supporting_types);
                    strategies.push(Box::new(
                        TypeMatcherComponentFinderStrategy::new(Arc::clone(&source), matchers)
                            .with_supporting_types(supporting.build()),
                    ));
                }
                StrategyConfig::Markers { supporting_types } => {
                    let supporting = supporting_types.as_ref().unwrap_or(&self.supporting_types);
                    strategies.push(Box::new(
                        MarkerComponentFinderStrategy::new(Arc::clone(&source))
                            .with_supporting_types(supporting.build()),
                    ));
                }
            }
        }

        let mut finder = ComponentFinder::new(container, &self.namespace, strategies)?;
        for pattern in &self.exclusions {
            finder.add_exclusion(ExclusionRule::regex(pattern)?);
        }
        for pattern in &self.exclude_globs {
            finder.add_exclusion(ExclusionRule::glob(pattern)?);
        }
        Ok(finder)
    }
}
