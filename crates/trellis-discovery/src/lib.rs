//! Trellis Discovery: finds the components of a container from type metadata
//!
//! A [`ComponentFinder`] runs one or more [`ComponentFinderStrategy`]s against
//! the types of a namespace. Strategies turn matching types into components,
//! attach their supporting types, and add "uses" relationships wherever one
//! component's types reach another component's primary type.

pub mod config;
pub mod dependencies;
pub mod diagnostics;
pub mod error;
pub mod exclusion;
pub mod finder;
pub mod markers;
pub mod matcher;
pub mod metadata;
pub mod strategy;
pub mod supporting;


#[cfg(test)]
pub mod test_utils;

pub use config::{DiscoveryConfig, MatcherConfig, StrategyConfig, SupportingTypesConfig};
pub use dependencies::EfferentDependencyWalker;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::DiscoveryError;
pub use exclusion::{ExclusionRule, ExclusionRules};
pub use finder::{ComponentFinder, DiscoveryOutcome};
pub use matcher::{
    CustomMarkerTypeMatcher, ExtendsClassTypeMatcher, ImplementsInterfaceTypeMatcher,
    NameSuffixTypeMatcher, TypeMatcher,
};
pub use metadata::{
    Marker, MarkerIdentity, MemberDefinition, MetadataSource, MethodDefinition, TypeCatalog,
    TypeDefinition, TypeIndex, TypeMetadataProvider,
};
pub use strategy::{
    ComponentFinderStrategy, DiscoveryScope, DiscoverySession, MarkerComponentFinderStrategy,
    TypeMatcherComponentFinderStrategy,
};
pub use supporting::{
    NamespaceSupportingTypesStrategy, ReferencedTypesSupportingTypesStrategy,
    SupportingTypesStrategy,
};
