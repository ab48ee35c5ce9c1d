//! Component finder strategies and the enrichment steps they share

pub mod markers;
pub mod type_matcher;

use crate::dependencies::EfferentDependencyWalker;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::Result;
use crate::exclusion::ExclusionRules;
use crate::metadata::{MetadataSource, TypeMetadataProvider};
use crate::supporting::{ReferencedTypesSupportingTypesStrategy, SupportingTypesStrategy};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use trellis_core::{ArchitectureModel, ElementId};

pub use markers::MarkerComponentFinderStrategy;
pub use type_matcher::TypeMatcherComponentFinderStrategy;

/// What a discovery run targets: the container to populate, the namespace to
/// scan and the types to leave out.
#[derive(Debug, Clone)]
pub struct DiscoveryScope {
    pub container: ElementId,
    pub namespace: String,
    pub exclusions: ExclusionRules,
}

/// Mutable state threaded through the phases of one run.
pub struct DiscoverySession<'a> {
    pub model: &'a mut ArchitectureModel,
    pub diagnostics: &'a mut Diagnostics,
}

/// One technique for finding components.
///
/// The finder calls every strategy's `before_find_components`, then every
/// strategy's `find_components`, then every strategy's `after_find_components`,
/// so the last phase sees the components found by all strategies.
pub trait ComponentFinderStrategy {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn before_find_components(&mut self, scope: &DiscoveryScope) -> Result<()>;

    fn find_components(
        &mut self,
        scope: &DiscoveryScope,
        session: &mut DiscoverySession<'_>,
    ) -> Result<BTreeSet<ElementId>>;

    fn after_find_components(
        &mut self,
        scope: &DiscoveryScope,
        session: &mut DiscoverySession<'_>,
    ) -> Result<()>;
}

/// Provider binding and supporting-type configuration common to both strategies.
pub(crate) struct StrategyCore {
    source: Arc<dyn MetadataSource>,
    provider: Option<Box<dyn TypeMetadataProvider>>,
    supporting: Vec<Box<dyn SupportingTypesStrategy>>,
    components_found: BTreeSet<ElementId>,
}

impl StrategyCore {
    pub(crate) fn new(source: Arc<dyn MetadataSource>) -> Self {
        StrategyCore {
            source,
            provider: None,
            supporting: vec![Box::new(ReferencedTypesSupportingTypesStrategy::default())],
            components_found: BTreeSet::new(),
        }
    }

    pub(crate) fn set_supporting(&mut self, strategies: Vec<Box<dyn SupportingTypesStrategy>>) {
        self.supporting = strategies;
    }

    pub(crate) fn add_supporting(&mut self, strategy: Box<dyn SupportingTypesStrategy>) {
        self.supporting.push(strategy);
    }

    /// Open a fresh provider for the scope, dropping any previous cache.
    pub(crate) fn bind(&mut self, scope: &DiscoveryScope) -> Result<()> {
        self.provider = Some(self.source.open(&scope.namespace, &scope.exclusions)?);
        self.components_found.clear();
        Ok(())
    }

    pub(crate) fn provider(&self, strategy: &str) -> Result<&dyn TypeMetadataProvider> {
        self.provider
            .as_deref()
            .ok_or_else(|| crate::error::DiscoveryError::ProviderNotBound(strategy.to_string()))
    }

    pub(crate) fn record(&mut self, components: &BTreeSet<ElementId>) {
        self.components_found.extend(components.iter().copied());
    }

    pub(crate) fn components_found(&self) -> &BTreeSet<ElementId> {
        &self.components_found
    }

    /// Attach supporting types, annotate code elements and walk efferent
    /// dependencies for every component this strategy found.
    pub(crate) fn enrich(
        &self,
        strategy: &str,
        scope: &DiscoveryScope,
        session: &mut DiscoverySession<'_>,
    ) -> Result<()> {
        let provider = self.provider(strategy)?;
        for component in &self.components_found {
            attach_supporting_types(provider, &self.supporting, scope, session, *component)?;
            annotate_code_elements(provider, session.model, *component);
        }

        let walker = EfferentDependencyWalker::new(provider, scope.container);
        for component in &self.components_found {
            let starting_types: Vec<String> = session
                .model
                .element(*component)
                .map(|e| e.code_elements.iter().map(|c| c.type_name.clone()).collect())
                .unwrap_or_default();

            let mut visited = HashSet::new();
            let mut created = 0;
            for starting_type in &starting_types {
                created += walker.add_efferent_dependencies(
                    session.model,
                    *component,
                    starting_type,
                    &mut visited,
                    session.diagnostics,
                );
            }
            tracing::debug!(
                "Component {} gained {} efferent dependencies across {} types",
                component,
                created,
                visited.len()
            );
        }
        Ok(())
    }
}

fn attach_supporting_types(
    provider: &dyn TypeMetadataProvider,
    strategies: &[Box<dyn SupportingTypesStrategy>],
    scope: &DiscoveryScope,
    session: &mut DiscoverySession<'_>,
    component: ElementId,
) -> Result<()> {
    let Some(element) = session.model.element(component) else {
        return Ok(());
    };
    let candidates: BTreeSet<String> = strategies
        .iter()
        .flat_map(|s| s.find_supporting_types(element, provider))
        .collect();
    let context = element.name.clone();

    for type_name in candidates {
        if scope.exclusions.is_excluded(&type_name) || !provider.in_scope(&type_name) {
            continue;
        }
        if provider.get_type(&type_name).is_none() {
            session
                .diagnostics
                .report(DiagnosticKind::UnresolvedType, &type_name, &context);
            continue;
        }
        if session.model.add_supporting_type(component, &type_name)?.is_none() {
            tracing::debug!("{} already belongs to another component; not attaching to {}", type_name, context);
        }
    }
    Ok(())
}

/// Fill in visibility, category and size for every code element of a
/// component. When the primary type has a size, the component's size is the
/// total over its code elements.
fn annotate_code_elements(
    provider: &dyn TypeMetadataProvider,
    model: &mut ArchitectureModel,
    component: ElementId,
) {
    let Some(element) = model.element_mut(component) else {
        return;
    };
    let mut total: Option<u64> = None;
    let mut primary_sized = false;
    for code in element.code_elements.iter_mut() {
        let Some(definition) = provider.get_type(&code.type_name) else {
            continue;
        };
        code.visibility = provider.find_visibility(&code.type_name);
        code.category = Some(
            provider
                .find_category(&code.type_name)
                .unwrap_or(trellis_core::TypeCategory::Class),
        );
        code.size = definition.size;
        if let Some(size) = code.size {
            primary_sized |= code.is_primary();
            total = Some(total.unwrap_or(0) + size);
        }
    }
    element.size = if primary_sized { total } else { None };
}
