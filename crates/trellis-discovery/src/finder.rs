//! Component finder: runs strategies through their three phases

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{DiscoveryError, Result};
use crate::exclusion::{ExclusionRule, ExclusionRules};
use crate::strategy::{ComponentFinderStrategy, DiscoveryScope, DiscoverySession};
use std::collections::BTreeSet;
use trellis_core::{ArchitectureModel, ElementId, ElementKind};

/// Result of a discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutcome {
    /// Every component returned by any strategy's find phase.
    pub components: BTreeSet<ElementId>,
    /// Problems that were logged and skipped.
    pub diagnostics: Vec<Diagnostic>,
}

/// Populates one container with the components found in a namespace.
///
/// Strategies run strictly in the order given. Deduplication across
/// strategies is left to [`ArchitectureModel::add_component`], which returns
/// the existing component for a type it has seen before.
pub struct ComponentFinder {
    scope: DiscoveryScope,
    strategies: Vec<Box<dyn ComponentFinderStrategy>>,
}

impl std::fmt::Debug for ComponentFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentFinder")
            .field("container", &self.scope.container)
            .field("namespace", &self.scope.namespace)
            .field("exclusions", &self.scope.exclusions.len())
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl ComponentFinder {
    /// Fails when the namespace is blank or no strategies are given. The
    /// container itself is checked against the model when discovery runs.
    pub fn new(
        container: ElementId,
        namespace: impl Into<String>,
        strategies: Vec<Box<dyn ComponentFinderStrategy>>,
    ) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(DiscoveryError::BlankNamespace);
        }
        if strategies.is_empty() {
            return Err(DiscoveryError::NoStrategies);
        }
        Ok(ComponentFinder {
            scope: DiscoveryScope {
                container,
                namespace: namespace.trim().to_string(),
                exclusions: ExclusionRules::default(),
            },
            strategies,
        })
    }

    pub fn container(&self) -> ElementId {
        self.scope.container
    }

    pub fn namespace(&self) -> &str {
        &self.scope.namespace
    }

    pub fn exclusions(&self) -> &ExclusionRules {
        &self.scope.exclusions
    }

    pub fn add_exclusion(&mut self, rule: ExclusionRule) -> &mut Self {
        self.scope.exclusions.add(rule);
        self
    }

    /// Exclude types whose full name matches a regular expression.
    pub fn exclude(&mut self, pattern: &str) -> Result<&mut Self> {
        Ok(self.add_exclusion(ExclusionRule::regex(pattern)?))
    }

    /// Exclude types whose full name matches a glob such as `App.Tests.*`.
    pub fn exclude_glob(&mut self, pattern: &str) -> Result<&mut Self> {
        Ok(self.add_exclusion(ExclusionRule::glob(pattern)?))
    }

    /// Run every strategy's before, find and after phases, in that order.
    #[tracing::instrument(skip_all, fields(namespace = %self.scope.namespace))]
    pub fn find_components(&mut self, model: &mut ArchitectureModel) -> Result<DiscoveryOutcome> {
        match model.element(self.scope.container) {
            Some(element) if element.kind == ElementKind::Container => {}
            _ => return Err(DiscoveryError::ContainerNotFound(self.scope.container)),
        }

        let mut diagnostics = Diagnostics::new();
        let mut session = DiscoverySession {
            model,
            diagnostics: &mut diagnostics,
        };

        for strategy in self.strategies.iter_mut() {
            tracing::debug!("Preparing strategy {}", strategy.name());
            strategy.before_find_components(&self.scope)?;
        }

        let mut components = BTreeSet::new();
        for strategy in self.strategies.iter_mut() {
            let found = strategy.find_components(&self.scope, &mut session)?;
            tracing::debug!("Strategy {} returned {} components", strategy.name(), found.len());
            components.extend(found);
        }

        for strategy in self.strategies.iter_mut() {
            strategy.after_find_components(&self.scope, &mut session)?;
        }

        tracing::info!(
            "Found {} components and {} relationships ({} diagnostics)",
            components.len(),
            session.model.relationship_count(),
            session.diagnostics.len()
        );

        Ok(DiscoveryOutcome {
            components,
            diagnostics: diagnostics.into_vec(),
        })
    }
}
