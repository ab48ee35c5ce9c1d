//! Finds components with a list of type matchers

use super::{ComponentFinderStrategy, DiscoveryScope, DiscoverySession, StrategyCore};
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::matcher::TypeMatcher;
use crate::metadata::MetadataSource;
use crate::supporting::SupportingTypesStrategy;
use std::collections::BTreeSet;
use std::sync::Arc;
use trellis_core::ElementId;

const NAME: &str = "type-matcher";

/// Every in-scope type is offered to every matcher; each match asks the model
/// for a component, so a type matched twice still yields one component.
pub struct TypeMatcherComponentFinderStrategy {
    core: StrategyCore,
    matchers: Vec<Box<dyn TypeMatcher>>,
}

impl TypeMatcherComponentFinderStrategy {
    pub fn new(source: Arc<dyn MetadataSource>, matchers: Vec<Box<dyn TypeMatcher>>) -> Self {
        TypeMatcherComponentFinderStrategy {
            core: StrategyCore::new(source),
            matchers,
        }
    }

    /// Replace the default supporting-types strategy.
    pub fn with_supporting_types(mut self, strategies: Vec<Box<dyn SupportingTypesStrategy>>) -> Self {
        self.core.set_supporting(strategies);
        self
    }

    pub fn add_supporting_types_strategy(&mut self, strategy: Box<dyn SupportingTypesStrategy>) {
        self.core.add_supporting(strategy);
    }
}

impl ComponentFinderStrategy for TypeMatcherComponentFinderStrategy {
    fn name(&self) -> &str {
        NAME
    }

    fn before_find_components(&mut self, scope: &DiscoveryScope) -> Result<()> {
        self.core.bind(scope)
    }

    fn find_components(
        &mut self,
        scope: &DiscoveryScope,
        session: &mut DiscoverySession<'_>,
    ) -> Result<BTreeSet<ElementId>> {
        let provider = self.core.provider(NAME)?;
        let mut found = BTreeSet::new();

        for definition in provider.all_types() {
            for matcher in &self.matchers {
                if !matcher.matches(definition, provider) {
                    continue;
                }
                match session.model.add_component(
                    scope.container,
                    "",
                    &definition.name,
                    matcher.description(),
                    matcher.technology(),
                ) {
                    Ok(id) => {
                        found.insert(id);
                    }
                    Err(e) => session.diagnostics.report(
                        DiagnosticKind::RejectedByModel,
                        &e.to_string(),
                        &definition.name,
                    ),
                }
            }
        }

        tracing::info!("{} strategy found {} components", NAME, found.len());
        self.core.record(&found);
        Ok(found)
    }

    fn after_find_components(
        &mut self,
        scope: &DiscoveryScope,
        session: &mut DiscoverySession<'_>,
    ) -> Result<()> {
        self.core.enrich(NAME, scope, session)
    }
}
