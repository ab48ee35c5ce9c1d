//! Finds components, code elements and relationships declared with markers

use super::{ComponentFinderStrategy, DiscoveryScope, DiscoverySession, StrategyCore};
use crate::diagnostics::DiagnosticKind;
use crate::error::Result;
use crate::markers;
use crate::metadata::{Marker, MetadataSource, TypeMetadataProvider, type_names};
use crate::supporting::SupportingTypesStrategy;
use std::collections::BTreeSet;
use std::sync::Arc;
use trellis_core::{ArchitectureModel, ElementId, ElementKind};

const NAME: &str = "markers";

/// Discovery driven by the `Trellis.Annotations` markers (see [`crate::markers`]).
pub struct MarkerComponentFinderStrategy {
    core: StrategyCore,
}

impl MarkerComponentFinderStrategy {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        MarkerComponentFinderStrategy {
            core: StrategyCore::new(source),
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

impl ComponentFinderStrategy for MarkerComponentFinderStrategy {
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
        let component_marker = markers::identity(markers::COMPONENT);
        let code_element_marker = markers::identity(markers::CODE_ELEMENT);
        let mut found = BTreeSet::new();

        for definition in provider.all_types() {
            for marker in provider.declared_markers(&definition.name, &component_marker) {
                match session.model.add_component(
                    scope.container,
                    marker.text("name"),
                    &definition.name,
                    marker.text("description"),
                    marker.text("technology"),
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

        // Code elements may name components declared anywhere in the scope,
        // so they are resolved only once every component marker has been seen.
        for definition in provider.all_types() {
            for marker in provider.declared_markers(&definition.name, &code_element_marker) {
                let target = marker.text("component");
                let owner = session
                    .model
                    .component_of_type(scope.container, type_names::strip_qualifier(target))
                    .or_else(|| session.model.component_with_name(scope.container, target));

                let Some(owner) = owner else {
                    let names = component_names(session.model, scope.container);
                    session.diagnostics.report_with_candidates(
                        DiagnosticKind::MissingComponent,
                        target,
                        &definition.name,
                        names.iter().map(String::as_str),
                    );
                    continue;
                };

                match session.model.add_supporting_type(owner, &definition.name)? {
                    Some(code) => {
                        if let Some(description) = marker.argument("description") {
                            code.description = Some(description.to_string());
                        }
                    }
                    None => tracing::debug!(
                        "{} already belongs to another component; ignoring its code element marker",
                        definition.name
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
        self.core.enrich(NAME, scope, session)?;

        // Relationship markers are honored on every component in the container,
        // including those other strategies found.
        let provider = self.core.provider(NAME)?;
        for component in session.model.components_of(scope.container) {
            let types: Vec<String> = session
                .model
                .element(component)
                .map(|e| e.code_elements.iter().map(|c| c.type_name.clone()).collect())
                .unwrap_or_default();
            for type_name in &types {
                add_declared_relationships(provider, scope, session, component, type_name);
            }
        }
        Ok(())
    }
}

/// Translate the relationship markers on one code element of `component`.
fn add_declared_relationships(
    provider: &dyn TypeMetadataProvider,
    scope: &DiscoveryScope,
    session: &mut DiscoverySession<'_>,
    component: ElementId,
    type_name: &str,
) {
    for annotated in provider.annotated_members(type_name, &markers::identity(markers::USES_COMPONENT)) {
        let destination = type_names::decompose(&annotated.member.type_name)
            .iter()
            .find_map(|t| session.model.component_of_type(scope.container, t));
        match destination {
            Some(destination) => {
                apply_relationship(session.model, component, destination, annotated.marker)
            }
            None => {
                let names = component_names(session.model, scope.container);
                session.diagnostics.report_with_candidates(
                    DiagnosticKind::MissingComponent,
                    &annotated.member.type_name,
                    &format!("{}.{}", type_name, annotated.member.name),
                    names.iter().map(String::as_str),
                );
            }
        }
    }

    for (marker_name, kind) in [
        (markers::USES_CONTAINER, ElementKind::Container),
        (markers::USES_SOFTWARE_SYSTEM, ElementKind::SoftwareSystem),
    ] {
        let identity = markers::identity(marker_name);
        let on_members = provider
            .annotated_members(type_name, &identity)
            .into_iter()
            .map(|annotated| annotated.marker);
        let on_type = provider.declared_markers(type_name, &identity).into_iter();

        for marker in on_type.chain(on_members) {
            if let Some(destination) = resolve_element(session, scope, kind, marker, type_name) {
                apply_relationship(session.model, component, destination, marker);
            }
        }
    }

    for (marker_name, kind) in [
        (markers::USED_BY_CONTAINER, ElementKind::Container),
        (markers::USED_BY_PERSON, ElementKind::Person),
        (markers::USED_BY_SOFTWARE_SYSTEM, ElementKind::SoftwareSystem),
    ] {
        for marker in provider.declared_markers(type_name, &markers::identity(marker_name)) {
            if let Some(source) = resolve_element(session, scope, kind, marker, type_name) {
                apply_relationship(session.model, source, component, marker);
            }
        }
    }
}

/// Create the edge, or describe an existing undescribed one. Edges that
/// already carry a description are left as they are.
fn apply_relationship(
    model: &mut ArchitectureModel,
    source: ElementId,
    destination: ElementId,
    marker: &Marker,
) {
    let description = marker.text("description");
    let technology = marker.text("technology");

    match model.relationship_between(source, destination).map(|r| (r.id, r.description.is_empty())) {
        Some((id, true)) => {
            if let Err(e) = model.modify_relationship(id, description, technology) {
                tracing::warn!("Could not describe relationship {:?}: {}", id, e);
            }
        }
        Some((_, false)) => {
            tracing::debug!("Relationship {} -> {} already described", source, destination);
        }
        None => {
            model.uses(source, destination, description, technology);
        }
    }
}

/// Resolve the element a marker's `name` argument points at: by name (within
/// the scanned container's software system for containers), then by canonical
/// name, then by element id.
fn resolve_element(
    session: &mut DiscoverySession<'_>,
    scope: &DiscoveryScope,
    kind: ElementKind,
    marker: &Marker,
    context: &str,
) -> Option<ElementId> {
    let name = marker.text("name");
    let model = &*session.model;
    let parent = match kind {
        ElementKind::Container => model.element(scope.container).and_then(|c| c.parent),
        _ => None,
    };
    let of_kind = |id: ElementId| model.element(id).is_some_and(|e| e.kind == kind);

    let resolved = model
        .find_by_name(kind, parent, name)
        .or_else(|| model.find_by_canonical_name(name).filter(|id| of_kind(*id)))
        .or_else(|| model.parse_element_id(name).filter(|id| of_kind(*id)));
    if resolved.is_some() {
        return resolved;
    }

    let candidates: Vec<String> = model
        .elements_of_kind(kind)
        .map(|e| e.name.clone())
        .collect();
    let diagnostic = match kind {
        ElementKind::Container => DiagnosticKind::MissingContainer,
        ElementKind::Person => DiagnosticKind::MissingPerson,
        ElementKind::SoftwareSystem => DiagnosticKind::MissingSoftwareSystem,
        ElementKind::Component => DiagnosticKind::MissingComponent,
    };
    session.diagnostics.report_with_candidates(
        diagnostic,
        name,
        context,
        candidates.iter().map(String::as_str),
    );
    None
}

fn component_names(model: &ArchitectureModel, container: ElementId) -> Vec<String> {
    model
        .children(container)
        .filter(|e| e.kind == ElementKind::Component)
        .map(|e| e.name.clone())
        .collect()
}
