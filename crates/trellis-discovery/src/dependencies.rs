//! Efferent dependency walking: type references become component "uses" edges

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::metadata::TypeMetadataProvider;
use std::collections::HashSet;
use trellis_core::{ArchitectureModel, ElementId};

/// Follows type references outward from a component's types until they land
/// on the primary type of another component in the same container.
pub struct EfferentDependencyWalker<'a> {
    provider: &'a dyn TypeMetadataProvider,
    container: ElementId,
}

impl<'a> EfferentDependencyWalker<'a> {
    pub fn new(provider: &'a dyn TypeMetadataProvider, container: ElementId) -> Self {
        EfferentDependencyWalker {
            provider,
            container,
        }
    }

    /// Walk from `starting_type`, adding a "uses" edge from `component` to every
    /// component reachable through non-component types.
    ///
    /// `visited` is shared between calls for the same component so that types
    /// already walked from another starting point are not walked again.
    /// Returns the number of relationships created.
    pub fn add_efferent_dependencies(
        &self,
        model: &mut ArchitectureModel,
        component: ElementId,
        starting_type: &str,
        visited: &mut HashSet<String>,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        if !visited.insert(starting_type.to_string()) {
            return 0;
        }
        let mut created = 0;
        let mut to_visit = vec![starting_type.to_string()];

        while let Some(current) = to_visit.pop() {
            for referenced in self.provider.referenced_types(&current).iter() {
                if let Some(destination) = model.component_of_type(self.container, referenced) {
                    if destination != component && model.uses(component, destination, "", "").is_some() {
                        tracing::debug!("{} uses {} (via {})", starting_type, referenced, current);
                        created += 1;
                    }
                    continue;
                }

                if visited.contains(referenced) {
                    continue;
                }
                visited.insert(referenced.clone());

                if self.provider.get_type(referenced).is_none() {
                    if self.provider.in_scope(referenced) {
                        diagnostics.report(DiagnosticKind::UnresolvedType, referenced, &current);
                    } else {
                        tracing::debug!("Skipping {}: no metadata outside scope", referenced);
                    }
                    continue;
                }
                to_visit.push(referenced.clone());
            }
        }
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionRules;
    use crate::metadata::TypeCatalog;
    use crate::test_utils::{type_def, with_fields};

    fn model_with(types: &[&str]) -> (ArchitectureModel, ElementId, Vec<ElementId>) {
        let mut model = ArchitectureModel::new();
        let system = model.add_software_system("Shop", "").unwrap();
        let web = model.add_container(system, "Web", "", "").unwrap();
        let ids = types
            .iter()
            .map(|t| model.add_component(web, "", t, "", "").unwrap())
            .collect();
        (model, web, ids)
    }

    #[test]
    fn test_cycle_terminates_without_self_edge() {
        let catalog = TypeCatalog::from_definitions([
            with_fields(type_def("App.A"), &["App.B"]),
            with_fields(type_def("App.B"), &["App.C"]),
            with_fields(type_def("App.C"), &["App.A"]),
        ]);
        let index = catalog.index("App", &ExclusionRules::default());
        let (mut model, web, ids) = model_with(&["App.A"]);
        let mut diagnostics = Diagnostics::new();

        let created = EfferentDependencyWalker::new(&index, web).add_efferent_dependencies(
            &mut model,
            ids[0],
            "App.A",
            &mut HashSet::new(),
            &mut diagnostics,
        );

        assert_eq!(created, 0);
        assert_eq!(model.relationship_count(), 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_walks_through_plain_types() {
        let catalog = TypeCatalog::from_definitions([
            with_fields(type_def("App.X"), &["App.M"]),
            with_fields(type_def("App.M"), &["App.N", "App.M"]),
            with_fields(type_def("App.N"), &["App.Y", "App.M"]),
            type_def("App.Y"),
        ]);
        let index = catalog.index("App", &ExclusionRules::default());
        let (mut model, web, ids) = model_with(&["App.X", "App.Y"]);
        let mut diagnostics = Diagnostics::new();

        let walker = EfferentDependencyWalker::new(&index, web);
        let mut visited = HashSet::new();
        let created =
            walker.add_efferent_dependencies(&mut model, ids[0], "App.X", &mut visited, &mut diagnostics);

        assert_eq!(created, 1);
        assert!(model.relationship_between(ids[0], ids[1]).is_some());
        assert!(model.relationship_between(ids[1], ids[0]).is_none());
        assert!(visited.contains("App.N"));
        assert!(!visited.contains("App.Y"));

        // Walking again finds the existing edge and creates nothing new.
        let again =
            walker.add_efferent_dependencies(&mut model, ids[0], "App.X", &mut HashSet::new(), &mut diagnostics);
        assert_eq!(again, 0);
        assert_eq!(model.relationship_count(), 1);
    }

    #[test]
    fn test_visited_start_is_not_walked_again() {
        let catalog = TypeCatalog::from_definitions([
            with_fields(type_def("App.X"), &["App.M"]),
            with_fields(type_def("App.M"), &["App.Y"]),
            type_def("App.Y"),
        ]);
        let index = catalog.index("App", &ExclusionRules::default());
        let (mut model, web, ids) = model_with(&["App.X", "App.Y"]);
        let mut diagnostics = Diagnostics::new();
        let mut visited: HashSet<String> = ["App.M".to_string()].into_iter().collect();

        let created = EfferentDependencyWalker::new(&index, web).add_efferent_dependencies(
            &mut model,
            ids[0],
            "App.M",
            &mut visited,
            &mut diagnostics,
        );

        assert_eq!(created, 0);
        assert_eq!(index.cached_reference_count(), 0);
        assert_eq!(model.relationship_count(), 0);
    }

    #[test]
    fn test_excluded_and_unknown_types() {
        let catalog = TypeCatalog::from_definitions([
            with_fields(type_def("App.X"), &["App.Internal.Y", "App.Ghost", "Vendor.Lib"]),
            type_def("App.Internal.Y"),
        ]);
        let mut rules = ExclusionRules::default();
        rules.add(crate::exclusion::ExclusionRule::glob("App.Internal.*").unwrap());
        let index = catalog.index("App", &rules);
        let (mut model, web, ids) = model_with(&["App.X", "App.Internal.Y"]);
        let mut diagnostics = Diagnostics::new();

        EfferentDependencyWalker::new(&index, web).add_efferent_dependencies(
            &mut model,
            ids[0],
            "App.X",
            &mut HashSet::new(),
            &mut diagnostics,
        );

        assert_eq!(model.relationship_count(), 0);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].kind, DiagnosticKind::UnresolvedType);
        assert_eq!(diagnostics.entries()[0].missing, "App.Ghost");
    }
}
