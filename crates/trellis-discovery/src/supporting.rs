//! Supporting-types strategies: which types make up a component's implementation

use crate::metadata::TypeMetadataProvider;
use std::collections::BTreeSet;
use trellis_core::{Element, split_type_name};

/// Finds the auxiliary types that belong to a component.
pub trait SupportingTypesStrategy {
    fn find_supporting_types(
        &self,
        component: &Element,
        provider: &dyn TypeMetadataProvider,
    ) -> BTreeSet<String>;
}

/// In-scope types referenced by the component's primary type and its current
/// code elements. With `include_indirect`, the search repeats over each newly
/// found batch until nothing new turns up.
#[derive(Debug, Clone, Default)]
pub struct ReferencedTypesSupportingTypesStrategy {
    include_indirect: bool,
}

impl ReferencedTypesSupportingTypesStrategy {
    pub fn new(include_indirect: bool) -> Self {
        ReferencedTypesSupportingTypesStrategy { include_indirect }
    }
}

impl SupportingTypesStrategy for ReferencedTypesSupportingTypesStrategy {
    fn find_supporting_types(
        &self,
        component: &Element,
        provider: &dyn TypeMetadataProvider,
    ) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut frontier: Vec<String> = component
            .code_elements
            .iter()
            .map(|c| c.type_name.clone())
            .collect();

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for type_name in &frontier {
                for referenced in provider.referenced_types(type_name).iter() {
                    if !provider.in_scope(referenced)
                        || component.has_code_element(referenced)
                        || provider.get_type(referenced).is_none()
                    {
                        continue;
                    }
                    if found.insert(referenced.clone()) {
                        next.push(referenced.clone());
                    }
                }
            }
            if !self.include_indirect {
                break;
            }
            frontier = next;
        }

        tracing::debug!(
            "{} supporting types referenced from component {}",
            found.len(),
            component.name
        );
        found
    }
}

/// Every in-scope type declared in the same namespace as the component's primary type.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSupportingTypesStrategy;

impl SupportingTypesStrategy for NamespaceSupportingTypesStrategy {
    fn find_supporting_types(
        &self,
        component: &Element,
        provider: &dyn TypeMetadataProvider,
    ) -> BTreeSet<String> {
        let Some(primary) = component.primary_type() else {
            return BTreeSet::new();
        };
        let namespace = split_type_name(primary).0;

        provider
            .all_types()
            .into_iter()
            .filter(|t| t.name != primary && split_type_name(&t.name).0 == namespace)
            .map(|t| t.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionRules;
    use crate::metadata::TypeCatalog;
    use crate::test_utils::{type_def, with_fields};
    use trellis_core::ArchitectureModel;

    fn chain_catalog() -> TypeCatalog {
        TypeCatalog::from_definitions([
            with_fields(type_def("App.Orders.OrderService"), &["App.Orders.OrderValidator", "Lib.Json"]),
            with_fields(type_def("App.Orders.OrderValidator"), &["App.Orders.Rules", "System.String"]),
            with_fields(type_def("App.Orders.Rules"), &["App.Orders.OrderService"]),
            type_def("App.Billing.Invoice"),
            type_def("App.Orders.Unrelated"),
            type_def("Lib.Json"),
        ])
    }

    fn component(type_name: &str) -> (ArchitectureModel, trellis_core::ElementId) {
        let mut model = ArchitectureModel::new();
        let system = model.add_software_system("Shop", "").unwrap();
        let web = model.add_container(system, "Web", "", "").unwrap();
        let id = model.add_component(web, "", type_name, "", "").unwrap();
        (model, id)
    }

    #[test]
    fn test_direct_references_only() {
        let catalog = chain_catalog();
        let index = catalog.index("App", &ExclusionRules::default());
        let (model, id) = component("App.Orders.OrderService");

        let found = ReferencedTypesSupportingTypesStrategy::new(false)
            .find_supporting_types(model.element(id).unwrap(), &index);

        assert_eq!(found, BTreeSet::from(["App.Orders.OrderValidator".to_string()]));
    }

    #[test]
    fn test_indirect_references_reach_fixed_point() {
        let catalog = chain_catalog();
        let index = catalog.index("App", &ExclusionRules::default());
        let (model, id) = component("App.Orders.OrderService");

        let found = ReferencedTypesSupportingTypesStrategy::new(true)
            .find_supporting_types(model.element(id).unwrap(), &index);

        assert_eq!(
            found,
            BTreeSet::from([
                "App.Orders.OrderValidator".to_string(),
                "App.Orders.Rules".to_string(),
            ])
        );
    }

    #[test]
    fn test_namespace_strategy() {
        let catalog = chain_catalog();
        let index = catalog.index("App", &ExclusionRules::default());
        let (model, id) = component("App.Orders.OrderService");

        let found = NamespaceSupportingTypesStrategy.find_supporting_types(model.element(id).unwrap(), &index);

        assert_eq!(found.len(), 3);
        assert!(found.contains("App.Orders.Unrelated"));
        assert!(!found.contains("App.Billing.Invoice"));
        assert!(!found.contains("App.Orders.OrderService"));
    }
}
