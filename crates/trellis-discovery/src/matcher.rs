//! Type matchers: "does this type represent a component?"

use crate::error::{DiscoveryError, Result};
use crate::metadata::{MarkerIdentity, TypeDefinition, TypeMetadataProvider, type_names};
use std::collections::HashSet;

/// Decides whether a type is a component, and how to label it when it is.
pub trait TypeMatcher {
    fn matches(&self, definition: &TypeDefinition, provider: &dyn TypeMetadataProvider) -> bool;

    fn description(&self) -> &str;

    fn technology(&self) -> &str;
}

/// Description and technology shared by every matcher variant.
#[derive(Debug, Clone, Default)]
struct Labels {
    description: String,
    technology: String,
}

impl Labels {
    fn new(description: &str, technology: &str) -> Self {
        Labels {
            description: description.to_string(),
            technology: technology.to_string(),
        }
    }
}

fn require_target(target: &str, matcher: &'static str) -> Result<()> {
    if target.trim().is_empty() {
        return Err(DiscoveryError::BlankMatcherTarget(matcher));
    }
    Ok(())
}

/// Matches types carrying a specific marker, compared by identity (name and origin).
#[derive(Debug, Clone)]
pub struct CustomMarkerTypeMatcher {
    marker: MarkerIdentity,
    labels: Labels,
}

impl CustomMarkerTypeMatcher {
    pub fn new(marker: MarkerIdentity, description: &str, technology: &str) -> Result<Self> {
        require_target(&marker.name, "custom marker")?;
        Ok(CustomMarkerTypeMatcher {
            marker,
            labels: Labels::new(description, technology),
        })
    }
}

impl TypeMatcher for CustomMarkerTypeMatcher {
    fn matches(&self, definition: &TypeDefinition, provider: &dyn TypeMetadataProvider) -> bool {
        !provider
            .declared_markers(&definition.name, &self.marker)
            .is_empty()
    }

    fn description(&self) -> &str {
        &self.labels.description
    }

    fn technology(&self) -> &str {
        &self.labels.technology
    }
}

/// Matches transitive subtypes of a class, at any depth.
#[derive(Debug, Clone)]
pub struct ExtendsClassTypeMatcher {
    class_name: String,
    labels: Labels,
}

impl ExtendsClassTypeMatcher {
    pub fn new(class_name: &str, description: &str, technology: &str) -> Result<Self> {
        require_target(class_name, "extends class")?;
        Ok(ExtendsClassTypeMatcher {
            class_name: type_names::strip_qualifier(class_name).to_string(),
            labels: Labels::new(description, technology),
        })
    }
}

impl TypeMatcher for ExtendsClassTypeMatcher {
    fn matches(&self, definition: &TypeDefinition, provider: &dyn TypeMetadataProvider) -> bool {
        let mut seen = HashSet::new();
        let mut base = definition.base_type.clone();
        while let Some(name) = base {
            let name = type_names::head(&name).to_string();
            if name == self.class_name {
                return true;
            }
            if !seen.insert(name.clone()) {
                tracing::debug!("Inheritance cycle through {} while matching {}", name, definition.name);
                return false;
            }
            base = provider.get_type(&name).and_then(|t| t.base_type.clone());
        }
        false
    }

    fn description(&self) -> &str {
        &self.labels.description
    }

    fn technology(&self) -> &str {
        &self.labels.technology
    }
}

/// Matches types implementing an interface directly, through other
/// interfaces, or through a base class.
#[derive(Debug, Clone)]
pub struct ImplementsInterfaceTypeMatcher {
    interface_name: String,
    labels: Labels,
}

impl ImplementsInterfaceTypeMatcher {
    pub fn new(interface_name: &str, description: &str, technology: &str) -> Result<Self> {
        require_target(interface_name, "implements interface")?;
        Ok(ImplementsInterfaceTypeMatcher {
            interface_name: type_names::strip_qualifier(interface_name).to_string(),
            labels: Labels::new(description, technology),
        })
    }
}

impl TypeMatcher for ImplementsInterfaceTypeMatcher {
    fn matches(&self, definition: &TypeDefinition, provider: &dyn TypeMetadataProvider) -> bool {
        // The type itself only counts through what it implements.
        let mut seen: HashSet<String> = HashSet::from([definition.name.clone()]);
        let mut to_visit: Vec<String> = definition
            .interfaces
            .iter()
            .chain(definition.base_type.iter())
            .cloned()
            .collect();

        while let Some(current) = to_visit.pop() {
            let current = type_names::head(&current).to_string();
            if current == self.interface_name {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(parent) = provider.get_type(&current) {
                to_visit.extend(parent.interfaces.iter().cloned());
                to_visit.extend(parent.base_type.iter().cloned());
            }
        }
        false
    }

    fn description(&self) -> &str {
        &self.labels.description
    }

    fn technology(&self) -> &str {
        &self.labels.technology
    }
}

/// Matches types whose simple name ends with a case-sensitive suffix.
#[derive(Debug, Clone)]
pub struct NameSuffixTypeMatcher {
    suffix: String,
    labels: Labels,
}

impl NameSuffixTypeMatcher {
    pub fn new(suffix: &str, description: &str, technology: &str) -> Result<Self> {
        require_target(suffix, "name suffix")?;
        Ok(NameSuffixTypeMatcher {
            suffix: suffix.to_string(),
            labels: Labels::new(description, technology),
        })
    }
}

impl TypeMatcher for NameSuffixTypeMatcher {
    fn matches(&self, definition: &TypeDefinition, _provider: &dyn TypeMetadataProvider) -> bool {
        type_names::head(definition.simple_name()).ends_with(&self.suffix)
    }

    fn description(&self) -> &str {
        &self.labels.description
    }

    fn technology(&self) -> &str {
        &self.labels.technology
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionRules;
    use crate::metadata::TypeCatalog;
    use crate::test_utils::{marker, type_def};

    fn hierarchy() -> TypeCatalog {
        let mut base = type_def("App.BaseController");
        base.base_type = Some("App.ControllerRoot".to_string());
        let mut root = type_def("App.ControllerRoot");
        root.interfaces = vec!["App.IController".to_string()];
        let mut orders = type_def("App.OrderController");
        orders.base_type = Some("App.BaseController".to_string());
        let mut repo = type_def("App.OrderRepository");
        repo.interfaces = vec!["App.IOrderRepository".to_string()];
        let mut repo_iface = type_def("App.IOrderRepository");
        repo_iface.interfaces = vec!["App.IRepository<App.Order>".to_string()];
        let mut looping = type_def("App.Loop");
        looping.base_type = Some("App.Loop2".to_string());
        let mut looping2 = type_def("App.Loop2");
        looping2.base_type = Some("App.Loop".to_string());

        TypeCatalog::from_definitions([base, root, orders, repo, repo_iface, looping, looping2])
    }

    #[test]
    fn test_extends_class_at_any_depth() {
        let catalog = hierarchy();
        let index = catalog.index("App", &ExclusionRules::default());
        let matcher = ExtendsClassTypeMatcher::new("App.ControllerRoot", "", "").unwrap();

        assert!(matcher.matches(index.get_type("App.OrderController").unwrap(), &index));
        assert!(matcher.matches(index.get_type("App.BaseController").unwrap(), &index));
        assert!(!matcher.matches(index.get_type("App.ControllerRoot").unwrap(), &index));
        assert!(!matcher.matches(index.get_type("App.Loop").unwrap(), &index));
    }

    #[test]
    fn test_implements_interface_through_intermediates() {
        let catalog = hierarchy();
        let index = catalog.index("App", &ExclusionRules::default());

        let controller = ImplementsInterfaceTypeMatcher::new("App.IController", "", "").unwrap();
        assert!(controller.matches(index.get_type("App.OrderController").unwrap(), &index));
        assert!(!controller.matches(index.get_type("App.OrderRepository").unwrap(), &index));

        let repository = ImplementsInterfaceTypeMatcher::new("App.IRepository", "", "").unwrap();
        assert!(repository.matches(index.get_type("App.OrderRepository").unwrap(), &index));

        let own = ImplementsInterfaceTypeMatcher::new("App.IOrderRepository", "", "").unwrap();
        assert!(!own.matches(index.get_type("App.IOrderRepository").unwrap(), &index));
    }

    #[test]
    fn test_custom_marker_matches_by_identity() {
        let mut tagged = type_def("App.Billing");
        tagged.markers.push(marker("Acme.ServiceAttribute", Some("Acme.Core"), &[]));
        let mut impostor = type_def("App.Shipping");
        impostor.markers.push(marker("Acme.ServiceAttribute", Some("Other.Lib"), &[]));
        let catalog = TypeCatalog::from_definitions([tagged, impostor]);
        let index = catalog.index("App", &ExclusionRules::default());

        let matcher = CustomMarkerTypeMatcher::new(
            MarkerIdentity::new("Acme.ServiceAttribute", Some("Acme.Core")),
            "Service",
            "",
        )
        .unwrap();

        assert!(matcher.matches(index.get_type("App.Billing").unwrap(), &index));
        assert!(!matcher.matches(index.get_type("App.Shipping").unwrap(), &index));
        assert_eq!(matcher.description(), "Service");
    }

    #[test]
    fn test_name_suffix_is_case_sensitive() {
        let catalog = TypeCatalog::from_definitions([
            type_def("App.UserRepository"),
            type_def("App.Userrepository"),
            type_def("App.Box<App.Repository>"),
        ]);
        let index = catalog.index("App", &ExclusionRules::default());
        let matcher = NameSuffixTypeMatcher::new("Repository", "", "").unwrap();

        assert!(matcher.matches(index.get_type("App.UserRepository").unwrap(), &index));
        assert!(!matcher.matches(index.get_type("App.Userrepository").unwrap(), &index));
        assert!(!matcher.matches(index.get_type("App.Box<App.Repository>").unwrap(), &index));
    }

    #[test]
    fn test_blank_targets_fail_fast() {
        assert!(matches!(
            NameSuffixTypeMatcher::new("  ", "", ""),
            Err(DiscoveryError::BlankMatcherTarget("name suffix"))
        ));
        assert!(ExtendsClassTypeMatcher::new("", "", "").is_err());
        assert!(ImplementsInterfaceTypeMatcher::new("", "", "").is_err());
        assert!(CustomMarkerTypeMatcher::new(MarkerIdentity::new("", None), "", "").is_err());
    }
}
