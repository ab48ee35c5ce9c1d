//! Serializable summary of a discovery run

use crate::graph::ArchitectureModel;
use crate::model::{CodeElementRole, ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeElementReport {
    pub type_name: String,
    pub role: CodeElementRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentReport {
    pub name: String,
    pub canonical_name: String,
    pub primary_type: String,
    pub description: String,
    pub technology: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub code_elements: Vec<CodeElementReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipReport {
    pub source: String,
    pub destination: String,
    pub description: String,
    pub technology: String,
}

/// Components and relationships discovered for one container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryReport {
    pub generated_at: String,
    pub namespace: String,
    pub container: String,
    pub component_count: usize,
    pub relationship_count: usize,
    pub components: Vec<ComponentReport>,
    pub relationships: Vec<RelationshipReport>,
    pub diagnostics: Vec<String>,
}

impl DiscoveryReport {
    /// Snapshot the components of `container` and every relationship touching them.
    pub fn from_model(
        model: &ArchitectureModel,
        container: ElementId,
        namespace: &str,
        diagnostics: Vec<String>,
    ) -> Self {
        let canonical = |id: ElementId| model.canonical_name(id).unwrap_or_else(|| id.to_string());
        let component_ids = model.components_of(container);

        let mut components: Vec<ComponentReport> = component_ids
            .iter()
            .filter_map(|id| model.element(*id))
            .map(|component| ComponentReport {
                name: component.name.clone(),
                canonical_name: canonical(component.id),
                primary_type: component.primary_type().unwrap_or_default().to_string(),
                description: component.description.clone(),
                technology: component.technology.clone(),
                size: component.size,
                code_elements: component
                    .code_elements
                    .iter()
                    .map(|c| CodeElementReport {
                        type_name: c.type_name.clone(),
                        role: c.role,
                        visibility: c.visibility.map(|v| v.as_str().to_string()),
                        category: c.category.map(|k| k.as_str().to_string()),
                        size: c.size,
                    })
                    .collect(),
            })
            .collect();
        components.sort_by(|a, b| a.primary_type.cmp(&b.primary_type));

        let mut relationships: Vec<RelationshipReport> = model
            .relationships()
            .filter(|r| {
                let touches = |id: ElementId| {
                    model
                        .element(id)
                        .is_some_and(|e| e.kind == ElementKind::Component && e.parent == Some(container))
                };
                touches(r.source) || touches(r.destination)
            })
            .map(|r| RelationshipReport {
                source: canonical(r.source),
                destination: canonical(r.destination),
                description: r.description.clone(),
                technology: r.technology.clone(),
            })
            .collect();
        relationships.sort_by(|a, b| {
            (a.source.as_str(), a.destination.as_str()).cmp(&(b.source.as_str(), b.destination.as_str()))
        });

        DiscoveryReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            namespace: namespace.to_string(),
            container: canonical(container),
            component_count: components.len(),
            relationship_count: relationships.len(),
            components,
            relationships,
            diagnostics,
        }
    }

    /// Human-readable rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} (namespace {})", self.container, self.namespace);
        let _ = writeln!(
            out,
            "{} components, {} relationships",
            self.component_count, self.relationship_count
        );

        for component in &self.components {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} [{}]", component.name, component.primary_type);
            if !component.description.is_empty() {
                let _ = writeln!(out, "  description: {}", component.description);
            }
            if !component.technology.is_empty() {
                let _ = writeln!(out, "  technology: {}", component.technology);
            }
            for code in component
                .code_elements
                .iter()
                .filter(|c| c.role == CodeElementRole::Supporting)
            {
                let detail: Vec<&str> = [code.visibility.as_deref(), code.category.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect();
                if detail.is_empty() {
                    let _ = writeln!(out, "  + {}", code.type_name);
                } else {
                    let _ = writeln!(out, "  + {} ({})", code.type_name, detail.join(" "));
                }
            }
        }

        if !self.relationships.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "relationships:");
            for r in &self.relationships {
                if r.description.is_empty() {
                    let _ = writeln!(out, "  {} -> {}", r.source, r.destination);
                } else {
                    let _ = writeln!(out, "  {} -> {}: {}", r.source, r.destination, r.description);
                }
            }
        }

        if !self.diagnostics.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "diagnostics:");
            for d in &self.diagnostics {
                let _ = writeln!(out, "  {}", d);
            }
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
