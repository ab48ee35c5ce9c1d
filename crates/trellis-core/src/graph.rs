//! Architecture model backed by petgraph::StableDiGraph with custom ElementId/RelationshipId

use crate::error::{ModelError, Result};
use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// The architecture model: people, software systems, containers and components
/// connected by "uses" relationships. At most one relationship exists per
/// (source, destination) pair.
pub struct ArchitectureModel {
    inner: StableDiGraph<Element, Relationship>,
    /// (container, primary type name) -> component
    primary_types: HashMap<(ElementId, String), ElementId>,
    /// (container, code element type name) -> owning component
    type_owners: HashMap<(ElementId, String), ElementId>,
}

impl std::fmt::Debug for ArchitectureModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchitectureModel")
            .field("element_count", &self.inner.node_count())
            .field("relationship_count", &self.inner.edge_count())
            .finish()
    }
}

impl ArchitectureModel {
    pub fn new() -> Self {
        ArchitectureModel {
            inner: StableDiGraph::new(),
            primary_types: HashMap::new(),
            type_owners: HashMap::new(),
        }
    }

    pub fn add_person(&mut self, name: &str, description: &str) -> Result<ElementId> {
        let mut person = Element::new(ElementKind::Person, name, None);
        person.description = description.to_string();
        self.add_element(person)
    }

    pub fn add_software_system(&mut self, name: &str, description: &str) -> Result<ElementId> {
        let mut system = Element::new(ElementKind::SoftwareSystem, name, None);
        system.description = description.to_string();
        self.add_element(system)
    }

    pub fn add_container(
        &mut self,
        system: ElementId,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<ElementId> {
        let mut container = Element::new(ElementKind::Container, name, Some(system));
        container.description = description.to_string();
        container.technology = technology.to_string();
        self.add_element(container)
    }

    /// Add a component for `type_name` to `container`.
    ///
    /// Idempotent per type: when the container already has a component whose
    /// primary type is `type_name`, that component is returned unchanged.
    /// A blank `name` defaults to the simple name of the type, or to the full
    /// type name when a sibling component already uses the simple name.
    pub fn add_component(
        &mut self,
        container: ElementId,
        name: &str,
        type_name: &str,
        description: &str,
        technology: &str,
    ) -> Result<ElementId> {
        self.expect_kind(container, ElementKind::Container)?;
        if type_name.trim().is_empty() {
            return Err(ModelError::BlankTypeName);
        }
        if let Some(existing) = self.component_of_type(container, type_name) {
            return Ok(existing);
        }

        let name = if !name.trim().is_empty() {
            name
        } else {
            let simple = split_type_name(type_name).1;
            if self
                .find_by_name(ElementKind::Component, Some(container), simple)
                .is_some()
            {
                type_name
            } else {
                simple
            }
        };
        let mut component = Element::new(ElementKind::Component, name, Some(container));
        component.description = description.to_string();
        component.technology = technology.to_string();
        component
            .code_elements
            .push(CodeElement::new(type_name, CodeElementRole::Primary));

        let id = self.add_element(component)?;
        self.primary_types.insert((container, type_name.to_string()), id);
        // A primary type takes precedence over an earlier supporting attachment.
        if let Some(previous) = self.type_owners.insert((container, type_name.to_string()), id) {
            if let Some(owner) = self.element_mut(previous) {
                owner
                    .code_elements
                    .retain(|c| c.is_primary() || c.type_name != type_name);
            }
        }
        tracing::debug!("Added component {} for type {}", name, type_name);
        Ok(id)
    }

    /// The component in `container` whose primary type is `type_name`.
    pub fn component_of_type(&self, container: ElementId, type_name: &str) -> Option<ElementId> {
        self.primary_types
            .get(&(container, type_name.to_string()))
            .copied()
    }

    /// The component in `container` that owns `type_name` as a primary or supporting type.
    pub fn owner_of_type(&self, container: ElementId, type_name: &str) -> Option<ElementId> {
        self.type_owners
            .get(&(container, type_name.to_string()))
            .copied()
    }

    pub fn component_with_name(&self, container: ElementId, name: &str) -> Option<ElementId> {
        self.find_by_name(ElementKind::Component, Some(container), name)
    }

    /// All components of a container, in insertion order.
    pub fn components_of(&self, container: ElementId) -> Vec<ElementId> {
        self.children(container)
            .filter(|e| e.kind == ElementKind::Component)
            .map(|e| e.id)
            .collect()
    }

    /// Attach `type_name` to `component` as a supporting type.
    ///
    /// Returns the attached (or already attached) code element, or `None` when
    /// another component in the same container already owns the type.
    pub fn add_supporting_type(
        &mut self,
        component: ElementId,
        type_name: &str,
    ) -> Result<Option<&mut CodeElement>> {
        self.expect_kind(component, ElementKind::Component)?;
        let container = self
            .element(component)
            .and_then(|e| e.parent)
            .ok_or(ModelError::ElementNotFound(component))?;

        let key = (container, type_name.to_string());
        match self.type_owners.get(&key).copied() {
            Some(owner) if owner != component => return Ok(None),
            Some(_) => {}
            None => {
                self.type_owners.insert(key, component);
                let element = self
                    .element_mut(component)
                    .ok_or(ModelError::ElementNotFound(component))?;
                element
                    .code_elements
                    .push(CodeElement::new(type_name, CodeElementRole::Supporting));
            }
        }

        Ok(self
            .element_mut(component)
            .and_then(|e| e.code_element_mut(type_name)))
    }

    /// Create a relationship from `source` to `destination`.
    ///
    /// Returns `None` for self-relationships and when the pair is already
    /// connected; existing edges are never duplicated or overwritten here.
    pub fn uses(
        &mut self,
        source: ElementId,
        destination: ElementId,
        description: &str,
        technology: &str,
    ) -> Option<RelationshipId> {
        if source == destination {
            return None;
        }
        if self.element(source).is_none() || self.element(destination).is_none() {
            return None;
        }
        if self.relationship_between(source, destination).is_some() {
            return None;
        }

        let relationship = Relationship {
            id: RelationshipId::default(),
            source,
            destination,
            description: description.to_string(),
            technology: technology.to_string(),
        };
        let idx = self.inner.add_edge(
            NodeIndex::new(source.0 as usize),
            NodeIndex::new(destination.0 as usize),
            relationship,
        );
        let id = RelationshipId(idx.index() as u64);
        if let Some(edge) = self.inner.edge_weight_mut(idx) {
            edge.id = id;
        }
        Some(id)
    }

    /// The relationship from `source` to `destination`, if any.
    pub fn relationship_between(
        &self,
        source: ElementId,
        destination: ElementId,
    ) -> Option<&Relationship> {
        self.relationships_from(source)
            .find(|r| r.destination == destination)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.inner.edge_weight(EdgeIndex::new(id.0 as usize))
    }

    pub fn modify_relationship(
        &mut self,
        id: RelationshipId,
        description: &str,
        technology: &str,
    ) -> Result<()> {
        let relationship = self
            .inner
            .edge_weight_mut(EdgeIndex::new(id.0 as usize))
            .ok_or(ModelError::RelationshipNotFound(id))?;
        relationship.description = description.to_string();
        relationship.technology = technology.to_string();
        Ok(())
    }

    /// Get an element by ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.inner.node_weight(NodeIndex::new(id.0 as usize))
    }

    /// Get a mutable element by ID.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.inner.node_weight_mut(NodeIndex::new(id.0 as usize))
    }

    pub fn element_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements().filter(move |e| e.kind == kind)
    }

    /// Direct children of an element.
    pub fn children(&self, parent: ElementId) -> impl Iterator<Item = &Element> {
        self.elements().filter(move |e| e.parent == Some(parent))
    }

    /// Iterate over all relationships.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Get all outgoing relationships of an element.
    pub fn relationships_from(&self, source: ElementId) -> impl Iterator<Item = &Relationship> {
        let idx = NodeIndex::new(source.0 as usize);
        self.inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge_ref| edge_ref.weight())
    }

    /// Find an element of `kind` by name under `parent` (`None` for top-level elements).
    pub fn find_by_name(
        &self,
        kind: ElementKind,
        parent: Option<ElementId>,
        name: &str,
    ) -> Option<ElementId> {
        self.elements()
            .find(|e| e.kind == kind && e.parent == parent && e.name == name)
            .map(|e| e.id)
    }

    /// Canonical name such as `Container://Shop.Web`.
    pub fn canonical_name(&self, id: ElementId) -> Option<String> {
        let element = self.element(id)?;
        let mut path = vec![element.name.as_str()];
        let mut parent = element.parent;
        while let Some(parent_id) = parent {
            let p = self.element(parent_id)?;
            path.push(p.name.as_str());
            parent = p.parent;
        }
        path.reverse();
        Some(format!("{}{}", element.kind.canonical_prefix(), path.join(".")))
    }

    pub fn find_by_canonical_name(&self, canonical_name: &str) -> Option<ElementId> {
        self.elements()
            .find(|e| self.canonical_name(e.id).as_deref() == Some(canonical_name))
            .map(|e| e.id)
    }

    /// Resolve an opaque element identifier (its numeric id as a string).
    pub fn parse_element_id(&self, raw: &str) -> Option<ElementId> {
        let id = ElementId(raw.trim().parse().ok()?);
        self.element(id).map(|_| id)
    }

    fn add_element(&mut self, element: Element) -> Result<ElementId> {
        if element.name.trim().is_empty() {
            return Err(ModelError::BlankName(element.kind));
        }
        if let (Some(parent), Some(expected)) = (element.parent, element.kind.parent_kind()) {
            self.expect_kind(parent, expected)?;
        }
        if self
            .find_by_name(element.kind, element.parent, &element.name)
            .is_some()
        {
            return Err(ModelError::DuplicateElement {
                kind: element.kind,
                name: element.name,
            });
        }

        let idx = self.inner.add_node(element);
        let id = ElementId(idx.index() as u64);
        if let Some(node) = self.inner.node_weight_mut(idx) {
            node.id = id;
        }
        Ok(id)
    }

    fn expect_kind(&self, id: ElementId, expected: ElementKind) -> Result<()> {
        let element = self.element(id).ok_or(ModelError::ElementNotFound(id))?;
        if element.kind != expected {
            return Err(ModelError::WrongKind {
                id,
                expected,
                actual: element.kind,
            });
        }
        Ok(())
    }
}

impl Default for ArchitectureModel {
    fn default() -> Self {
        Self::new()
    }
}
