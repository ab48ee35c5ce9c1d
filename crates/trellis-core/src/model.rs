//! Core data structures for the architecture model

use serde::{Deserialize, Serialize};

/// Unique, stable identifier for a model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique relationship identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct RelationshipId(pub u64);

/// Discriminates what kind of architecture element a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Person,
    SoftwareSystem,
    Container,
    Component,
}

impl ElementKind {
    /// Prefix used when building canonical names.
    pub fn canonical_prefix(&self) -> &'static str {
        match self {
            ElementKind::Person => "Person://",
            ElementKind::SoftwareSystem => "SoftwareSystem://",
            ElementKind::Container => "Container://",
            ElementKind::Component => "Component://",
        }
    }

    /// The kind a parent element must have, if any.
    pub fn parent_kind(&self) -> Option<ElementKind> {
        match self {
            ElementKind::Person | ElementKind::SoftwareSystem => None,
            ElementKind::Container => Some(ElementKind::SoftwareSystem),
            ElementKind::Component => Some(ElementKind::Container),
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ElementKind::Person => "person",
            ElementKind::SoftwareSystem => "software system",
            ElementKind::Container => "container",
            ElementKind::Component => "component",
        };
        f.write_str(label)
    }
}

/// Visibility of a type as reported by the metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Internal,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
        }
    }
}

/// Structural category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeCategory {
    Class,
    Interface,
    AbstractClass,
    StaticClass,
    Enum,
}

impl TypeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Class => "class",
            TypeCategory::Interface => "interface",
            TypeCategory::AbstractClass => "abstract class",
            TypeCategory::StaticClass => "static class",
            TypeCategory::Enum => "enum",
        }
    }
}

/// Whether a code element is the component's primary type or a supporting type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeElementRole {
    Primary,
    Supporting,
}

/// A type that belongs to a component's implementation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeElement {
    /// Fully qualified type name.
    pub type_name: String,
    /// Simple (unqualified) name.
    pub name: String,
    pub namespace: String,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub category: Option<TypeCategory>,
    pub size: Option<u64>,
    pub role: CodeElementRole,
}

impl CodeElement {
    pub fn new(type_name: &str, role: CodeElementRole) -> Self {
        let (namespace, name) = split_type_name(type_name);
        CodeElement {
            type_name: type_name.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            description: None,
            visibility: None,
            category: None,
            size: None,
            role,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.role == CodeElementRole::Primary
    }
}

/// A single node in the architecture model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub name: String,
    pub description: String,
    pub technology: String,
    pub parent: Option<ElementId>,
    /// Aggregated size of the component's code elements (e.g. lines of code).
    pub size: Option<u64>,
    /// Component code elements; the primary type always comes first.
    pub code_elements: Vec<CodeElement>,
}

impl Element {
    pub fn new(kind: ElementKind, name: impl Into<String>, parent: Option<ElementId>) -> Self {
        Element {
            id: ElementId::default(),
            kind,
            name: name.into(),
            description: String::new(),
            technology: String::new(),
            parent,
            size: None,
            code_elements: Vec::new(),
        }
    }

    /// Fully qualified name of the component's primary type.
    pub fn primary_type(&self) -> Option<&str> {
        self.code_elements
            .iter()
            .find(|c| c.is_primary())
            .map(|c| c.type_name.as_str())
    }

    pub fn code_element(&self, type_name: &str) -> Option<&CodeElement> {
        self.code_elements.iter().find(|c| c.type_name == type_name)
    }

    pub fn code_element_mut(&mut self, type_name: &str) -> Option<&mut CodeElement> {
        self.code_elements.iter_mut().find(|c| c.type_name == type_name)
    }

    pub fn has_code_element(&self, type_name: &str) -> bool {
        self.code_element(type_name).is_some()
    }
}

/// A directed "uses" edge between two elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source: ElementId,
    pub destination: ElementId,
    pub description: String,
    pub technology: String,
}

/// Split `App.Orders.OrderController` into (`App.Orders`, `OrderController`).
/// Generic arguments and origin qualifiers are ignored when locating the split.
pub fn split_type_name(type_name: &str) -> (&str, &str) {
    let head_end = type_name
        .find(|c| c == '<' || c == ',' || c == '[')
        .unwrap_or(type_name.len());
    match type_name[..head_end].rfind('.') {
        Some(dot) => (&type_name[..dot], &type_name[dot + 1..]),
        None => ("", type_name),
    }
}
