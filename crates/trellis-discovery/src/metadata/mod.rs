//! Type-metadata provider: the structural facts discovery runs against
//!
//! Reading compiled binaries is outside this crate. Whatever extracts type
//! metadata hands it over as [`TypeDefinition`]s, either through the bundled
//! [`TypeCatalog`] or a custom [`MetadataSource`].

pub mod catalog;
pub mod type_names;

use crate::error::Result;
use crate::exclusion::ExclusionRules;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use trellis_core::{TypeCategory, Visibility};

pub use catalog::{TypeCatalog, TypeIndex};

/// Identity of a marker (annotation/attribute) type.
///
/// Two markers with the same name from different origins are different markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerIdentity {
    pub name: String,
    #[serde(default)]
    pub origin: Option<String>,
}

impl MarkerIdentity {
    pub fn new(name: impl Into<String>, origin: Option<&str>) -> Self {
        MarkerIdentity {
            name: name.into(),
            origin: origin.map(str::to_string),
        }
    }
}

impl std::fmt::Display for MarkerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "{}, {}", self.name, origin),
            None => f.write_str(&self.name),
        }
    }
}

/// A marker declared on a type or member, with its literal arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
}

impl Marker {
    pub fn is(&self, identity: &MarkerIdentity) -> bool {
        self.name == identity.name && self.origin == identity.origin
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).map(String::as_str)
    }

    /// Argument value, or an empty string when absent.
    pub fn text(&self, key: &str) -> &str {
        self.argument(key).unwrap_or_default()
    }
}

/// A field, property or method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<MemberDefinition>,
    /// Types of locals declared in the method body.
    #[serde(default)]
    pub locals: Vec<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

/// Structural metadata of a single type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Fully qualified name, e.g. `App.Orders.OrderController`.
    pub name: String,
    /// Assembly, package or module the type was read from.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// `None` means an ordinary class or struct.
    #[serde(default)]
    pub category: Option<TypeCategory>,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub fields: Vec<MemberDefinition>,
    #[serde(default)]
    pub properties: Vec<MemberDefinition>,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
    /// Lines of code, when the extractor knows them.
    #[serde(default)]
    pub size: Option<u64>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        TypeDefinition {
            name: name.into(),
            origin: None,
            visibility: None,
            category: None,
            base_type: None,
            interfaces: Vec::new(),
            markers: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            size: None,
        }
    }

    /// The unqualified type name.
    pub fn simple_name(&self) -> &str {
        trellis_core::split_type_name(&self.name).1
    }

    pub fn has_marker(&self, identity: &MarkerIdentity) -> bool {
        self.markers.iter().any(|m| m.is(identity))
    }

    /// Every type name this type mentions through fields, properties, method
    /// signatures and method-body locals, with generic arguments expanded.
    pub fn mentioned_types(&self) -> BTreeSet<String> {
        let fields = self.fields.iter().chain(&self.properties).map(|m| m.type_name.as_str());
        let methods = self.methods.iter().flat_map(|method| {
            method
                .return_type
                .as_deref()
                .into_iter()
                .chain(method.parameters.iter().map(|p| p.type_name.as_str()))
                .chain(method.locals.iter().map(String::as_str))
        });

        fields
            .chain(methods)
            .flat_map(type_names::decompose)
            .filter(|name| name != &self.name)
            .collect()
    }

    /// Fields, properties and method parameters, each with the marker list it carries.
    pub fn members(&self) -> impl Iterator<Item = &MemberDefinition> {
        self.fields
            .iter()
            .chain(&self.properties)
            .chain(self.methods.iter().flat_map(|m| m.parameters.iter()))
    }
}

/// A member carrying a particular marker.
#[derive(Debug, Clone, Copy)]
pub struct AnnotatedMember<'a> {
    pub member: &'a MemberDefinition,
    pub marker: &'a Marker,
}

/// Query interface over the types of one scope.
///
/// Implementations are expected to be cheap to query repeatedly; the
/// reference lookup in particular is called once per visited type during
/// dependency walking.
pub trait TypeMetadataProvider {
    /// The scope root the provider was built for.
    fn namespace(&self) -> &str;

    /// Every non-excluded type within scope, ordered by name.
    fn all_types(&self) -> Vec<&TypeDefinition>;

    /// Exact lookup. Accepts an optional `, Origin` qualifier suffix.
    fn get_type(&self, name: &str) -> Option<&TypeDefinition>;

    /// Non-excluded type names referenced by `name`.
    fn referenced_types(&self, name: &str) -> Arc<BTreeSet<String>>;

    fn find_visibility(&self, name: &str) -> Option<Visibility> {
        self.get_type(name).and_then(|t| t.visibility)
    }

    /// `None` implies an ordinary class or struct.
    fn find_category(&self, name: &str) -> Option<TypeCategory> {
        self.get_type(name).and_then(|t| t.category)
    }

    /// Markers of the given identity declared on a type.
    fn declared_markers(&self, name: &str, identity: &MarkerIdentity) -> Vec<&Marker> {
        self.get_type(name)
            .map(|t| t.markers.iter().filter(|m| m.is(identity)).collect())
            .unwrap_or_default()
    }

    /// Fields, properties and method parameters of a type carrying the given marker.
    fn annotated_members(&self, name: &str, identity: &MarkerIdentity) -> Vec<AnnotatedMember<'_>> {
        let Some(definition) = self.get_type(name) else {
            return Vec::new();
        };
        definition
            .members()
            .flat_map(|member| {
                member
                    .markers
                    .iter()
                    .filter(|m| m.is(identity))
                    .map(move |marker| AnnotatedMember { member, marker })
            })
            .collect()
    }

    /// Whether `name` falls within this provider's scope.
    fn in_scope(&self, name: &str) -> bool {
        type_names::in_namespace(type_names::strip_qualifier(name), self.namespace())
    }
}

/// Something that can open a [`TypeMetadataProvider`] for a scope.
///
/// Each call yields a fresh provider with an empty reference cache.
pub trait MetadataSource: Send + Sync {
    fn open(
        &self,
        namespace: &str,
        exclusions: &ExclusionRules,
    ) -> Result<Box<dyn TypeMetadataProvider>>;
}
