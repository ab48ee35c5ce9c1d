//! Test utilities for building synthetic type catalogs

use crate::markers;
use crate::metadata::{Marker, MemberDefinition, MethodDefinition, TypeDefinition};
use std::collections::BTreeMap;

/// A bare public class.
pub fn type_def(name: &str) -> TypeDefinition {
    let mut definition = TypeDefinition::new(name);
    definition.visibility = Some(trellis_core::Visibility::Public);
    definition
}

pub fn member(name: &str, type_name: &str) -> MemberDefinition {
    MemberDefinition {
        name: name.to_string(),
        type_name: type_name.to_string(),
        markers: Vec::new(),
    }
}

/// Add one private field per referenced type.
pub fn with_fields(mut definition: TypeDefinition, types: &[&str]) -> TypeDefinition {
    for (i, type_name) in types.iter().enumerate() {
        definition.fields.push(member(&format!("field{}", i), type_name));
    }
    definition
}

pub fn marker(name: &str, origin: Option<&str>, arguments: &[(&str, &str)]) -> Marker {
    Marker {
        name: name.to_string(),
        origin: origin.map(str::to_string),
        arguments: arguments
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// One of the well-known `Trellis.Annotations` markers.
pub fn well_known(name: &str, arguments: &[(&str, &str)]) -> Marker {
    marker(name, Some(markers::MARKER_ORIGIN), arguments)
}

/// A type carrying the component marker.
pub fn marked_component(name: &str, description: &str) -> TypeDefinition {
    let mut definition = type_def(name);
    definition
        .markers
        .push(well_known(markers::COMPONENT, &[("description", description)]));
    definition
}

/// A method taking a single parameter, so the parameter type is referenced.
pub fn method_with_parameter(name: &str, parameter: MemberDefinition) -> MethodDefinition {
    MethodDefinition {
        name: name.to_string(),
        return_type: None,
        parameters: vec![parameter],
        locals: Vec::new(),
        markers: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_fields_references_every_type() {
        let definition = with_fields(type_def("App.A"), &["App.B", "List<App.C>"]);
        let mentioned = definition.mentioned_types();

        assert!(mentioned.contains("App.B"));
        assert!(mentioned.contains("App.C"));
        assert!(mentioned.contains("List"));
    }
}
