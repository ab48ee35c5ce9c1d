//! Trellis Core: Architecture model, relationships and discovery reports

pub mod error;
pub mod graph;
pub mod model;
pub mod report;


pub use error::ModelError;
pub use graph::ArchitectureModel;
pub use model::{
    CodeElement, CodeElementRole, Element, ElementId, ElementKind, Relationship, RelationshipId,
    TypeCategory, Visibility, split_type_name,
};
pub use report::{CodeElementReport, ComponentReport, DiscoveryReport, RelationshipReport};
