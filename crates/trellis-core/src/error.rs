//! Errors raised by model mutations

use crate::model::{ElementId, ElementKind, RelationshipId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("element {0} does not exist")]
    ElementNotFound(ElementId),

    #[error("relationship {0:?} does not exist")]
    RelationshipNotFound(RelationshipId),

    #[error("element {id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: ElementId,
        expected: ElementKind,
        actual: ElementKind,
    },

    #[error("a {kind} named '{name}' already exists")]
    DuplicateElement { kind: ElementKind, name: String },

    #[error("{0} names must not be blank")]
    BlankName(ElementKind),

    #[error("a component needs a primary type name")]
    BlankTypeName,
}

pub type Result<T> = std::result::Result<T, ModelError>;
