//! Errors that abort a discovery run
//!
//! Only misconfiguration ends up here. Names that cannot be resolved while
//! discovering are reported as [`crate::Diagnostic`]s instead.

use std::path::PathBuf;
use thiserror::Error;
use trellis_core::{ElementId, ModelError};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid argument: a namespace to scan is required")]
    BlankNamespace,

    #[error("invalid argument: at least one component finder strategy is required")]
    NoStrategies,

    #[error("invalid argument: the {0} matcher needs a non-blank target")]
    BlankMatcherTarget(&'static str),

    #[error("invalid argument: element {0} is not a container in this model")]
    ContainerNotFound(ElementId),

    #[error("strategy '{0}' was asked for components before a metadata provider was bound")]
    ProviderNotBound(String),

    #[error("invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid exclusion glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed type catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl DiscoveryError {
    /// Whether the error reports a caller-side configuration mistake.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DiscoveryError::BlankNamespace
                | DiscoveryError::NoStrategies
                | DiscoveryError::BlankMatcherTarget(_)
                | DiscoveryError::ContainerNotFound(_)
                | DiscoveryError::InvalidPattern { .. }
                | DiscoveryError::InvalidGlob { .. }
                | DiscoveryError::InvalidConfig(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
