//! Adapter-level errors.
//!
//! Everything here is a configuration problem from the core's point of
//! view: a catalogue that does not parse, or a template directory that
//! cannot be read.

use std::path::PathBuf;

use springforge_core::{domain::DomainError, error::SpringforgeError};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AdapterError {
    /// A rule or template catalogue is not valid TOML/JSON for its schema.
    #[error("Could not parse {source_name}: {reason}")]
    CatalogueParse { source_name: String, reason: String },

    /// The catalogue parsed but the registry rejected it.
    #[error("Invalid rule catalogue {source_name}: {error}")]
    InvalidCatalogue {
        source_name: String,
        error: DomainError,
    },

    /// An override or rule file could not be read.
    #[error("Could not read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// A rule file extension we do not know how to parse.
    #[error("Unsupported rule file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Two templates in the same catalogue share an id.
    #[error("Template '{id}' is defined twice in {source_name}")]
    DuplicateTemplate { id: String, source_name: String },
}

impl From<AdapterError> for SpringforgeError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::InvalidCatalogue { error, .. } => SpringforgeError::Domain(error),
            other => SpringforgeError::Configuration {
                message: other.to_string(),
            },
        }
    }
}
