//! Errors raised by pure domain logic: bad request values, paths that
//! escape the project, collisions in the file map and broken rules.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Cloneable so it can travel inside reports and test fixtures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A style, build tool, preset or similar name that nothing matches.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    ParentTraversalNotAllowed { path: String },

    #[error("'{path}' is produced by both {existing} and {incoming}")]
    PathCollision {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("dependency rule '{id}' is declared more than once")]
    DuplicateRule { id: String },

    #[error("dependency rule '{id}' is invalid: {reason}")]
    InvalidRule { id: String, reason: String },
}

impl DomainError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfig { field, reason } => {
                vec![format!("Fix {field}: {reason}")]
            }
            Self::UnknownValue { kind, .. } => {
                vec![format!("'springforge list' shows every accepted {kind}")]
            }
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{field}'")]
            }
            Self::AbsolutePathNotAllowed { .. } | Self::ParentTraversalNotAllowed { .. } => {
                vec!["Generated paths must stay relative to the project root".into()]
            }
            Self::PathCollision {
                existing, incoming, ..
            } => vec![format!("Drop either {existing} or {incoming} from the selection")],
            Self::DuplicateRule { id } | Self::InvalidRule { id, .. } => {
                vec![format!("Fix rule '{id}' in the rule file that declares it")]
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. }
            | Self::MissingRequiredField { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::ParentTraversalNotAllowed { .. } => ErrorCategory::Validation,
            Self::UnknownValue { .. } => ErrorCategory::NotFound,
            Self::PathCollision { .. } => ErrorCategory::Conflict,
            Self::DuplicateRule { .. } | Self::InvalidRule { .. } => ErrorCategory::Configuration,
        }
    }
}
