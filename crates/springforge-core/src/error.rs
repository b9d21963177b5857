//! The single error type crossing the crate boundary.
//!
//! [`SpringforgeError`] wraps the layer errors and adds the two failures
//! that belong to neither layer. Callers branch on [`ErrorCategory`]
//! rather than on variants.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Debug, Error, Clone)]
pub enum SpringforgeError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Catalogues or settings supplied from outside the request.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A broken invariant inside springforge itself.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type SpringforgeResult<T> = Result<T, SpringforgeError>;

/// Coarse classification shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is malformed.
    Validation,
    /// The request is fine but collides with something that exists.
    Conflict,
    NotFound,
    Configuration,
    Internal,
}

impl SpringforgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { .. } => {
                vec!["Check the rule files and template directory in use".into()]
            }
            Self::Internal { .. } => vec![
                "Re-run with -vv and include the log when reporting this".into(),
            ],
        }
    }

    /// Failures that may clear up on a second attempt without any change
    /// to the request: disk trouble and a poisoned in-memory store.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(
                ApplicationError::FilesystemError { .. } | ApplicationError::StoreLockError
            )
        )
    }
}

/// Turn a foreign error into [`SpringforgeError::Internal`], prefixed
/// with what was being attempted.
pub trait Context<T> {
    fn context(self, doing: impl Into<String>) -> SpringforgeResult<T>;
}

impl<T, E: std::error::Error> Context<T> for Result<T, E> {
    fn context(self, doing: impl Into<String>) -> SpringforgeResult<T> {
        self.map_err(|e| SpringforgeError::Internal {
            message: format!("{}: {e}", doing.into()),
        })
    }
}
