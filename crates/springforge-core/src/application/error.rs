//! Failures of the generation pipeline once a valid request is in hand.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Raised before any generation work, so nothing is half-written.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Template '{template_id}' failed to render: {reason}")]
    RenderingFailed { template_id: String, reason: String },

    #[error("Scaffolding collision at {path}: contributed by both '{first}' and '{second}'")]
    ScaffoldingCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Cleanup after a failed write did not finish.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// The in-memory filesystem lock was poisoned by a panicking writer.
    #[error("Internal store lock poisoned")]
    StoreLockError,

    #[error("Could not serialize compose document: {reason}")]
    ComposeSerialization { reason: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectExists { .. } => vec![
                "Choose a different artifact id".into(),
                "Or pass a different --output directory".into(),
            ],
            Self::RenderingFailed { template_id, .. } => vec![format!(
                "Check any override of '{template_id}' in the template directory"
            )],
            Self::ScaffoldingCollision { first, second, .. } => {
                vec![format!("Select only one of '{first}' and '{second}'")]
            }
            Self::FilesystemError { .. } => {
                vec!["Check write permission and free space in the output directory".into()]
            }
            Self::RollbackFailed { path, .. } => {
                vec![format!("Delete {} by hand before retrying", path.display())]
            }
            Self::StoreLockError => vec!["Try again".into()],
            Self::ComposeSerialization { .. } => {
                vec!["Disable container files (--disable container-files) and retry".into()]
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. } | Self::ScaffoldingCollision { .. } => {
                ErrorCategory::Conflict
            }
            Self::RenderingFailed { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::StoreLockError
            | Self::ComposeSerialization { .. } => ErrorCategory::Internal,
        }
    }
}
