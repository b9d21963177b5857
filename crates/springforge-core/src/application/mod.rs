//! Application layer for springforge.
//!
//! This layer contains:
//! - **Services**: the generation pipeline (GenerationService and its stages)
//! - **Build file mutation**: idempotent patching of `pom.xml` and `build.gradle`
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Business rules and catalogues live in `crate::domain`; this layer wires
//! them together and owns every text transformation.

pub mod build_file;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main services
pub use services::{
    ComposeDocument, ComposeOutcome, GeneratedProject, GenerationService, InfrastructureService,
    PROJECT_TEMPLATES, ScaffoldingService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer};

pub use build_file::{BuildFileMutator, mutator_for};
pub use error::ApplicationError;
