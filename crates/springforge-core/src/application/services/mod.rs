//! Application services - orchestrate use cases.
//!
//! `GenerationService` is the only entry point callers need. The
//! scaffolding and infrastructure services are the pipeline stages it
//! composes, exposed for direct use and testing.

pub mod generation_service;
pub mod infrastructure_service;
pub mod scaffolding_service;

pub use generation_service::{GeneratedProject, GenerationService, PROJECT_TEMPLATES};
pub use infrastructure_service::{
    ComposeDocument, ComposeOutcome, ComposeService, InfrastructureService,
};
pub use scaffolding_service::{BASE_PACKAGE_TOKEN, ScaffoldedFile, ScaffoldingService};
