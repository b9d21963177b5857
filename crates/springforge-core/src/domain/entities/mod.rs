pub mod common;
pub mod dependency_rule;
pub mod file_map;
pub mod project_config;
pub mod render_context;

pub use crate::domain::DomainError;
pub use common::RelativePath;
pub use dependency_rule::{
    Artifact, BuildSpec, DependencyRule, GradlePlugin, GradleSpec, HealthCheck, InfraDescriptor,
    MavenPlugin, MavenSpec, NamedVolume, RuntimeSpec, ScaffoldFile, ScaffoldingSpec,
};
pub use file_map::{FileOrigin, GeneratedFile, GeneratedFileMap};
pub use project_config::{ProjectConfig, ProjectConfigBuilder, ProjectConfigDraft};
pub use render_context::RenderContext;
