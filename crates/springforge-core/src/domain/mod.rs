//! Core domain layer for springforge.
//!
//! Pure data and rules: architecture styles, feature flags, version tables,
//! dependency rules and the generated file map. No filesystem access and
//! no rendering happen here; those concerns sit behind ports in the
//! application layer.
//!
//! - **No I/O**: every function is deterministic over its inputs
//! - **Immutable catalogues**: registries are built once, then only read
//! - **Errors as values**: all fallible constructors return `DomainError`

pub mod architecture;
pub mod entities;
pub mod error;
pub mod features;
pub mod presets;
pub mod registry;
pub mod value_objects;
pub mod versions;

mod validation;

pub use architecture::{
    ARCHITECTURE_REGISTRY, ArchitectureDef, Blueprint, FeatureBlueprint, FileName, FileTask,
    find_architecture, resolve_blueprints,
};
pub use entities::{
    Artifact, DependencyRule, FileOrigin, GeneratedFile, GeneratedFileMap, InfraDescriptor,
    ProjectConfig, ProjectConfigBuilder, ProjectConfigDraft, RelativePath, RenderContext,
};
pub use error::DomainError;
pub use crate::error::ErrorCategory;
pub use features::{Feature, FeatureFlags};
pub use presets::{PRESET_REGISTRY, PresetDef, find_preset};
pub use registry::{DependencyRegistry, PropertyAggregation, PropertyCollision};
pub use validation::DomainValidator;
pub use value_objects::{ArchitectureStyle, BuildTool, DependencyScope, Packaging, RuleCategory};
pub use versions::{LibraryVersions, VersionCatalog, VersionKey, VersionResolution};
