//! Spring Boot project composition.
//!
//! A [`ProjectConfig`](domain::ProjectConfig) goes in, a complete file map
//! comes out. One generation run:
//!
//! 1. refuses an occupied target directory
//! 2. resolves the library version table and the selected rules
//! 3. renders the skeleton and expands the architecture blueprints
//! 4. renders the build descriptor and patches it with the Maven or
//!    Gradle mutator
//! 5. aggregates the runtime properties
//! 6. adds dependency scaffolding, then container and ops files
//!
//! Everything up to this point happens in memory. Only
//! [`GenerationService::generate_and_write`](application::GenerationService::generate_and_write)
//! touches the disk, through the [`Filesystem`](application::Filesystem)
//! port, and it removes the project root again if a write fails.
//!
//! `domain` holds the catalogues and value types and never does I/O.
//! `application` holds the services and the two driven ports
//! ([`TemplateRenderer`](application::TemplateRenderer) and
//! [`Filesystem`](application::Filesystem)) which `springforge-adapters`
//! implements.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use springforge_core::prelude::*;
//! # fn adapters() -> (DependencyRegistry, Box<dyn TemplateRenderer>, Box<dyn Filesystem>) { unimplemented!() }
//!
//! let (registry, renderer, filesystem) = adapters();
//! let config = ProjectConfig::builder()
//!     .group_id("com.acme")
//!     .artifact_id("orders")
//!     .architecture(ArchitectureStyle::Clean)
//!     .dependencies(["web", "data-jpa", "h2"])
//!     .build()
//!     .unwrap();
//!
//! let service = GenerationService::new(
//!     Arc::new(registry),
//!     Arc::new(VersionCatalog::builtin()),
//!     renderer,
//!     filesystem,
//! );
//! let project = service.generate_and_write(&config).unwrap();
//! println!("{} files under {}", project.file_count(), project.root.display());
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        ComposeOutcome, GeneratedProject, GenerationService,
        ports::{Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        ArchitectureStyle, BuildTool, DependencyRegistry, DependencyRule, Feature, FeatureFlags,
        GeneratedFileMap, Packaging, ProjectConfig, ProjectConfigBuilder, RenderContext,
        VersionCatalog,
    };
    pub use crate::error::{SpringforgeError, SpringforgeResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
