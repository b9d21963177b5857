//! Infrastructure adapters for springforge.
//!
//! This crate implements the ports defined in
//! `springforge-core::application::ports` and loads the data catalogues the
//! core runs on. It contains all file I/O.
//!
//! - [`rule_catalog`]: dependency rules (embedded TOML, optional rule files)
//! - [`builtin_templates`]: template catalogue and override resolution
//! - [`template_loader`]: `*.tmpl` override directory walker
//! - [`renderer`]: `TemplateRenderer` over a catalogue
//! - [`filesystem`]: local and in-memory `Filesystem` implementations

pub mod builtin_templates;
pub mod error;
pub mod filesystem;
pub mod renderer;
pub mod rule_catalog;
pub mod template_loader;

// Re-export commonly used adapters
pub use builtin_templates::{TemplateCatalogue, resolve_catalogue};
pub use error::AdapterError;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use rule_catalog::{builtin_registry, registry_with};
