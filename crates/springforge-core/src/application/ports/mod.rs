//! Application ports (traits) for external dependencies.
//!
//! Adapters in `springforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by infrastructure
//!   - `Filesystem`: final flush of a generated project
//!   - `TemplateRenderer`: `render(templateId, context) -> text`
//!
//! - **Driving (Input) Ports**: the CLI calls `GenerationService` directly

pub mod output;

pub use output::{Filesystem, TemplateRenderer};

#[cfg(test)]
pub use output::{MockFilesystem, MockTemplateRenderer};
