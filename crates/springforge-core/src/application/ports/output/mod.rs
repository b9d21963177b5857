//! Driven (output) ports - implemented by infrastructure.
//!
//! The `springforge-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::RenderContext;
use crate::error::SpringforgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `springforge_adapters::filesystem::LocalFilesystem` (production)
/// - `springforge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Only the orchestrator's final write step touches this port. Nothing in
/// the pipeline writes while it is still composing the file map.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SpringforgeResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> SpringforgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> SpringforgeResult<()>;
}

/// Port for template rendering.
///
/// Implementations must be deterministic and side-effect free: the same
/// template id and context always yield the same text.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_id: &str, context: &RenderContext) -> SpringforgeResult<String>;
}
