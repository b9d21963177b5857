//! Command handlers. One module per subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use springforge_adapters::{builtin_registry, registry_with};
use springforge_core::domain::DependencyRegistry;
use tracing::debug;

use crate::error::{CliError, CliResult};

pub mod completions;
pub mod config;
pub mod list;
pub mod new;

/// The built-in rule catalogue, with `extra` rule files layered on top.
pub(crate) fn load_registry(extra: &[PathBuf]) -> CliResult<Arc<DependencyRegistry>> {
    let loaded = if extra.is_empty() {
        builtin_registry()
    } else {
        debug!(files = extra.len(), "Layering custom rule files");
        registry_with(extra)
    };

    loaded.map_err(|e| CliError::Config {
        message: e.to_string(),
        source: Some(Box::new(e)),
    })
}
