//! Dependency-contributed files that are not tied to an architecture style.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ApplicationError,
    domain::{DependencyRegistry, RelativePath},
    error::SpringforgeResult,
};

/// Placeholder replaced with the project's base package.
pub const BASE_PACKAGE_TOKEN: &str = "{{basePackage}}";

/// One rendered scaffolding file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedFile {
    pub path: RelativePath,
    pub content: String,
    /// Rule that contributed the file.
    pub dependency: String,
}

impl ScaffoldedFile {
    /// Final location under an output root.
    pub fn target(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.path.to_path_buf())
    }
}

pub struct ScaffoldingService {
    registry: Arc<DependencyRegistry>,
}

impl ScaffoldingService {
    pub fn new(registry: Arc<DependencyRegistry>) -> Self {
        Self { registry }
    }

    /// Render the scaffolding of every selected rule, in priority order.
    ///
    /// The base package is substituted as a path (`com/acme/app`) in path
    /// templates and verbatim (`com.acme.app`) in content. Two files
    /// resolving to the same path fail the whole call.
    #[instrument(skip_all, fields(base_package = %base_package))]
    pub fn generate<I, S>(&self, ids: I, base_package: &str) -> SpringforgeResult<Vec<ScaffoldedFile>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let package_path = base_package.replace('.', "/");
        let mut owners: BTreeMap<RelativePath, String> = BTreeMap::new();
        let mut files = Vec::new();

        for rule in self.registry.rules_for(ids) {
            let Some(spec) = &rule.scaffolding else {
                continue;
            };

            for file in &spec.files {
                let path = RelativePath::try_new(file.path.replace(BASE_PACKAGE_TOKEN, &package_path))?;
                if let Some(first) = owners.get(&path) {
                    return Err(ApplicationError::ScaffoldingCollision {
                        path: path.to_path_buf(),
                        first: first.clone(),
                        second: rule.id.clone(),
                    }
                    .into());
                }
                owners.insert(path.clone(), rule.id.clone());

                debug!(path = %path, dependency = %rule.id, "Scaffolding file");
                files.push(ScaffoldedFile {
                    path,
                    content: file.content.replace(BASE_PACKAGE_TOKEN, base_package),
                    dependency: rule.id.clone(),
                });
            }
        }

        Ok(files)
    }
}
