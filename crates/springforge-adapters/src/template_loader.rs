//! Filesystem template overrides.
//!
//! Every `*.tmpl` file under the override directory replaces (or adds) the
//! template whose id is the file's relative path without the extension.
//!
//! # Directory layout expected
//!
//! ```text
//! my-templates/
//! ├── build/
//! │   └── pom.tmpl              ← overrides `build/pom`
//! ├── controller/
//! │   └── Controller.tmpl       ← overrides `controller/Controller`
//! └── notes.md                  ← ignored
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::error::AdapterError;

/// File extension of override templates.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

pub struct OverrideLoader {
    root: PathBuf,
}

impl OverrideLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every override template, keyed by template id.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> Result<BTreeMap<String, String>, AdapterError> {
        if !self.root.is_dir() {
            return Err(AdapterError::Read {
                path: self.root.clone(),
                reason: "not a directory".into(),
            });
        }

        let mut templates = BTreeMap::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry in template directory");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                debug!(path = %path.display(), "Not a template file, skipped");
                continue;
            }

            let Some(id) = template_id(&self.root, path) else {
                warn!(path = %path.display(), "Template path is not valid UTF-8, skipped");
                continue;
            };
            let content = fs::read_to_string(path).map_err(|e| AdapterError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

            debug!(id = %id, "Template override found");
            templates.insert(id, content);
        }
        Ok(templates)
    }
}

/// `<root>/controller/Controller.tmpl` → `controller/Controller`.
fn template_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(normalize_id(&parts?.join("/")))
}

fn normalize_id(id: &str) -> String {
    id.replace('\\', "/")
}
