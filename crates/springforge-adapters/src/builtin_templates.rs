//! Built-in template catalogue.
//!
//! The catalogue maps template ids (`entity/Entity`, `build/pom`, ...) to
//! template text. The shipped catalogue is embedded as TOML
//! (`templates/templates.toml`) and parsed once per process. Individual
//! templates can be replaced from a local directory, see
//! [`crate::template_loader`].
//!
//! # Override resolution order
//!
//! The first directory that exists is used:
//!
//! 1. the path passed explicitly (CLI `--templates` or `templates.local_path`
//!    in the configuration file)
//! 2. **`$SPRINGFORGE_TEMPLATES_DIR`**
//!
//! Without either, the built-in catalogue is used unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::AdapterError;
use crate::template_loader::OverrideLoader;

/// Built-in catalogue source.
pub const BUILTIN_TEMPLATES: &str = include_str!("../templates/templates.toml");

/// Environment variable naming an override directory.
pub const TEMPLATES_DIR_ENV: &str = "SPRINGFORGE_TEMPLATES_DIR";

const BUILTIN_SOURCE: &str = "built-in template catalogue";

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    #[serde(default)]
    template: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    id: String,
    content: String,
}

/// Template id to template text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalogue {
    templates: BTreeMap<String, String>,
}

impl TemplateCatalogue {
    /// Parse a `[[template]]` catalogue. Duplicate ids are rejected.
    pub fn parse(text: &str, source_name: &str) -> Result<Self, AdapterError> {
        let file: CatalogueFile = toml::from_str(text).map_err(|e| AdapterError::CatalogueParse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

        let mut templates = BTreeMap::new();
        for entry in file.template {
            if templates.contains_key(&entry.id) {
                return Err(AdapterError::DuplicateTemplate {
                    id: entry.id,
                    source_name: source_name.to_string(),
                });
            }
            templates.insert(entry.id, entry.content);
        }
        Ok(Self { templates })
    }

    /// The shipped catalogue, parsed on first use.
    pub fn builtin() -> Result<Arc<Self>, AdapterError> {
        static BUILTIN: OnceLock<Result<Arc<TemplateCatalogue>, AdapterError>> = OnceLock::new();

        BUILTIN
            .get_or_init(|| {
                let catalogue = Self::parse(BUILTIN_TEMPLATES, BUILTIN_SOURCE)?;
                debug!(templates = catalogue.len(), "Built-in templates loaded");
                Ok(Arc::new(catalogue))
            })
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.templates.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Replace or add templates. Returns the ids that replaced a built-in.
    pub fn overlay(&mut self, overrides: BTreeMap<String, String>) -> Vec<String> {
        let mut replaced = Vec::new();
        for (id, content) in overrides {
            if self.templates.insert(id.clone(), content).is_some() {
                replaced.push(id);
            }
        }
        replaced
    }
}

/// Built-in catalogue with local overrides applied, if an override
/// directory is configured.
#[instrument(skip_all)]
pub fn resolve_catalogue(explicit: Option<&Path>) -> Result<Arc<TemplateCatalogue>, AdapterError> {
    let builtin = TemplateCatalogue::builtin()?;

    let Some(dir) = override_dir(explicit) else {
        debug!("No template override directory, using built-in templates");
        return Ok(builtin);
    };

    let overrides = OverrideLoader::new(&dir).load()?;
    if overrides.is_empty() {
        return Ok(builtin);
    }

    let mut catalogue = (*builtin).clone();
    let replaced = catalogue.overlay(overrides);
    info!(
        path = %dir.display(),
        replaced = replaced.len(),
        total = catalogue.len(),
        "Template overrides applied"
    );
    Ok(Arc::new(catalogue))
}

/// First configured override directory that exists.
fn override_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    candidate_paths(explicit).into_iter().find(|p| {
        let found = p.is_dir();
        debug!(path = %p.display(), found, "Checking template override path");
        found
    })
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Ok(dir) = std::env::var(TEMPLATES_DIR_ENV) {
        if !dir.trim().is_empty() {
            paths.push(PathBuf::from(dir));
        }
    }
    paths
}
