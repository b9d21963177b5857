//! Dependency rule catalogue loading.
//!
//! The built-in catalogue ships inside the binary as TOML
//! (`rules/dependency-rules.toml`, one `[[rule]]` table per dependency id)
//! and is parsed at most once per process. Extra rule files can be layered
//! on top: a rule whose id already exists replaces the built-in one.
//!
//! # Rule file formats
//!
//! - `.toml`: `[[rule]]` tables, same schema as the built-in catalogue
//! - `.json`: a top-level array of rule objects

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use springforge_core::domain::{DependencyRegistry, DependencyRule};

use crate::error::AdapterError;

/// Built-in catalogue source.
pub const BUILTIN_RULES: &str = include_str!("../rules/dependency-rules.toml");

const BUILTIN_SOURCE: &str = "built-in rule catalogue";

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<DependencyRule>,
}

/// Parse a TOML rule catalogue.
pub fn parse_rules(text: &str, source_name: &str) -> Result<Vec<DependencyRule>, AdapterError> {
    toml::from_str::<RuleFile>(text)
        .map(|file| file.rule)
        .map_err(|e| AdapterError::CatalogueParse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a JSON rule catalogue (top-level array).
pub fn parse_json_rules(text: &str, source_name: &str) -> Result<Vec<DependencyRule>, AdapterError> {
    serde_json::from_str(text).map_err(|e| AdapterError::CatalogueParse {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })
}

/// Read a rule file, choosing the parser by extension.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_rule_file(path: &Path) -> Result<Vec<DependencyRule>, AdapterError> {
    let text = std::fs::read_to_string(path).map_err(|e| AdapterError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let source_name = path.display().to_string();

    let rules = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_rules(&text, &source_name)?,
        Some("json") => parse_json_rules(&text, &source_name)?,
        _ => {
            return Err(AdapterError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    debug!(rules = rules.len(), "Rule file loaded");
    Ok(rules)
}

/// The shipped rules, parsed fresh.
pub fn builtin_rules() -> Result<Vec<DependencyRule>, AdapterError> {
    parse_rules(BUILTIN_RULES, BUILTIN_SOURCE)
}

/// The shipped registry. Parsed and validated on first use, then shared.
pub fn builtin_registry() -> Result<Arc<DependencyRegistry>, AdapterError> {
    static BUILTIN: OnceLock<Result<Arc<DependencyRegistry>, AdapterError>> = OnceLock::new();

    BUILTIN
        .get_or_init(|| {
            let rules = builtin_rules()?;
            let registry = build_registry(rules, BUILTIN_SOURCE)?;
            info!(rules = registry.len(), "Built-in dependency rules loaded");
            Ok(Arc::new(registry))
        })
        .clone()
}

/// Built-in rules with every file in `extra` layered on top, in order.
#[instrument(skip_all, fields(files = extra.len()))]
pub fn registry_with<P: AsRef<Path>>(extra: &[P]) -> Result<Arc<DependencyRegistry>, AdapterError> {
    if extra.is_empty() {
        return builtin_registry();
    }

    let mut rules = builtin_rules()?;
    let mut source = BUILTIN_SOURCE.to_string();
    for path in extra {
        let path = path.as_ref();
        rules = merge_rules(rules, load_rule_file(path)?);
        source = path.display().to_string();
    }
    build_registry(rules, &source).map(Arc::new)
}

/// Overlay `overrides` on `base`: same id replaces, new ids are added.
pub fn merge_rules(base: Vec<DependencyRule>, overrides: Vec<DependencyRule>) -> Vec<DependencyRule> {
    let mut by_id: BTreeMap<String, DependencyRule> =
        base.into_iter().map(|r| (r.id.clone(), r)).collect();
    for rule in overrides {
        if by_id.contains_key(&rule.id) {
            debug!(id = %rule.id, "Rule replaced by override");
        }
        by_id.insert(rule.id.clone(), rule);
    }
    by_id.into_values().collect()
}

fn build_registry(
    rules: Vec<DependencyRule>,
    source_name: &str,
) -> Result<DependencyRegistry, AdapterError> {
    DependencyRegistry::new(rules).map_err(|error| AdapterError::InvalidCatalogue {
        source_name: source_name.to_string(),
        error,
    })
}
