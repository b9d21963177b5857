//! The in-memory result of one generation run.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Where a generated file came from. Used in collision reports and dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOrigin {
    Skeleton,
    BuildFile,
    Blueprint { template_id: String },
    Scaffolding { dependency: String },
    RuntimeConfig,
    Infrastructure,
    Ops,
}

impl fmt::Display for FileOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skeleton => f.write_str("project skeleton"),
            Self::BuildFile => f.write_str("build descriptor"),
            Self::Blueprint { template_id } => write!(f, "blueprint {template_id}"),
            Self::Scaffolding { dependency } => write!(f, "scaffolding of '{dependency}'"),
            Self::RuntimeConfig => f.write_str("runtime configuration"),
            Self::Infrastructure => f.write_str("infrastructure composer"),
            Self::Ops => f.write_str("ops files"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub content: String,
    pub origin: FileOrigin,
}

/// Relative path to file content, ordered by path.
///
/// Entries are never overwritten: inserting an occupied path fails with
/// [`DomainError::PathCollision`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFileMap {
    files: BTreeMap<RelativePath, GeneratedFile>,
}

impl GeneratedFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        path: RelativePath,
        content: impl Into<String>,
        origin: FileOrigin,
    ) -> Result<(), DomainError> {
        match self.files.entry(path) {
            Entry::Occupied(existing) => Err(DomainError::PathCollision {
                path: existing.key().to_string(),
                existing: existing.get().origin.to_string(),
                incoming: origin.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(GeneratedFile {
                    content: content.into(),
                    origin,
                });
                Ok(())
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.get(path)
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        self.get(path).map(|f| f.content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &GeneratedFile)> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(RelativePath::as_str)
    }

    /// Total content size in bytes.
    pub fn total_bytes(&self) -> usize {
        self.files.values().map(|f| f.content.len()).sum()
    }
}

impl<'a> IntoIterator for &'a GeneratedFileMap {
    type Item = (&'a RelativePath, &'a GeneratedFile);
    type IntoIter = std::collections::btree_map::Iter<'a, RelativePath, GeneratedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
