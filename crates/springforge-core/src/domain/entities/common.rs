use super::DomainError;
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

/// A project-relative path with `/` separators.
///
/// Invariant: never absolute, never escapes the root via `..`, never empty.
/// Enforced at construction. Ordering is lexical on the normalized string,
/// which gives generated file maps a stable iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref();
        let unified = raw.replace('\\', "/");

        if unified.starts_with('/') || Path::new(raw).is_absolute() || has_drive_prefix(&unified)
        {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: raw.to_string(),
            });
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(DomainError::ParentTraversalNotAllowed {
                        path: raw.to_string(),
                    });
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(DomainError::InvalidConfig {
                field: "path",
                reason: format!("'{raw}' does not name a file"),
            });
        }

        Ok(Self(segments.join("/")))
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        let segment = segment.as_ref();
        if segment.starts_with('/') || Path::new(segment).is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: segment.to_string(),
            });
        }
        Self::try_new(format!("{}/{}", self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Platform path form, for handing to a filesystem.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RelativePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_dots() {
        let p = RelativePath::try_new("src\\main/./java//App.java").unwrap();
        assert_eq!(p.as_str(), "src/main/java/App.java");
        assert_eq!(p.file_name(), "App.java");
    }

    #[test]
    fn rejects_absolute_and_traversal() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(matches!(
            RelativePath::try_new("C:/temp"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(matches!(
            RelativePath::try_new("src/../../x"),
            Err(DomainError::ParentTraversalNotAllowed { .. })
        ));
        assert!(RelativePath::try_new("").is_err());
    }

    #[test]
    fn join_keeps_invariant() {
        let base = RelativePath::try_new("k8s").unwrap();
        assert_eq!(base.join("service.yaml").unwrap().as_str(), "k8s/service.yaml");
        assert!(base.join("/abs").is_err());
        assert!(base.join("../up").is_err());
    }
}
