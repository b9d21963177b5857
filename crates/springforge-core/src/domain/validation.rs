use crate::domain::error::DomainError;

/// Centralized domain validation.
///
/// All validation logic for user-supplied identifiers lives here, not
/// scattered across entities.
pub struct DomainValidator;

/// Lowest supported Java release.
pub const MIN_LANGUAGE_VERSION: u32 = 17;

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "record", "var", "yield",
];

impl DomainValidator {
    /// Dotted Maven group, e.g. `com.acme`.
    pub fn validate_group_id(group_id: &str) -> Result<(), DomainError> {
        if group_id.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "groupId" });
        }
        if !group_id.split('.').all(is_identifier_segment) {
            return Err(DomainError::InvalidConfig {
                field: "groupId",
                reason: format!("'{group_id}' must be dot-separated identifiers"),
            });
        }
        Ok(())
    }

    /// Artifact identifier; also the project directory name.
    pub fn validate_artifact_id(artifact_id: &str) -> Result<(), DomainError> {
        if artifact_id.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "artifactId" });
        }
        let mut chars = artifact_id.chars();
        let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !first_ok || !rest_ok || artifact_id.contains("..") {
            return Err(DomainError::InvalidConfig {
                field: "artifactId",
                reason: format!(
                    "'{artifact_id}' may only contain letters, digits, '-', '_' and '.'"
                ),
            });
        }
        Ok(())
    }

    /// Java package name: dot-separated identifiers, no reserved words.
    pub fn validate_package_name(package: &str) -> Result<(), DomainError> {
        if package.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "packageName",
            });
        }
        for segment in package.split('.') {
            if !is_identifier_segment(segment) {
                return Err(DomainError::InvalidConfig {
                    field: "packageName",
                    reason: format!("'{segment}' is not a valid package segment"),
                });
            }
            if JAVA_KEYWORDS.contains(&segment) {
                return Err(DomainError::InvalidConfig {
                    field: "packageName",
                    reason: format!("'{segment}' is a reserved word"),
                });
            }
        }
        Ok(())
    }

    pub fn validate_language_version(version: &str) -> Result<(), DomainError> {
        match version.trim().parse::<u32>() {
            Ok(v) if v >= MIN_LANGUAGE_VERSION => Ok(()),
            Ok(v) => Err(DomainError::InvalidConfig {
                field: "languageVersion",
                reason: format!("Java {v} is below the minimum of {MIN_LANGUAGE_VERSION}"),
            }),
            Err(_) => Err(DomainError::InvalidConfig {
                field: "languageVersion",
                reason: format!("'{version}' is not a Java release number"),
            }),
        }
    }

    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        if !name.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidConfig {
                field: "name",
                reason: "must contain at least one letter".into(),
            });
        }
        Ok(())
    }
}

fn is_identifier_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
