//! Domain value objects: BuildTool, Packaging, ArchitectureStyle, DependencyScope,
//! RuleCategory.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity. The
//! per-style layout data lives in `architecture.rs`; this file only defines
//! the types, their string representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── BuildTool ────────────────────────────────────────────────────────────────

/// The build descriptor dialect of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    /// Tag dialect (`pom.xml`).
    Maven,
    /// Brace dialect (`build.gradle`).
    Gradle,
}

impl BuildTool {
    pub const ALL: [BuildTool; 2] = [Self::Maven, Self::Gradle];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
        }
    }

    /// File name of the root build descriptor.
    pub const fn build_file(&self) -> &'static str {
        match self {
            Self::Maven => "pom.xml",
            Self::Gradle => "build.gradle",
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "maven" | "mvn" | "maven-project" => Ok(Self::Maven),
            "gradle" | "gradle-groovy" | "gradle-project" => Ok(Self::Gradle),
            other => Err(DomainError::UnknownValue {
                kind: "build tool",
                value: other.to_string(),
            }),
        }
    }
}

// ── Packaging ────────────────────────────────────────────────────────────────

/// Artifact packaging of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    #[default]
    Jar,
    War,
}

impl Packaging {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jar => "jar",
            Self::War => "war",
        }
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Packaging {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jar" => Ok(Self::Jar),
            "war" => Ok(Self::War),
            other => Err(DomainError::UnknownValue {
                kind: "packaging",
                value: other.to_string(),
            }),
        }
    }
}

// ── ArchitectureStyle ────────────────────────────────────────────────────────

/// A source layout style for the generated project.
///
/// To add a new style: add a variant here, then add an `ArchitectureDef` in
/// `architecture.rs`. No other files change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitectureStyle {
    Mvc,
    Layered,
    Clean,
    Hexagonal,
    FeatureDriven,
    Ddd,
    Cqrs,
    EventDriven,
    Onion,
    VerticalSlice,
}

impl ArchitectureStyle {
    pub const ALL: [ArchitectureStyle; 10] = [
        Self::Mvc,
        Self::Layered,
        Self::Clean,
        Self::Hexagonal,
        Self::FeatureDriven,
        Self::Ddd,
        Self::Cqrs,
        Self::EventDriven,
        Self::Onion,
        Self::VerticalSlice,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mvc => "mvc",
            Self::Layered => "layered",
            Self::Clean => "clean",
            Self::Hexagonal => "hexagonal",
            Self::FeatureDriven => "feature-driven",
            Self::Ddd => "ddd",
            Self::Cqrs => "cqrs",
            Self::EventDriven => "event-driven",
            Self::Onion => "onion",
            Self::VerticalSlice => "vertical-slice",
        }
    }
}

impl fmt::Display for ArchitectureStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchitectureStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "mvc" | "layered-mvc" => Ok(Self::Mvc),
            "layered" | "n-tier" => Ok(Self::Layered),
            "clean" => Ok(Self::Clean),
            "hexagonal" | "ports-and-adapters" | "hex" => Ok(Self::Hexagonal),
            "feature-driven" | "feature-sliced" | "feature" => Ok(Self::FeatureDriven),
            "ddd" | "domain-driven" => Ok(Self::Ddd),
            "cqrs" => Ok(Self::Cqrs),
            "event-driven" | "events" => Ok(Self::EventDriven),
            "onion" => Ok(Self::Onion),
            "vertical-slice" | "slice" => Ok(Self::VerticalSlice),
            other => Err(DomainError::UnknownValue {
                kind: "architecture",
                value: other.to_string(),
            }),
        }
    }
}

// ── DependencyScope ──────────────────────────────────────────────────────────

/// Where a declared artifact lives on the classpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyScope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    AnnotationProcessor,
}

impl DependencyScope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::Test => "test",
            Self::AnnotationProcessor => "annotation-processor",
        }
    }

    /// Gradle configuration name for this scope.
    pub const fn gradle_configuration(&self) -> &'static str {
        match self {
            Self::Compile => "implementation",
            Self::Runtime => "runtimeOnly",
            Self::Provided => "compileOnly",
            Self::Test => "testImplementation",
            Self::AnnotationProcessor => "annotationProcessor",
        }
    }

    /// Maven `<scope>` value, `None` for the implicit compile scope.
    pub const fn maven_scope(&self) -> Option<&'static str> {
        match self {
            Self::Compile | Self::AnnotationProcessor => None,
            Self::Runtime => Some("runtime"),
            Self::Provided => Some("provided"),
            Self::Test => Some("test"),
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RuleCategory ─────────────────────────────────────────────────────────────

/// Grouping used when listing dependency rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    Web,
    Data,
    Database,
    Security,
    Messaging,
    Observability,
    Cloud,
    Template,
    Documentation,
    Testing,
    Tool,
}

impl RuleCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "WEB",
            Self::Data => "DATA",
            Self::Database => "DATABASE",
            Self::Security => "SECURITY",
            Self::Messaging => "MESSAGING",
            Self::Observability => "OBSERVABILITY",
            Self::Cloud => "CLOUD",
            Self::Template => "TEMPLATE",
            Self::Documentation => "DOCUMENTATION",
            Self::Testing => "TESTING",
            Self::Tool => "TOOL",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tool_from_str_accepts_aliases() {
        assert_eq!(BuildTool::from_str("mvn").unwrap(), BuildTool::Maven);
        assert_eq!(BuildTool::from_str("Gradle").unwrap(), BuildTool::Gradle);
        assert!(BuildTool::from_str("ant").is_err());
    }

    #[test]
    fn build_tool_knows_its_descriptor() {
        assert_eq!(BuildTool::Maven.build_file(), "pom.xml");
        assert_eq!(BuildTool::Gradle.build_file(), "build.gradle");
    }

    #[test]
    fn architecture_round_trips_through_display() {
        for style in ArchitectureStyle::ALL {
            assert_eq!(ArchitectureStyle::from_str(style.as_str()).unwrap(), style);
        }
    }

    #[test]
    fn architecture_from_str_accepts_aliases() {
        assert_eq!(
            ArchitectureStyle::from_str("ports_and_adapters").unwrap(),
            ArchitectureStyle::Hexagonal
        );
        assert_eq!(
            ArchitectureStyle::from_str("FEATURE-SLICED").unwrap(),
            ArchitectureStyle::FeatureDriven
        );
        assert!(matches!(
            ArchitectureStyle::from_str("spaghetti"),
            Err(DomainError::UnknownValue { .. })
        ));
    }

    #[test]
    fn scope_maps_to_gradle_configurations() {
        assert_eq!(DependencyScope::Runtime.gradle_configuration(), "runtimeOnly");
        assert_eq!(
            DependencyScope::AnnotationProcessor.gradle_configuration(),
            "annotationProcessor"
        );
        assert_eq!(DependencyScope::Compile.maven_scope(), None);
        assert_eq!(DependencyScope::Test.maven_scope(), Some("test"));
    }
}
