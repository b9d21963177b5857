//! Dependency rules: the full generation contract of one selectable dependency.
//!
//! A rule says what a dependency id contributes to a project: build
//! declarations for each build tool, runtime properties, an optional
//! container service and optional extra source files. Rules are data; they
//! are deserialized from a catalogue once and never mutated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{BuildTool, DependencyScope, RuleCategory},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DependencyRule {
    /// Unique key, lowercase kebab-case.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Alternative ids accepted on input (e.g. `postgres` for `postgresql`).
    #[serde(default)]
    pub aliases: Vec<String>,
    pub category: RuleCategory,
    /// Higher is applied first and listed first.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub build: BuildSpec,
    #[serde(default)]
    pub runtime: RuntimeSpec,
    #[serde(default)]
    pub infrastructure: Option<InfraDescriptor>,
    #[serde(default)]
    pub scaffolding: Option<ScaffoldingSpec>,
}

impl DependencyRule {
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidRule {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.is_empty()
            || !self
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(invalid("id must be lowercase kebab-case"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        for artifact in self
            .build
            .dependencies_for(BuildTool::Maven)
            .chain(self.build.dependencies_for(BuildTool::Gradle))
        {
            if artifact.group_id.is_empty() || artifact.artifact_id.is_empty() {
                return Err(invalid("artifact coordinates must not be empty"));
            }
        }
        if let Some(infra) = &self.infrastructure {
            if infra.service.trim().is_empty() || infra.image.trim().is_empty() {
                return Err(invalid("infrastructure needs a service name and an image"));
            }
            if infra.depends_on.iter().any(|d| d == &infra.service) {
                return Err(invalid("service cannot depend on itself"));
            }
        }
        if let Some(scaffolding) = &self.scaffolding {
            if scaffolding.files.iter().any(|f| f.path.trim().is_empty()) {
                return Err(invalid("scaffolding file path is empty"));
            }
        }
        Ok(())
    }

    pub fn has_infrastructure(&self) -> bool {
        self.infrastructure.is_some()
    }

    pub fn has_scaffolding(&self) -> bool {
        self.scaffolding.as_ref().is_some_and(|s| !s.files.is_empty())
    }
}

// ── Build declarations ───────────────────────────────────────────────────────

/// A library coordinate with its scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Artifact {
    pub group_id: String,
    pub artifact_id: String,
    /// `None` lets the platform BOM manage the version. May contain
    /// `{{versions.<key>}}` tokens.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: DependencyScope,
}

impl Artifact {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: DependencyScope::Compile,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    /// `group:artifact`
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BuildSpec {
    /// Declarations shared by both build tools.
    pub dependencies: Vec<Artifact>,
    pub maven: MavenSpec,
    pub gradle: GradleSpec,
}

impl BuildSpec {
    /// Shared declarations followed by the tool-specific ones.
    pub fn dependencies_for(&self, tool: BuildTool) -> impl Iterator<Item = &Artifact> {
        let specific = match tool {
            BuildTool::Maven => &self.maven.dependencies,
            BuildTool::Gradle => &self.gradle.dependencies,
        };
        self.dependencies.iter().chain(specific.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MavenSpec {
    pub dependencies: Vec<Artifact>,
    pub plugins: Vec<MavenPlugin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MavenPlugin {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Raw XML placed inside `<plugin>` after the coordinates.
    #[serde(default)]
    pub configuration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GradleSpec {
    pub dependencies: Vec<Artifact>,
    pub plugins: Vec<GradlePlugin>,
    /// Extra `javac` arguments, e.g. `-Amapstruct.defaultComponentModel=spring`.
    pub compiler_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GradlePlugin {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
}

// ── Runtime configuration ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuntimeSpec {
    pub properties: BTreeMap<String, String>,
}

// ── Infrastructure ───────────────────────────────────────────────────────────

/// Data for one container service stanza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InfraDescriptor {
    /// Service key in the compose document.
    pub service: String,
    pub image: String,
    #[serde(default)]
    pub container_name: Option<String>,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    #[serde(default)]
    pub healthcheck: Option<HealthCheck>,
    #[serde(default)]
    pub volume: Option<NamedVolume>,
    /// Services (by service name) that must start first.
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HealthCheck {
    pub test: Vec<String>,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_timeout")]
    pub timeout: String,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_interval() -> String {
    "10s".into()
}

fn default_timeout() -> String {
    "5s".into()
}

fn default_retries() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamedVolume {
    pub name: String,
    pub mount_path: String,
}

// ── Scaffolding ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScaffoldingSpec {
    pub files: Vec<ScaffoldFile>,
}

/// A path template and content template pair. Both may contain
/// `{{basePackage}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}
