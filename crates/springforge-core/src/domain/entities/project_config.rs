//! The immutable generation request.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::render_context::{to_camel_case, to_pascal_case},
    error::DomainError,
    features::FeatureFlags,
    validation::DomainValidator,
    value_objects::{ArchitectureStyle, BuildTool, Packaging},
};

/// Everything needed to generate one project.
///
/// Fully populated and validated at construction; read-only afterwards.
/// Two equal configs always produce the same file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "ProjectConfigDraft")]
pub struct ProjectConfig {
    group_id: String,
    artifact_id: String,
    name: String,
    description: String,
    package_name: String,
    language_version: String,
    build_tool: BuildTool,
    packaging: Packaging,
    architecture: ArchitectureStyle,
    /// May be blank; the version resolver then falls back to the latest line.
    platform_version: String,
    dependencies: BTreeSet<String>,
    features: FeatureFlags,
    output_dir: PathBuf,
}

impl ProjectConfig {
    pub fn builder() -> ProjectConfigBuilder {
        ProjectConfigBuilder::default()
    }

    /// Start a builder pre-filled with this config, for overriding fields.
    pub fn to_builder(&self) -> ProjectConfigBuilder {
        ProjectConfigBuilder {
            group_id: Some(self.group_id.clone()),
            artifact_id: Some(self.artifact_id.clone()),
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            package_name: Some(self.package_name.clone()),
            language_version: Some(self.language_version.clone()),
            build_tool: Some(self.build_tool),
            packaging: Some(self.packaging),
            architecture: Some(self.architecture),
            platform_version: Some(self.platform_version.clone()),
            dependencies: self.dependencies.clone(),
            features: self.features,
            output_dir: Some(self.output_dir.clone()),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn language_version(&self) -> &str {
        &self.language_version
    }

    pub fn build_tool(&self) -> BuildTool {
        self.build_tool
    }

    pub fn packaging(&self) -> Packaging {
        self.packaging
    }

    pub fn architecture(&self) -> ArchitectureStyle {
        self.architecture
    }

    pub fn platform_version(&self) -> &str {
        &self.platform_version
    }

    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    pub fn has_dependency(&self, id: &str) -> bool {
        self.dependencies.contains(id)
    }

    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output_dir>/<artifact_id>`
    pub fn project_root(&self) -> PathBuf {
        self.output_dir.join(&self.artifact_id)
    }

    /// Name of the sample domain entity, e.g. `OrderService`.
    pub fn entity_name(&self) -> String {
        to_pascal_case(&self.name)
    }

    /// Lower camel form of the entity, for variable names.
    pub fn entity_variable(&self) -> String {
        to_camel_case(&self.name)
    }

    /// Directory name of the feature slice in slice-based styles.
    pub fn slice_name(&self) -> String {
        self.entity_name().to_lowercase()
    }

    pub fn application_class(&self) -> String {
        format!("{}Application", self.entity_name())
    }

    /// `com/acme/orders`
    pub fn package_path(&self) -> String {
        self.package_name.replace('.', "/")
    }
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({} {}, Java {})",
            self.group_id, self.artifact_id, self.build_tool, self.architecture, self.language_version
        )
    }
}

/// Package name derived from group and artifact when none is given.
pub fn derive_package_name(group_id: &str, artifact_id: &str) -> String {
    let artifact: String = artifact_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if artifact.is_empty() {
        group_id.to_string()
    } else {
        format!("{group_id}.{artifact}")
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder. `build()` fills the remaining gaps and validates.
///
/// Defaults: name = artifact id, package = group + artifact, Java 21, Maven,
/// jar, layered, blank platform version (latest), output dir `.`.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfigBuilder {
    group_id: Option<String>,
    artifact_id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    package_name: Option<String>,
    language_version: Option<String>,
    build_tool: Option<BuildTool>,
    packaging: Option<Packaging>,
    architecture: Option<ArchitectureStyle>,
    platform_version: Option<String>,
    dependencies: BTreeSet<String>,
    features: FeatureFlags,
    output_dir: Option<PathBuf>,
}

impl ProjectConfigBuilder {
    pub fn group_id(mut self, v: impl Into<String>) -> Self {
        self.group_id = Some(v.into());
        self
    }

    pub fn artifact_id(mut self, v: impl Into<String>) -> Self {
        self.artifact_id = Some(v.into());
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.name = Some(v.into());
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.description = Some(v.into());
        self
    }

    pub fn package_name(mut self, v: impl Into<String>) -> Self {
        self.package_name = Some(v.into());
        self
    }

    pub fn language_version(mut self, v: impl Into<String>) -> Self {
        self.language_version = Some(v.into());
        self
    }

    pub fn build_tool(mut self, v: BuildTool) -> Self {
        self.build_tool = Some(v);
        self
    }

    pub fn packaging(mut self, v: Packaging) -> Self {
        self.packaging = Some(v);
        self
    }

    pub fn architecture(mut self, v: ArchitectureStyle) -> Self {
        self.architecture = Some(v);
        self
    }

    pub fn platform_version(mut self, v: impl Into<String>) -> Self {
        self.platform_version = Some(v.into());
        self
    }

    pub fn dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.insert(id.into());
        self
    }

    /// Replace the dependency set.
    pub fn dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn features(mut self, flags: FeatureFlags) -> Self {
        self.features = flags;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        let group_id = self
            .group_id
            .map(|s| s.trim().to_string())
            .ok_or(DomainError::MissingRequiredField { field: "groupId" })?;
        let artifact_id = self
            .artifact_id
            .map(|s| s.trim().to_string())
            .ok_or(DomainError::MissingRequiredField { field: "artifactId" })?;

        DomainValidator::validate_group_id(&group_id)?;
        DomainValidator::validate_artifact_id(&artifact_id)?;

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| artifact_id.clone());
        DomainValidator::validate_name(&name)?;

        let package_name = self
            .package_name
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| derive_package_name(&group_id, &artifact_id));
        DomainValidator::validate_package_name(&package_name)?;

        let language_version = self.language_version.unwrap_or_else(|| "21".into());
        DomainValidator::validate_language_version(&language_version)?;

        let dependencies = self
            .dependencies
            .into_iter()
            .map(|d| d.trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        Ok(ProjectConfig {
            description: self
                .description
                .unwrap_or_else(|| format!("{name} generated by springforge")),
            group_id,
            artifact_id,
            name,
            package_name,
            language_version: language_version.trim().to_string(),
            build_tool: self.build_tool.unwrap_or(BuildTool::Maven),
            packaging: self.packaging.unwrap_or_default(),
            architecture: self.architecture.unwrap_or(ArchitectureStyle::Layered),
            platform_version: self.platform_version.unwrap_or_default().trim().to_string(),
            dependencies,
            features: self.features,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

// ============================================================================
// Deserialization
// ============================================================================

/// Shape of a project description file before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProjectConfigDraft {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub package_name: Option<String>,
    pub language_version: Option<String>,
    pub build_tool: Option<BuildTool>,
    pub packaging: Option<Packaging>,
    pub architecture: Option<ArchitectureStyle>,
    pub platform_version: Option<String>,
    pub dependencies: BTreeSet<String>,
    pub features: FeatureFlags,
    pub output_dir: Option<PathBuf>,
}

impl ProjectConfigDraft {
    pub fn into_builder(self) -> ProjectConfigBuilder {
        ProjectConfigBuilder {
            group_id: self.group_id,
            artifact_id: self.artifact_id,
            name: self.name,
            description: self.description,
            package_name: self.package_name,
            language_version: self.language_version,
            build_tool: self.build_tool,
            packaging: self.packaging,
            architecture: self.architecture,
            platform_version: self.platform_version,
            dependencies: self.dependencies,
            features: self.features,
            output_dir: self.output_dir,
        }
    }
}

impl TryFrom<ProjectConfigDraft> for ProjectConfig {
    type Error = DomainError;

    fn try_from(draft: ProjectConfigDraft) -> Result<Self, Self::Error> {
        draft.into_builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ProjectConfigBuilder {
        ProjectConfig::builder()
            .group_id("com.acme")
            .artifact_id("order-service")
    }

    #[test]
    fn builder_fills_defaults() {
        let cfg = minimal().build().unwrap();
        assert_eq!(cfg.name(), "order-service");
        assert_eq!(cfg.package_name(), "com.acme.orderservice");
        assert_eq!(cfg.language_version(), "21");
        assert_eq!(cfg.build_tool(), BuildTool::Maven);
        assert_eq!(cfg.architecture(), ArchitectureStyle::Layered);
        assert_eq!(cfg.platform_version(), "");
        assert_eq!(cfg.project_root(), PathBuf::from("./order-service"));
    }

    #[test]
    fn derived_names() {
        let cfg = minimal().build().unwrap();
        assert_eq!(cfg.entity_name(), "OrderService");
        assert_eq!(cfg.entity_variable(), "orderService");
        assert_eq!(cfg.slice_name(), "orderservice");
        assert_eq!(cfg.application_class(), "OrderServiceApplication");
        assert_eq!(cfg.package_path(), "com/acme/orderservice");
    }

    #[test]
    fn dependency_ids_are_normalized_and_unique() {
        let cfg = minimal()
            .dependencies(["Web", "web", " data-jpa ", ""])
            .build()
            .unwrap();
        let deps: Vec<_> = cfg.dependencies().iter().cloned().collect();
        assert_eq!(deps, vec!["data-jpa".to_string(), "web".to_string()]);
    }

    #[test]
    fn rejects_invalid_fields() {
        assert!(matches!(
            ProjectConfig::builder().artifact_id("x").build(),
            Err(DomainError::MissingRequiredField { field: "groupId" })
        ));
        assert!(minimal().package_name("com.acme.new").build().is_err());
        assert!(minimal().language_version("8").build().is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let yaml = "group-id: com.acme\nartifact-id: shop\narchitecture: hexagonal\nbuild-tool: gradle\ndependencies: [web]\nfeatures:\n  enable-api-docs: true\n";
        let cfg: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.architecture(), ArchitectureStyle::Hexagonal);
        assert_eq!(cfg.build_tool(), BuildTool::Gradle);
        assert!(cfg.features().enable_api_docs);

        let bad: Result<ProjectConfig, _> = serde_yaml::from_str("artifact-id: shop\n");
        assert!(bad.is_err());
    }

    #[test]
    fn to_builder_round_trips() {
        let cfg = minimal().dependency("web").build().unwrap();
        let again = cfg.to_builder().build().unwrap();
        assert_eq!(cfg, again);
    }
}
