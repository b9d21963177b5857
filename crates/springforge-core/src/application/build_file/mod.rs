//! Idempotent patching of build descriptors.
//!
//! Both dialects run the same pipeline over plain text:
//!
//! 1. dialect preparation (Maven properties, Gradle compiler arguments)
//! 2. plugin section, synthesized only when absent
//! 3. platform BOM import, detected by its coordinate
//! 4. feature dependencies, each injected only if not yet declared
//! 5. test runner configuration
//! 6. whitespace normalization
//!
//! A step whose structural anchor is missing logs a warning and leaves the
//! text as it was. No step ever fails the generation.

pub mod gradle;
pub mod maven;
pub mod scanner;
pub mod whitespace;

pub use gradle::GradleMutator;
pub use maven::MavenMutator;
pub use scanner::Dialect;

use std::collections::HashSet;

use crate::domain::{
    Artifact, BuildTool, DependencyRegistry, DependencyRule, DependencyScope, Feature,
    FeatureFlags, LibraryVersions, ProjectConfig, VersionKey, VersionResolution,
};

/// Coordinates of the platform BOM. Its presence is detected by this string.
pub const PLATFORM_BOM_GROUP: &str = "org.springframework.boot";
pub const PLATFORM_BOM_ARTIFACT: &str = "spring-boot-dependencies";

/// Dependencies that jacoco coverage is attached to.
const COVERAGE_TRIGGERS: [&str; 3] = ["web", "webflux", "data-jpa"];

/// A library a feature toggle pulls into the build.
#[derive(Debug, Clone, Copy)]
pub struct FeatureArtifact {
    pub group_id: &'static str,
    pub artifact_id: &'static str,
    pub version: VersionKey,
    pub scope: DependencyScope,
}

impl FeatureArtifact {
    const fn new(
        group_id: &'static str,
        artifact_id: &'static str,
        version: VersionKey,
        scope: DependencyScope,
    ) -> Self {
        Self {
            group_id,
            artifact_id,
            version,
            scope,
        }
    }

    pub fn to_artifact(&self, versions: &LibraryVersions) -> Artifact {
        Artifact::new(self.group_id, self.artifact_id)
            .with_version(versions.get(self.version))
            .with_scope(self.scope)
    }
}

/// Feature libraries, in injection order.
pub static FEATURE_ARTIFACTS: &[(Feature, &[FeatureArtifact])] = &[
    (
        Feature::Auth,
        &[
            FeatureArtifact::new("io.jsonwebtoken", "jjwt-api", VersionKey::Jjwt, DependencyScope::Compile),
            FeatureArtifact::new("io.jsonwebtoken", "jjwt-impl", VersionKey::Jjwt, DependencyScope::Runtime),
            FeatureArtifact::new("io.jsonwebtoken", "jjwt-jackson", VersionKey::Jjwt, DependencyScope::Runtime),
        ],
    ),
    (
        Feature::ApiDocs,
        &[FeatureArtifact::new(
            "org.springdoc",
            "springdoc-openapi-starter-webmvc-ui",
            VersionKey::Springdoc,
            DependencyScope::Compile,
        )],
    ),
    (
        Feature::ObjectMapping,
        &[
            FeatureArtifact::new("org.mapstruct", "mapstruct", VersionKey::Mapstruct, DependencyScope::Compile),
            FeatureArtifact::new(
                "org.mapstruct",
                "mapstruct-processor",
                VersionKey::Mapstruct,
                DependencyScope::AnnotationProcessor,
            ),
            FeatureArtifact::new(
                "org.projectlombok",
                "lombok-mapstruct-binding",
                VersionKey::LombokMapstructBinding,
                DependencyScope::AnnotationProcessor,
            ),
        ],
    ),
];

/// Feature artifacts for the enabled toggles, in table order.
pub fn feature_artifacts(flags: &FeatureFlags) -> impl Iterator<Item = &'static FeatureArtifact> + '_ {
    FEATURE_ARTIFACTS
        .iter()
        .filter(|(feature, _)| flags.is_enabled(*feature))
        .flat_map(|(_, artifacts)| artifacts.iter())
}

/// Everything a patch step may consult.
pub struct PatchContext<'a> {
    pub config: &'a ProjectConfig,
    pub resolution: &'a VersionResolution,
    /// Selected rules in priority order.
    pub rules: Vec<&'a DependencyRule>,
}

impl PatchContext<'_> {
    pub fn versions(&self) -> &LibraryVersions {
        &self.resolution.versions
    }

    pub fn platform_version(&self) -> &str {
        &self.resolution.platform_version
    }

    pub fn features(&self) -> &FeatureFlags {
        self.config.features()
    }

    pub fn has_dependency(&self, id: &str) -> bool {
        self.rules.iter().any(|r| r.id == id)
    }

    /// Coverage is wired in when the project has code worth measuring.
    pub fn wants_coverage(&self) -> bool {
        COVERAGE_TRIGGERS.iter().any(|id| self.has_dependency(id))
    }
}

/// One build descriptor dialect.
///
/// Implementors supply the dialect-specific steps; [`patch`](Self::patch)
/// runs them in order and must be idempotent.
pub trait BuildFileMutator: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn build_tool(&self) -> BuildTool;

    fn registry(&self) -> &DependencyRegistry;

    /// Indentation of one entry inside the dependency section of a freshly
    /// rendered descriptor.
    fn dependency_indent(&self) -> &'static str;

    /// Declaration text for one artifact, unindented. `None` when this
    /// dialect declares the artifact some other way.
    fn declare(&self, artifact: &Artifact, versions: &LibraryVersions) -> Option<String>;

    /// Whether the text already declares this artifact.
    fn is_declared(&self, text: &str, group_id: &str, artifact_id: &str) -> bool;

    /// Free text (project name, description) made safe for the literal
    /// position it occupies in a freshly rendered descriptor.
    fn escape_text(&self, value: &str) -> String;

    /// Insert declarations into the dependency section.
    fn insert_dependencies(&self, text: String, declarations: &[String]) -> String;

    fn prepare(&self, text: String, _ctx: &PatchContext<'_>) -> String {
        text
    }

    fn ensure_plugins(&self, text: String, ctx: &PatchContext<'_>) -> String;

    fn ensure_bom(&self, text: String, ctx: &PatchContext<'_>) -> String;

    fn ensure_test_configuration(&self, text: String, ctx: &PatchContext<'_>) -> String;

    fn inject_feature_dependencies(&self, text: String, ctx: &PatchContext<'_>) -> String {
        let declarations: Vec<String> = feature_artifacts(ctx.features())
            .filter(|a| !self.is_declared(&text, a.group_id, a.artifact_id))
            .filter_map(|a| self.declare(&a.to_artifact(ctx.versions()), ctx.versions()))
            .collect();

        if declarations.is_empty() {
            return text;
        }
        self.insert_dependencies(text, &declarations)
    }

    /// Patch `existing` for the given project and resolved versions.
    fn patch(&self, existing: &str, config: &ProjectConfig, resolution: &VersionResolution) -> String {
        let ctx = PatchContext {
            config,
            resolution,
            rules: self.registry().rules_for(config.dependencies()),
        };

        let text = self.prepare(existing.to_string(), &ctx);
        let text = self.ensure_plugins(text, &ctx);
        let text = self.ensure_bom(text, &ctx);
        let text = self.inject_feature_dependencies(text, &ctx);
        let text = self.ensure_test_configuration(text, &ctx);
        whitespace::normalize(&text, self.dialect())
    }

    /// Dependency declarations contributed by the selected rules, one per
    /// line group, indented for a freshly rendered descriptor.
    ///
    /// Coordinates repeated across rules are emitted once, first rule wins.
    fn dependency_section(&self, rules: &[&DependencyRule], versions: &LibraryVersions) -> String {
        let mut seen = HashSet::new();
        let mut out = String::new();

        for rule in rules {
            for artifact in rule.build.dependencies_for(self.build_tool()) {
                let key = (artifact.coordinate(), artifact.scope);
                if !seen.insert(key) {
                    continue;
                }
                if let Some(declaration) = self.declare(artifact, versions) {
                    out.push_str(&indent_lines(&declaration, self.dependency_indent()));
                }
            }
        }

        out.trim_end_matches('\n').to_string()
    }
}

/// The mutator for a build tool.
pub fn mutator_for(tool: BuildTool, registry: &DependencyRegistry) -> Box<dyn BuildFileMutator + '_> {
    match tool {
        BuildTool::Maven => Box::new(MavenMutator::new(registry)),
        BuildTool::Gradle => Box::new(GradleMutator::new(registry)),
    }
}

/// Prefix every non-empty line with `indent` and terminate each with `\n`.
pub(crate) fn indent_lines(block: &str, indent: &str) -> String {
    let mut out = String::with_capacity(block.len() + indent.len() * 8);
    for line in block.lines() {
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
