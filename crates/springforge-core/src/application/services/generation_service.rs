//! Generation orchestrator.
//!
//! Composes every pipeline stage into one in-memory [`GeneratedFileMap`].
//! Nothing touches the disk until [`GenerationService::generate_and_write`]
//! has a complete map in hand.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        build_file::{BuildFileMutator, mutator_for},
        ports::{Filesystem, TemplateRenderer},
        services::{ComposeOutcome, InfrastructureService, ScaffoldingService},
    },
    domain::{
        BuildTool, DependencyRegistry, Feature, FileOrigin, GeneratedFileMap, ProjectConfig,
        RelativePath, RenderContext, VersionCatalog, VersionKey, VersionResolution,
        architecture::{SLICE_PLACEHOLDER, find_architecture, resolve_blueprints},
        entities::render_context::escape_java_string,
        registry::PropertyCollision,
    },
    error::SpringforgeResult,
};

/// Version written into generated descriptors.
const PROJECT_VERSION: &str = "0.0.1-SNAPSHOT";

const JAVA_MAIN: &str = "src/main/java";
const JAVA_TEST: &str = "src/test/java";
const RUNTIME_CONFIG: &str = "src/main/resources/application.properties";
const COMPOSE_FILE: &str = "docker-compose.yml";

/// Template ids the orchestrator renders besides architecture blueprints.
pub const PROJECT_TEMPLATES: &[&str] = &[
    "app/Application",
    "app/ApplicationTest",
    "project/gitignore",
    "project/readme",
    "build/pom",
    "build/gradle",
    "build/settings-gradle",
    "ops/dockerfile",
    "ops/k8s-deployment",
    "ops/k8s-service",
    "ops/k8s-configmap",
    "ops/github-ci",
];

/// Ops files and the feature that turns each on.
const OPS_FILES: &[(Feature, &str, &str)] = &[
    (Feature::ContainerFiles, "ops/dockerfile", "Dockerfile"),
    (Feature::OrchestrationManifests, "ops/k8s-deployment", "k8s/deployment.yaml"),
    (Feature::OrchestrationManifests, "ops/k8s-service", "k8s/service.yaml"),
    (Feature::OrchestrationManifests, "ops/k8s-configmap", "k8s/configmap.yaml"),
    (Feature::PipelineConfig, "ops/github-ci", ".github/workflows/ci.yml"),
];

/// Properties a feature adds unless a rule already set them.
const FEATURE_PROPERTIES: &[(Feature, &str, &str)] = &[
    (Feature::Auth, "jwt.secret", "${JWT_SECRET:change-me-to-a-256-bit-secret-before-deploying}"),
    (Feature::Auth, "jwt.expiration", "86400000"),
    (Feature::ApiDocs, "springdoc.api-docs.path", "/api-docs"),
    (Feature::ApiDocs, "springdoc.swagger-ui.path", "/swagger-ui.html"),
];

/// Everything one generation run produced.
#[derive(Debug, Clone)]
pub struct GeneratedProject {
    pub files: GeneratedFileMap,
    /// `<output_dir>/<artifact_id>`
    pub root: PathBuf,
    /// Identifies the run in logs. Never written into file contents.
    pub run_id: Uuid,
    /// Canonical rule ids in priority order.
    pub applied_rules: Vec<String>,
    pub versions: VersionResolution,
    pub property_collisions: Vec<PropertyCollision>,
    pub infrastructure_emitted: bool,
}

impl GeneratedProject {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Absolute location of a generated file.
    pub fn target(&self, path: &RelativePath) -> PathBuf {
        self.root.join(path.to_path_buf())
    }
}

/// Main orchestration service.
///
/// Registry and version catalogue are shared read-only; the renderer and
/// filesystem are the two driven ports.
pub struct GenerationService {
    registry: Arc<DependencyRegistry>,
    catalog: Arc<VersionCatalog>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    scaffolding: ScaffoldingService,
    infrastructure: InfrastructureService,
}

impl GenerationService {
    pub fn new(
        registry: Arc<DependencyRegistry>,
        catalog: Arc<VersionCatalog>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            scaffolding: ScaffoldingService::new(Arc::clone(&registry)),
            infrastructure: InfrastructureService::new(Arc::clone(&registry)),
            registry,
            catalog,
            renderer,
            filesystem,
        }
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }

    /// Compose the full file tree for `config` without writing anything.
    #[instrument(
        skip_all,
        fields(
            artifact = %config.artifact_id(),
            architecture = %config.architecture(),
            build_tool = %config.build_tool(),
        )
    )]
    pub fn generate(&self, config: &ProjectConfig) -> SpringforgeResult<GeneratedProject> {
        let root = config.project_root();
        if self.filesystem.exists(&root) {
            return Err(ApplicationError::ProjectExists { path: root }.into());
        }

        let run_id = Uuid::new_v4();
        info!(%run_id, "Starting generation");

        let resolution = self.catalog.resolve(Some(config.platform_version()));
        let rules = self.registry.rules_for(config.dependencies());
        let applied_rules: Vec<String> = rules.iter().map(|r| r.id.clone()).collect();
        debug!(rules = ?applied_rules, line = resolution.versions.line, "Inputs resolved");

        let mutator = mutator_for(config.build_tool(), &self.registry);
        let mut ctx = base_context(config, &resolution);
        ctx.set(
            "dependencies",
            mutator.dependency_section(&rules, &resolution.versions),
        );

        let mut files = GeneratedFileMap::new();
        self.emit_skeleton(&mut files, config, &ctx)?;
        self.emit_blueprints(&mut files, config, &ctx)?;
        self.emit_build_files(&mut files, config, &ctx, &resolution, mutator.as_ref())?;
        let property_collisions = self.emit_runtime_config(&mut files, config, &ctx)?;
        self.emit_scaffolding(&mut files, config)?;
        let infrastructure_emitted = self.emit_ops(&mut files, config, &ctx)?;

        info!(
            files = files.len(),
            bytes = files.total_bytes(),
            collisions = property_collisions.len(),
            "Generation complete"
        );

        Ok(GeneratedProject {
            files,
            root,
            run_id,
            applied_rules,
            versions: resolution,
            property_collisions,
            infrastructure_emitted,
        })
    }

    /// Generate, then flush to disk. A failed write removes the project root.
    #[instrument(skip_all, fields(artifact = %config.artifact_id()))]
    pub fn generate_and_write(&self, config: &ProjectConfig) -> SpringforgeResult<GeneratedProject> {
        let project = self.generate(config)?;

        match self.write_all(&project) {
            Ok(()) => {
                info!(root = %project.root.display(), "Project written");
                Ok(project)
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(&project.root);
                Err(e)
            }
        }
    }

    // ── Stages ───────────────────────────────────────────────────────────────

    fn emit_skeleton(
        &self,
        files: &mut GeneratedFileMap,
        config: &ProjectConfig,
        ctx: &RenderContext,
    ) -> SpringforgeResult<()> {
        let pkg_dir = config.package_path();
        let app_class = config.application_class();

        let entries = [
            ("app/Application", format!("{JAVA_MAIN}/{pkg_dir}/{app_class}.java"), app_class.clone()),
            (
                "app/ApplicationTest",
                format!("{JAVA_TEST}/{pkg_dir}/{app_class}Tests.java"),
                format!("{app_class}Tests"),
            ),
            ("project/gitignore", ".gitignore".to_string(), String::new()),
            ("project/readme", "README.md".to_string(), String::new()),
        ];

        for (template_id, path, class_name) in entries {
            let file_ctx = ctx
                .clone()
                .with_variable("package", config.package_name())
                .with_variable("className", class_name);
            let content = self.renderer.render(template_id, &file_ctx)?;
            insert(files, &path, content, FileOrigin::Skeleton)?;
        }
        Ok(())
    }

    fn emit_blueprints(
        &self,
        files: &mut GeneratedFileMap,
        config: &ProjectConfig,
        ctx: &RenderContext,
    ) -> SpringforgeResult<()> {
        let entity = config.entity_name();
        let slice = config.slice_name();
        let pkg_dir = config.package_path();
        let tasks = resolve_blueprints(config.architecture(), config.features());
        debug!(tasks = tasks.len(), "Blueprints resolved");

        for task in tasks {
            let file_name = task.file_name.resolve(&entity);
            let class_name = file_name.strip_suffix(".java").unwrap_or(&file_name).to_string();
            let file_ctx = ctx
                .clone()
                .with_variable(
                    "package",
                    format!("{}.{}", config.package_name(), task.package_suffix(&slice)),
                )
                .with_variable("className", class_name);

            let content = self.renderer.render(task.template_id, &file_ctx)?;
            let path = format!("{JAVA_MAIN}/{pkg_dir}/{}/{file_name}", task.directory_for(&slice));
            insert(
                files,
                &path,
                content,
                FileOrigin::Blueprint {
                    template_id: task.template_id.to_string(),
                },
            )?;
        }
        Ok(())
    }

    fn emit_build_files(
        &self,
        files: &mut GeneratedFileMap,
        config: &ProjectConfig,
        ctx: &RenderContext,
        resolution: &VersionResolution,
        mutator: &dyn BuildFileMutator,
    ) -> SpringforgeResult<()> {
        let tool = config.build_tool();
        let template_id = match tool {
            BuildTool::Maven => "build/pom",
            BuildTool::Gradle => "build/gradle",
        };

        let mut build_ctx = ctx.clone();
        for key in FREE_TEXT_VARIABLES {
            if let Some(value) = ctx.get(key) {
                build_ctx.set(key, mutator.escape_text(value));
            }
        }

        let base = self.renderer.render(template_id, &build_ctx)?;
        let patched = mutator.patch(&base, config, resolution);
        insert(files, tool.build_file(), patched, FileOrigin::BuildFile)?;

        if tool == BuildTool::Gradle {
            let settings = self.renderer.render("build/settings-gradle", ctx)?;
            insert(files, "settings.gradle", settings, FileOrigin::BuildFile)?;
        }
        Ok(())
    }

    fn emit_runtime_config(
        &self,
        files: &mut GeneratedFileMap,
        config: &ProjectConfig,
        ctx: &RenderContext,
    ) -> SpringforgeResult<Vec<PropertyCollision>> {
        let aggregation = self.registry.aggregate_properties(config.dependencies());

        let mut properties: BTreeMap<String, String> = aggregation
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), ctx.render(v)))
            .collect();
        for (feature, key, value) in FEATURE_PROPERTIES {
            if config.features().is_enabled(*feature) {
                properties
                    .entry((*key).to_string())
                    .or_insert_with(|| (*value).to_string());
            }
        }
        properties.remove("spring.application.name");

        let mut content = format!("spring.application.name={}\n", config.artifact_id());
        for (key, value) in &properties {
            content.push_str(key);
            content.push('=');
            content.push_str(value);
            content.push('\n');
        }

        insert(files, RUNTIME_CONFIG, content, FileOrigin::RuntimeConfig)?;
        Ok(aggregation.collisions)
    }

    fn emit_scaffolding(
        &self,
        files: &mut GeneratedFileMap,
        config: &ProjectConfig,
    ) -> SpringforgeResult<()> {
        for file in self
            .scaffolding
            .generate(config.dependencies(), config.package_name())?
        {
            files.insert(
                file.path,
                file.content,
                FileOrigin::Scaffolding {
                    dependency: file.dependency,
                },
            )?;
        }
        Ok(())
    }

    /// Returns whether a compose document was emitted.
    fn emit_ops(
        &self,
        files: &mut GeneratedFileMap,
        config: &ProjectConfig,
        ctx: &RenderContext,
    ) -> SpringforgeResult<bool> {
        let features = config.features();

        for (feature, template_id, path) in OPS_FILES {
            if features.is_enabled(*feature) {
                let content = self.renderer.render(template_id, ctx)?;
                insert(files, path, content, FileOrigin::Ops)?;
            }
        }

        if !features.is_enabled(Feature::ContainerFiles) {
            return Ok(false);
        }

        match self.infrastructure.compose(config.dependencies()) {
            ComposeOutcome::NotNeeded => {
                debug!("No container services, compose file skipped");
                Ok(false)
            }
            ComposeOutcome::Compose(document) => {
                let yaml = ctx.render(&document.to_yaml()?);
                insert(files, COMPOSE_FILE, yaml, FileOrigin::Infrastructure)?;
                Ok(true)
            }
        }
    }

    // ── Write ────────────────────────────────────────────────────────────────

    fn write_all(&self, project: &GeneratedProject) -> SpringforgeResult<()> {
        self.filesystem.create_dir_all(&project.root)?;

        for (path, file) in project.files.iter() {
            let target = project.target(path);
            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&target, &file.content)?;
        }
        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

fn insert(
    files: &mut GeneratedFileMap,
    path: &str,
    content: String,
    origin: FileOrigin,
) -> SpringforgeResult<()> {
    files.insert(RelativePath::try_new(path)?, content, origin)?;
    Ok(())
}

/// User-supplied text that lands inside literals of the build descriptor.
const FREE_TEXT_VARIABLES: [&str; 2] = ["name", "description"];

/// Variables shared by every template of one run.
fn base_context(config: &ProjectConfig, resolution: &VersionResolution) -> RenderContext {
    let (build_command, jar_path) = match config.build_tool() {
        BuildTool::Maven => ("mvn -B verify", "target/*.jar"),
        BuildTool::Gradle => ("gradle build --no-daemon", "build/libs/*.jar"),
    };

    let mut ctx = RenderContext::new()
        .with_variable("groupId", config.group_id())
        .with_variable("artifactId", config.artifact_id())
        .with_variable("name", config.name())
        .with_variable("description", config.description())
        .with_variable("version", PROJECT_VERSION)
        .with_variable("basePackage", config.package_name())
        .with_variable("packagePath", config.package_path())
        .with_variable("javaVersion", config.language_version())
        .with_variable("bootVersion", resolution.platform_version.as_str())
        .with_variable("packaging", config.packaging().as_str())
        .with_variable("buildTool", config.build_tool().as_str())
        .with_variable("appClass", config.application_class())
        .with_variable("entity", config.entity_name())
        .with_variable("entityVar", config.entity_variable())
        .with_variable("slice", config.slice_name())
        .with_variable("architecture", config.architecture().as_str())
        .with_variable("buildCommand", build_command)
        .with_variable("jarPath", jar_path)
        .with_variable("literal.name", escape_java_string(config.name()))
        .with_variable("literal.description", escape_java_string(config.description()));

    for key in VersionKey::ALL {
        ctx.set(format!("versions.{key}"), resolution.versions.get(key));
    }

    if let Some(def) = find_architecture(config.architecture()) {
        let slice = config.slice_name();
        for layer in def.known_layers() {
            let package = def.package_for(layer).replace(SLICE_PLACEHOLDER, &slice);
            ctx.set(
                format!("package.{layer}"),
                format!("{}.{package}", config.package_name()),
            );
        }
    }

    ctx
}
