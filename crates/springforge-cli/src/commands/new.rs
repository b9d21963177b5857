//! Implementation of the `springforge new` command.
//!
//! Responsibility: turn CLI arguments into a `ProjectConfig`, call the core
//! generation service, and display results. No generation logic lives here.

use std::io::IsTerminal as _;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument, warn};

use springforge_adapters::{LocalFilesystem, SimpleRenderer, resolve_catalogue};
use springforge_core::{
    application::{GeneratedProject, GenerationService},
    domain::{
        BuildTool, DependencyRegistry, Feature, FeatureFlags, ProjectConfig, ProjectConfigDraft,
        VersionCatalog, find_preset,
    },
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `springforge new` command.
///
/// 1. Layer configuration defaults, preset, project file and flags
/// 2. Warn about feature/dependency mismatches
/// 3. Confirm with the user unless `--yes`, `--dry-run` or non-interactive
/// 4. Generate (and write, unless `--dry-run`)
/// 5. Report
#[instrument(skip_all, fields(artifact = args.artifact_id.as_deref().unwrap_or("-")))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = build_project_config(&args, &config)?;
    debug!(%project, "Project configuration resolved");

    let registry = super::load_registry(&config.rule_files(&args.rules))?;
    for message in dependency_warnings(&project, &registry) {
        warn!("{message}");
        output.warning(&message)?;
    }

    if needs_confirmation(&args, &global, &output) {
        show_configuration(&project, &registry, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let catalogue = resolve_catalogue(config.template_dir(args.templates.as_deref()))?;
    let service = GenerationService::new(
        registry,
        Arc::new(VersionCatalog::builtin()),
        Box::new(SimpleRenderer::new(catalogue)),
        Box::new(LocalFilesystem::new()),
    );

    let spinner = output.spinner(&format!("Generating '{}'...", project.artifact_id()));
    let result = if args.dry_run {
        service.generate(&project)
    } else {
        service.generate_and_write(&project)
    };
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let generated = result?;

    info!(
        run_id = %generated.run_id,
        files = generated.file_count(),
        dry_run = args.dry_run,
        "Generation finished"
    );

    if args.dry_run {
        report_dry_run(&generated, &output)
    } else {
        report_written(&project, &generated, &output)
    }
}

// ── Configuration layering ───────────────────────────────────────────────────

/// Defaults, then preset, then project file, then flags.
pub(crate) fn build_project_config(args: &NewArgs, config: &AppConfig) -> CliResult<ProjectConfig> {
    let mut draft = defaults_draft(config);

    if let Some(id) = &args.preset {
        apply_preset(&mut draft, id)?;
    }
    if let Some(path) = &args.from {
        overlay(&mut draft, read_project_file(path)?);
    }
    apply_flags(&mut draft, args);

    draft.into_builder().build().map_err(|e| CliError::Core(e.into()))
}

fn defaults_draft(config: &AppConfig) -> ProjectConfigDraft {
    let defaults = &config.defaults;
    ProjectConfigDraft {
        group_id: Some(defaults.group_id.clone()),
        language_version: Some(defaults.language_version.clone()),
        build_tool: Some(defaults.build_tool),
        architecture: Some(defaults.architecture),
        platform_version: Some(defaults.platform_version.clone())
            .filter(|v| !v.trim().is_empty()),
        ..ProjectConfigDraft::default()
    }
}

fn apply_preset(draft: &mut ProjectConfigDraft, id: &str) -> CliResult<()> {
    let preset = find_preset(id).map_err(|_| CliError::UnknownPreset { id: id.to_string() })?;
    debug!(preset = preset.id, "Applying preset");

    draft.architecture = Some(preset.architecture);
    draft.language_version = Some(preset.language_version.to_string());
    draft
        .dependencies
        .extend(preset.dependencies.iter().map(|d| d.to_string()));
    draft.features = preset.features;
    Ok(())
}

/// Fields present in `top` replace those in `base`. Dependencies and
/// enabled features accumulate.
fn overlay(base: &mut ProjectConfigDraft, top: ProjectConfigDraft) {
    fn take<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    take(&mut base.group_id, top.group_id);
    take(&mut base.artifact_id, top.artifact_id);
    take(&mut base.name, top.name);
    take(&mut base.description, top.description);
    take(&mut base.package_name, top.package_name);
    take(&mut base.language_version, top.language_version);
    take(&mut base.build_tool, top.build_tool);
    take(&mut base.packaging, top.packaging);
    take(&mut base.architecture, top.architecture);
    take(&mut base.platform_version, top.platform_version);
    take(&mut base.output_dir, top.output_dir);

    base.dependencies.extend(top.dependencies);
    for feature in top.features.enabled() {
        base.features.set(feature, true);
    }
}

fn apply_flags(draft: &mut ProjectConfigDraft, args: &NewArgs) {
    let flags = ProjectConfigDraft {
        group_id: args.group_id.clone(),
        artifact_id: args.artifact_id.clone(),
        name: args.name.clone(),
        description: args.description.clone(),
        package_name: args.package_name.clone(),
        language_version: args.language_version.clone(),
        build_tool: args.build_tool,
        packaging: args.packaging,
        architecture: args.architecture,
        platform_version: args.platform_version.clone(),
        dependencies: args.dependencies.iter().cloned().collect(),
        features: FeatureFlags::none(),
        output_dir: args.output_dir.clone(),
    };
    overlay(draft, flags);

    if args.all_features {
        draft.features = FeatureFlags::all();
    }
    for feature in &args.enable {
        draft.features.set(*feature, true);
    }
    for feature in &args.disable {
        draft.features.set(*feature, false);
    }
}

/// Parse a TOML or JSON project description, chosen by extension.
fn read_project_file(path: &Path) -> CliResult<ProjectConfigDraft> {
    let fail = |reason: String| CliError::ProjectFile {
        path: path.to_path_buf(),
        reason,
    };

    let text = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&text).map_err(|e| fail(e.to_string())),
        Some("json") => serde_json::from_str(&text).map_err(|e| fail(e.to_string())),
        _ => Err(fail("expected a .toml or .json file".into())),
    }
}

// ── Feature/dependency checks ────────────────────────────────────────────────

/// Mismatches worth telling the user about. Nothing is changed.
pub(crate) fn dependency_warnings(project: &ProjectConfig, registry: &DependencyRegistry) -> Vec<String> {
    let mut warnings: Vec<String> = project
        .dependencies()
        .iter()
        .filter(|id| !registry.contains(id))
        .map(|id| format!("Unknown dependency '{id}' will be ignored"))
        .collect();

    let selected = registry.resolve_ids(project.dependencies());
    let has = |id: &str| selected.iter().any(|s| s == id);
    let features = project.features();

    if features.is_enabled(Feature::Auth) && !has("security") {
        warnings.push(
            "Feature 'auth' is enabled but the 'security' dependency is not selected".into(),
        );
    }
    if features.is_enabled(Feature::ApiDocs) && !has("web") {
        warnings.push("Feature 'api-docs' is enabled but the 'web' dependency is not selected".into());
    }
    warnings
}

// ── Reporting ────────────────────────────────────────────────────────────────

fn report_dry_run(generated: &GeneratedProject, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        let files: Vec<_> = generated
            .files
            .iter()
            .map(|(path, file)| {
                json!({
                    "path": path.to_string(),
                    "bytes": file.content.len(),
                    "origin": file.origin.to_string(),
                })
            })
            .collect();
        out.json(&json!({
            "root": generated.root.display().to_string(),
            "files": files,
        }))?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would create {} files under {}",
        generated.file_count(),
        generated.root.display()
    ))?;
    for (path, file) in generated.files.iter() {
        out.print(&format!("  {:<70} {:>7} B", path.to_string(), file.content.len()))?;
    }
    Ok(())
}

fn report_written(
    project: &ProjectConfig,
    generated: &GeneratedProject,
    out: &OutputManager,
) -> CliResult<()> {
    if out.is_json() {
        out.json(&json!({
            "root": generated.root.display().to_string(),
            "run_id": generated.run_id.to_string(),
            "files": generated.file_count(),
            "applied_rules": generated.applied_rules,
            "platform_version": generated.versions.platform_version,
            "version_fallback": generated.versions.fell_back,
            "infrastructure": generated.infrastructure_emitted,
        }))?;
        return Ok(());
    }

    if generated.versions.fell_back {
        out.warning(&format!(
            "Spring Boot {} is not in the version table; libraries pinned for {}",
            generated.versions.requested.as_deref().unwrap_or("(unset)"),
            generated.versions.versions.line,
        ))?;
    }
    for collision in &generated.property_collisions {
        out.warning(&format!(
            "Property '{}' from '{}' replaced the value from '{}'",
            collision.key, collision.overridden_by, collision.previous_rule
        ))?;
    }

    out.success(&format!(
        "Created '{}' ({} files) at {}",
        project.artifact_id(),
        generated.file_count(),
        generated.root.display()
    ))?;

    if !out.is_quiet() {
        out.print("")?;
        out.print("Next steps:")?;
        out.print(&format!("  cd {}", generated.root.display()))?;
        out.print(&format!("  {}", run_command(project.build_tool())))?;
    }
    Ok(())
}

fn run_command(tool: BuildTool) -> &'static str {
    match tool {
        BuildTool::Maven => "mvn spring-boot:run",
        BuildTool::Gradle => "gradle bootRun",
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn needs_confirmation(args: &NewArgs, global: &GlobalArgs, out: &OutputManager) -> bool {
    !args.yes
        && !args.dry_run
        && !global.quiet
        && !out.is_json()
        && std::io::stdin().is_terminal()
}

fn show_configuration(
    project: &ProjectConfig,
    registry: &DependencyRegistry,
    out: &OutputManager,
) -> CliResult<()> {
    let dependencies = registry.resolve_ids(project.dependencies());
    let features: Vec<&str> = project.features().enabled().map(|f| f.as_str()).collect();

    out.header("Configuration")?;
    out.print(&format!("  Coordinates:  {}:{}", project.group_id(), project.artifact_id()))?;
    out.print(&format!("  Package:      {}", project.package_name()))?;
    out.print(&format!("  Java:         {}", project.language_version()))?;
    out.print(&format!("  Build tool:   {}", project.build_tool()))?;
    out.print(&format!("  Architecture: {}", project.architecture()))?;
    out.print(&format!("  Dependencies: {}", join_or_none(&dependencies)))?;
    out.print(&format!("  Features:     {}", join_or_none(&features)))?;
    out.print(&format!("  Location:     {}", project.project_root().display()))?;
    out.print("")?;
    Ok(())
}

fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "none".into()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Generate this project?")
        .default(true)
        .interact()
        .map_err(|e| CliError::Usage {
            message: "confirmation prompt failed".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Generate this project? [Y/n] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|source| CliError::Io {
            context: "failed to read confirmation input".into(),
            source,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
