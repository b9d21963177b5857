//! `build.gradle` dialect.
//!
//! Blocks are located with the brace scanner, so a `dependencies { }` block
//! containing nested closures is closed at its true brace.

use tracing::warn;

use super::scanner::{Dialect, find_block, indentation_at, insert_lines_before};
use super::{BuildFileMutator, PLATFORM_BOM_ARTIFACT, PLATFORM_BOM_GROUP, PatchContext, indent_lines};
use crate::domain::{Artifact, BuildTool, DependencyRegistry, Feature, LibraryVersions};

const UNIT: &str = "    ";

pub struct GradleMutator<'r> {
    registry: &'r DependencyRegistry,
}

impl<'r> GradleMutator<'r> {
    pub fn new(registry: &'r DependencyRegistry) -> Self {
        Self { registry }
    }
}

impl BuildFileMutator for GradleMutator<'_> {
    fn dialect(&self) -> Dialect {
        Dialect::Brace
    }

    fn build_tool(&self) -> BuildTool {
        BuildTool::Gradle
    }

    fn registry(&self) -> &DependencyRegistry {
        self.registry
    }

    fn dependency_indent(&self) -> &'static str {
        UNIT
    }

    fn declare(&self, artifact: &Artifact, versions: &LibraryVersions) -> Option<String> {
        let notation = match &artifact.version {
            Some(v) => format!("{}:{}", artifact.coordinate(), versions.interpolate(v)),
            None => artifact.coordinate(),
        };
        Some(format!(
            "{} \"{notation}\"",
            artifact.scope.gradle_configuration()
        ))
    }

    fn is_declared(&self, text: &str, group_id: &str, artifact_id: &str) -> bool {
        let coordinate = format!("{group_id}:{artifact_id}");
        [':', '"', '\'']
            .iter()
            .any(|end| text.contains(&format!("{coordinate}{end}")))
    }

    /// Values land inside single-quoted strings.
    fn escape_text(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                c => out.push(c),
            }
        }
        out
    }

    fn insert_dependencies(&self, text: String, declarations: &[String]) -> String {
        let Some(block) = find_block(&text, "dependencies") else {
            warn!(step = "feature-dependencies", "No dependencies block, step skipped");
            return text;
        };

        let indent = format!("{}{UNIT}", indentation_at(&text, block.close));
        let lines: String = declarations.iter().map(|d| indent_lines(d, &indent)).collect();
        insert_lines_before(&text, block.close, &lines)
    }

    /// Append a `JavaCompile` block carrying rule compiler arguments.
    fn prepare(&self, text: String, ctx: &PatchContext<'_>) -> String {
        if text.contains("tasks.withType(JavaCompile)") {
            return text;
        }

        let mut args: Vec<&str> = Vec::new();
        if ctx.features().is_enabled(Feature::ObjectMapping) {
            args.push("-Amapstruct.defaultComponentModel=spring");
        }
        for rule in &ctx.rules {
            for option in &rule.build.gradle.compiler_options {
                if !args.contains(&option.as_str()) {
                    args.push(option);
                }
            }
        }
        if args.is_empty() {
            return text;
        }

        let quoted: Vec<String> = args.iter().map(|a| format!("'{a}'")).collect();
        format!(
            "{}\n\ntasks.withType(JavaCompile).configureEach {{\n{UNIT}options.compilerArgs.addAll([{}])\n}}\n",
            text.trim_end(),
            quoted.join(", ")
        )
    }

    /// Prepend a `plugins { }` block, after `buildscript { }` if one exists.
    fn ensure_plugins(&self, text: String, ctx: &PatchContext<'_>) -> String {
        if find_block(&text, "plugins").is_some() {
            return text;
        }

        let mut plugins = vec![
            "id 'java'".to_string(),
            format!("id 'org.springframework.boot' version '{}'", ctx.platform_version()),
            format!(
                "id 'io.spring.dependency-management' version '{}'",
                ctx.versions().dependency_management
            ),
        ];
        if ctx.wants_coverage() {
            plugins.push("id 'jacoco'".to_string());
        }
        for rule in &ctx.rules {
            for plugin in &rule.build.gradle.plugins {
                plugins.push(match &plugin.version {
                    Some(v) => format!("id '{}' version '{}'", plugin.id, ctx.versions().interpolate(v)),
                    None => format!("id '{}'", plugin.id),
                });
            }
        }

        let block = format!("plugins {{\n{}}}", indent_lines(&plugins.join("\n"), UNIT));
        match find_block(&text, "buildscript") {
            Some(bs) => format!("{}\n\n{block}\n{}", &text[..bs.end()], &text[bs.end()..]),
            None => format!("{block}\n\n{text}"),
        }
    }

    fn ensure_bom(&self, text: String, ctx: &PatchContext<'_>) -> String {
        if text.contains(PLATFORM_BOM_ARTIFACT) {
            return text;
        }
        let bom = format!(
            "mavenBom \"{PLATFORM_BOM_GROUP}:{PLATFORM_BOM_ARTIFACT}:{}\"",
            ctx.platform_version()
        );

        if let Some(dm) = find_block(&text, "dependencyManagement") {
            let inner_start = dm.open + 1;
            let (pos, lines) = match find_block(&text[inner_start..dm.close], "imports") {
                Some(imports) => (inner_start + imports.close, bom),
                None => (dm.close, format!("imports {{\n{UNIT}{bom}\n}}")),
            };
            let indent = format!("{}{UNIT}", indentation_at(&text, pos));
            return insert_lines_before(&text, pos, &indent_lines(&lines, &indent));
        }

        let Some(deps) = find_block(&text, "dependencies") else {
            warn!(step = "bom", "No dependencies block to anchor the BOM import, step skipped");
            return text;
        };
        let block = format!("dependencyManagement {{\n{UNIT}imports {{\n{UNIT}{UNIT}{bom}\n{UNIT}}}\n}}\n\n");
        let indent = indentation_at(&text, deps.start).to_string();
        insert_lines_before(&text, deps.start, &indent_lines(&block, &indent))
    }

    fn ensure_test_configuration(&self, text: String, _ctx: &PatchContext<'_>) -> String {
        let configured = text.contains("useJUnitPlatform")
            || text.contains("tasks.named('test')")
            || text.contains("tasks.named(\"test\")")
            || find_block(&text, "test").is_some();
        if configured {
            return text;
        }

        let mut block = String::from(
            "test {\n    useJUnitPlatform()\n    testLogging {\n        events \"passed\", \"skipped\", \"failed\"\n    }\n",
        );
        if text.contains("'jacoco'") {
            block.push_str("    finalizedBy jacocoTestReport\n");
        }
        block.push_str("}\n");

        format!("{}\n\n{block}", text.trim_end())
    }
}
