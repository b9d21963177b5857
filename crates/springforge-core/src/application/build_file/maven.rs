//! `pom.xml` dialect.
//!
//! Regions are located with plain start/end tag search. The project-level
//! `<dependencies>` element is the first one outside `<dependencyManagement>`,
//! `<build>` and `<profiles>`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::scanner::{
    Dialect, TagElement, find_element, find_element_outside, find_elements, in_literal,
    indentation_at, insert_lines_before, literal_spans,
};
use super::{BuildFileMutator, PLATFORM_BOM_ARTIFACT, PLATFORM_BOM_GROUP, PatchContext, indent_lines};
use crate::domain::{
    Artifact, BuildTool, DependencyRegistry, DependencyScope, Feature, LibraryVersions,
    entities::MavenPlugin,
};

const UNIT: &str = "    ";

static PROPERTY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"<(java\.version|maven\.compiler\.source|maven\.compiler\.target|lombok\.version)>[^<]*</(?:java\.version|maven\.compiler\.source|maven\.compiler\.target|lombok\.version)>",
    )
    .expect("property tag pattern compiles")
});

pub struct MavenMutator<'r> {
    registry: &'r DependencyRegistry,
}

impl<'r> MavenMutator<'r> {
    pub fn new(registry: &'r DependencyRegistry) -> Self {
        Self { registry }
    }
}

fn project_dependencies(text: &str) -> Option<TagElement> {
    find_element_outside(
        text,
        "dependencies",
        &["dependencyManagement", "build", "profiles"],
    )
}

/// Trimmed text of the first `<tag>` child.
fn leaf_value<'t>(text: &'t str, tag: &str) -> Option<&'t str> {
    find_element(text, tag).map(|e| e.inner(text).trim())
}

fn project_element(text: &str, tag: &str) -> Option<TagElement> {
    find_element_outside(text, tag, &["profiles"])
}

fn plugins_element(text: &str) -> Option<TagElement> {
    find_element_outside(text, "plugins", &["pluginManagement", "profiles", "reporting"])
}

impl BuildFileMutator for MavenMutator<'_> {
    fn dialect(&self) -> Dialect {
        Dialect::Tag
    }

    fn build_tool(&self) -> BuildTool {
        BuildTool::Maven
    }

    fn registry(&self) -> &DependencyRegistry {
        self.registry
    }

    fn dependency_indent(&self) -> &'static str {
        "        "
    }

    /// Annotation processors go on the compiler plugin's processor path
    /// instead of the dependency list.
    fn declare(&self, artifact: &Artifact, versions: &LibraryVersions) -> Option<String> {
        if artifact.scope == DependencyScope::AnnotationProcessor {
            return None;
        }

        let mut xml = Xml::new();
        xml.open("dependency")
            .leaf("groupId", &artifact.group_id)
            .leaf("artifactId", &artifact.artifact_id);
        if let Some(version) = &artifact.version {
            xml.leaf("version", &versions.interpolate(version));
        }
        if let Some(scope) = artifact.scope.maven_scope() {
            xml.leaf("scope", scope);
        }
        xml.close("dependency");
        Some(xml.finish())
    }

    /// Both coordinates must sit in the same `<dependency>` of the
    /// project-level list.
    fn is_declared(&self, text: &str, group_id: &str, artifact_id: &str) -> bool {
        let Some(deps) = project_dependencies(text) else {
            return false;
        };
        let list = deps.inner(text);
        find_elements(list, "dependency").iter().any(|dep| {
            let body = dep.inner(list);
            leaf_value(body, "groupId") == Some(group_id)
                && leaf_value(body, "artifactId") == Some(artifact_id)
        })
    }

    fn escape_text(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&apos;"),
                c => out.push(c),
            }
        }
        out
    }

    fn insert_dependencies(&self, text: String, declarations: &[String]) -> String {
        let Some(deps) = project_dependencies(&text) else {
            warn!(step = "feature-dependencies", "No <dependencies> element, step skipped");
            return text;
        };

        let indent = format!("{}{UNIT}", indentation_at(&text, deps.close_start));
        let block: String = declarations.iter().map(|d| indent_lines(d, &indent)).collect();
        insert_lines_before(&text, deps.close_start, &block)
    }

    /// Pin `java.version`, the compiler release properties and
    /// `lombok.version`. Existing values are rewritten in place.
    fn prepare(&self, text: String, ctx: &PatchContext<'_>) -> String {
        let language = ctx.config.language_version();
        let wanted = [
            ("java.version", language),
            ("maven.compiler.source", language),
            ("maven.compiler.target", language),
            ("lombok.version", ctx.versions().lombok),
        ];

        let spans = literal_spans(&text, Dialect::Tag);
        let mut seen = BTreeSet::new();
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in PROPERTY_TAG.captures_iter(&text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if in_literal(&spans, whole.start()) {
                continue;
            }
            let Some((key, value)) = wanted.iter().find(|(k, _)| *k == name.as_str()) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            out.push_str(&format!("<{key}>{value}</{key}>"));
            last = whole.end();
            seen.insert(*key);
        }
        out.push_str(&text[last..]);

        let missing: Vec<String> = wanted
            .iter()
            .filter(|(k, _)| !seen.contains(k))
            .map(|(k, v)| format!("<{k}>{v}</{k}>"))
            .collect();
        if missing.is_empty() {
            return out;
        }
        insert_properties(out, &missing.join("\n"))
    }

    fn ensure_plugins(&self, text: String, ctx: &PatchContext<'_>) -> String {
        if plugins_element(&text).is_some() {
            return text;
        }

        let plugins = plugin_section(ctx);
        if let Some(build) = project_element(&text, "build") {
            let indent = format!("{}{UNIT}", indentation_at(&text, build.close_start));
            return insert_lines_before(&text, build.close_start, &indent_lines(&plugins, &indent));
        }

        let Some(project) = find_element(&text, "project") else {
            warn!(step = "plugins", "No <project> element, step skipped");
            return text;
        };
        let block = format!("<build>\n{}</build>", indent_lines(&plugins, UNIT));
        let indent = format!("{}{UNIT}", indentation_at(&text, project.close_start));
        insert_lines_before(&text, project.close_start, &indent_lines(&block, &indent))
    }

    fn ensure_bom(&self, text: String, ctx: &PatchContext<'_>) -> String {
        if text.contains(PLATFORM_BOM_ARTIFACT) {
            return text;
        }

        let mut bom = Xml::new();
        bom.open("dependency")
            .leaf("groupId", PLATFORM_BOM_GROUP)
            .leaf("artifactId", PLATFORM_BOM_ARTIFACT)
            .leaf("version", ctx.platform_version())
            .leaf("type", "pom")
            .leaf("scope", "import")
            .close("dependency");
        let bom = bom.finish();

        if let Some(dm) = project_element(&text, "dependencyManagement") {
            let (pos, block) = match find_element(dm.inner(&text), "dependencies") {
                Some(deps) => (dm.open_end + deps.close_start, bom),
                None => (
                    dm.close_start,
                    format!("<dependencies>\n{}</dependencies>", indent_lines(&bom, UNIT)),
                ),
            };
            let indent = format!("{}{UNIT}", indentation_at(&text, pos));
            return insert_lines_before(&text, pos, &indent_lines(&block, &indent));
        }

        let Some(deps) = project_dependencies(&text) else {
            warn!(step = "bom", "No <dependencies> element to anchor the BOM import, step skipped");
            return text;
        };
        let block = format!(
            "<dependencyManagement>\n{UNIT}<dependencies>\n{}{UNIT}</dependencies>\n</dependencyManagement>",
            indent_lines(&bom, &UNIT.repeat(2))
        );
        let indent = indentation_at(&text, deps.open_start).to_string();
        insert_lines_before(&text, deps.open_start, &indent_lines(&block, &indent))
    }

    fn ensure_test_configuration(&self, text: String, ctx: &PatchContext<'_>) -> String {
        if text.contains("maven-surefire-plugin") {
            return text;
        }
        let Some(plugins) = plugins_element(&text) else {
            warn!(step = "test-configuration", "No <plugins> element, step skipped");
            return text;
        };

        let mut xml = Xml::new();
        surefire_plugin(&mut xml, ctx);
        let indent = format!("{}{UNIT}", indentation_at(&text, plugins.close_start));
        insert_lines_before(&text, plugins.close_start, &indent_lines(&xml.finish(), &indent))
    }
}

fn insert_properties(text: String, entries: &str) -> String {
    if let Some(props) = project_element(&text, "properties") {
        let indent = format!("{}{UNIT}", indentation_at(&text, props.close_start));
        return insert_lines_before(&text, props.close_start, &indent_lines(entries, &indent));
    }

    let block = format!("<properties>\n{}</properties>", indent_lines(entries, UNIT));
    let anchor = [
        project_element(&text, "dependencyManagement"),
        project_dependencies(&text),
        project_element(&text, "build"),
    ]
    .into_iter()
    .flatten()
    .map(|e| e.open_start)
    .min();

    if let Some(pos) = anchor {
        let indent = indentation_at(&text, pos).to_string();
        return insert_lines_before(&text, pos, &indent_lines(&block, &indent));
    }
    match find_element(&text, "project") {
        Some(project) => {
            let indent = format!("{}{UNIT}", indentation_at(&text, project.close_start));
            insert_lines_before(&text, project.close_start, &indent_lines(&block, &indent))
        }
        None => {
            warn!(step = "properties", "No <project> element, step skipped");
            text
        }
    }
}

// ── Plugin synthesis ─────────────────────────────────────────────────────────

fn plugin_section(ctx: &PatchContext<'_>) -> String {
    let mut xml = Xml::new();
    xml.open("plugins");
    boot_plugin(&mut xml, ctx);
    compiler_plugin(&mut xml, ctx);
    surefire_plugin(&mut xml, ctx);
    failsafe_plugin(&mut xml, ctx);
    if ctx.wants_coverage() {
        jacoco_plugin(&mut xml, ctx);
    }
    enforcer_plugin(&mut xml, ctx);
    for rule in &ctx.rules {
        for plugin in &rule.build.maven.plugins {
            rule_plugin(&mut xml, plugin, ctx.versions());
        }
    }
    xml.close("plugins");
    xml.finish()
}

fn plugin_header(xml: &mut Xml, group_id: &str, artifact_id: &str, version: &str) {
    xml.open("plugin")
        .leaf("groupId", group_id)
        .leaf("artifactId", artifact_id)
        .leaf("version", version);
}

fn goals(xml: &mut Xml, goals: &[&str]) {
    xml.open("goals");
    for goal in goals {
        xml.leaf("goal", goal);
    }
    xml.close("goals");
}

fn boot_plugin(xml: &mut Xml, ctx: &PatchContext<'_>) {
    plugin_header(xml, PLATFORM_BOM_GROUP, "spring-boot-maven-plugin", ctx.platform_version());
    if ctx.has_dependency("lombok") {
        xml.open("configuration")
            .open("excludes")
            .open("exclude")
            .leaf("groupId", "org.projectlombok")
            .leaf("artifactId", "lombok")
            .close("exclude")
            .close("excludes")
            .close("configuration");
    }
    xml.open("executions").open("execution");
    goals(xml, &["repackage"]);
    xml.close("execution").close("executions").close("plugin");
}

fn compiler_plugin(xml: &mut Xml, ctx: &PatchContext<'_>) {
    let versions = ctx.versions();
    let mapping = ctx.features().is_enabled(Feature::ObjectMapping);
    let lombok = ctx.has_dependency("lombok");

    plugin_header(
        xml,
        "org.apache.maven.plugins",
        "maven-compiler-plugin",
        versions.maven_compiler_plugin,
    );
    xml.open("configuration")
        .leaf("source", "${java.version}")
        .leaf("target", "${java.version}");

    if mapping || lombok {
        xml.open("annotationProcessorPaths");
        if mapping {
            processor_path(xml, "org.mapstruct", "mapstruct-processor", versions.mapstruct);
        }
        if lombok {
            processor_path(xml, "org.projectlombok", "lombok", "${lombok.version}");
        }
        if mapping && lombok {
            processor_path(
                xml,
                "org.projectlombok",
                "lombok-mapstruct-binding",
                versions.lombok_mapstruct_binding,
            );
        }
        xml.close("annotationProcessorPaths");
    }
    if mapping {
        xml.open("compilerArgs")
            .leaf("arg", "-Amapstruct.defaultComponentModel=spring")
            .close("compilerArgs");
    }
    xml.close("configuration").close("plugin");
}

fn processor_path(xml: &mut Xml, group_id: &str, artifact_id: &str, version: &str) {
    xml.open("path")
        .leaf("groupId", group_id)
        .leaf("artifactId", artifact_id)
        .leaf("version", version)
        .close("path");
}

fn surefire_plugin(xml: &mut Xml, ctx: &PatchContext<'_>) {
    // jacoco's prepare-agent publishes @{argLine}; without it the token would reach the JVM
    let arg_line = if ctx.wants_coverage() {
        "@{argLine} -Xmx1024m"
    } else {
        "-Xmx1024m"
    };
    plugin_header(xml, "org.apache.maven.plugins", "maven-surefire-plugin", ctx.versions().surefire);
    xml.open("configuration")
        .leaf("argLine", arg_line)
        .open("includes")
        .leaf("include", "**/*Test.java")
        .leaf("include", "**/*Tests.java")
        .close("includes")
        .close("configuration")
        .close("plugin");
}

fn failsafe_plugin(xml: &mut Xml, ctx: &PatchContext<'_>) {
    plugin_header(xml, "org.apache.maven.plugins", "maven-failsafe-plugin", ctx.versions().failsafe);
    xml.open("configuration")
        .open("includes")
        .leaf("include", "**/*IT.java")
        .leaf("include", "**/*IntegrationTest.java")
        .close("includes")
        .close("configuration")
        .open("executions")
        .open("execution");
    goals(xml, &["integration-test", "verify"]);
    xml.close("execution").close("executions").close("plugin");
}

fn jacoco_plugin(xml: &mut Xml, ctx: &PatchContext<'_>) {
    plugin_header(xml, "org.jacoco", "jacoco-maven-plugin", ctx.versions().jacoco);
    xml.open("executions");

    xml.open("execution").leaf("id", "prepare-agent");
    goals(xml, &["prepare-agent"]);
    xml.close("execution");

    xml.open("execution").leaf("id", "report").leaf("phase", "test");
    goals(xml, &["report"]);
    xml.close("execution");

    xml.open("execution").leaf("id", "check");
    goals(xml, &["check"]);
    xml.open("configuration")
        .open("rules")
        .open("rule")
        .leaf("element", "BUNDLE")
        .open("limits")
        .open("limit")
        .leaf("counter", "LINE")
        .leaf("value", "COVEREDRATIO")
        .leaf("minimum", "0.50")
        .close("limit")
        .close("limits")
        .close("rule")
        .close("rules")
        .close("configuration")
        .close("execution");

    xml.close("executions").close("plugin");
}

fn enforcer_plugin(xml: &mut Xml, ctx: &PatchContext<'_>) {
    plugin_header(xml, "org.apache.maven.plugins", "maven-enforcer-plugin", ctx.versions().enforcer);
    xml.open("executions").open("execution").leaf("id", "enforce-versions");
    goals(xml, &["enforce"]);
    xml.open("configuration")
        .open("rules")
        .open("requireMavenVersion")
        .leaf("version", "[3.6.0,)")
        .close("requireMavenVersion")
        .open("requireJavaVersion")
        .leaf("version", "[17,)")
        .close("requireJavaVersion")
        .close("rules")
        .close("configuration")
        .close("execution")
        .close("executions")
        .close("plugin");
}

fn rule_plugin(xml: &mut Xml, plugin: &MavenPlugin, versions: &LibraryVersions) {
    xml.open("plugin")
        .leaf("groupId", &plugin.group_id)
        .leaf("artifactId", &plugin.artifact_id);
    if let Some(version) = &plugin.version {
        xml.leaf("version", &versions.interpolate(version));
    }
    if let Some(configuration) = &plugin.configuration {
        xml.raw(&versions.interpolate(configuration));
    }
    xml.close("plugin");
}

// ── XML writer ───────────────────────────────────────────────────────────────

/// Line-oriented XML builder with four-space indentation.
struct Xml {
    out: String,
    depth: usize,
}

impl Xml {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, content: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.out.push_str(UNIT);
        }
        self.out.push_str(content);
        self.out.push('\n');
        self
    }

    fn open(&mut self, tag: &str) -> &mut Self {
        self.line(&format!("<{tag}>"));
        self.depth += 1;
        self
    }

    fn close(&mut self, tag: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{tag}>"))
    }

    fn leaf(&mut self, tag: &str, value: &str) -> &mut Self {
        self.line(&format!("<{tag}>{value}</{tag}>"))
    }

    /// Pre-formatted lines, indented at the current depth.
    fn raw(&mut self, block: &str) -> &mut Self {
        for line in block.lines().filter(|l| !l.trim().is_empty()) {
            self.line(line);
        }
        self
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{config, registry};
    use crate::domain::{FeatureFlags, VersionCatalog};

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.example</groupId>
    <artifactId>demo</artifactId>
    <version>0.0.1-SNAPSHOT</version>

    <properties>
        <java.version>17</java.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
        </dependency>
    </dependencies>
</project>
"#;

    fn patch(text: &str, deps: &[&str], features: FeatureFlags) -> String {
        let registry = registry();
        let cfg = config(BuildTool::Maven, deps, features);
        let resolution = VersionCatalog::builtin().resolve(Some(cfg.platform_version()));
        MavenMutator::new(&registry).patch(text, &cfg, &resolution)
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    // ========================================================================
    // Idempotence
    // ========================================================================

    #[test]
    fn second_patch_changes_nothing() {
        let once = patch(POM, &["web", "lombok"], FeatureFlags::all());
        let registry = registry();
        let cfg = config(BuildTool::Maven, &["web", "lombok"], FeatureFlags::all());
        let resolution = VersionCatalog::builtin().resolve(Some("3.4.1"));
        let twice = MavenMutator::new(&registry).patch(&once, &cfg, &resolution);
        assert_eq!(once, twice);
    }

    // ========================================================================
    // Properties
    // ========================================================================

    #[test]
    fn java_version_is_replaced_in_place() {
        let out = patch(POM, &["web"], FeatureFlags::none());
        assert_eq!(count(&out, "<java.version>"), 1);
        assert!(out.contains("<java.version>21</java.version>"));
        assert!(out.contains("<maven.compiler.source>21</maven.compiler.source>"));
        assert!(out.contains("<lombok.version>"));

        let props = find_element(&out, "properties").unwrap();
        assert!(props.inner(&out).contains("maven.compiler.target"));
    }

    #[test]
    fn properties_section_is_created_before_dependencies() {
        let pom = POM.replace("    <properties>\n        <java.version>17</java.version>\n    </properties>\n", "");
        let out = patch(&pom, &["web"], FeatureFlags::none());
        let props = out.find("<properties>").unwrap();
        assert!(props < out.find("<dependencyManagement>").unwrap());
        assert!(out.contains("    <properties>\n        <java.version>21</java.version>"));
    }

    // ========================================================================
    // BOM and dependencies
    // ========================================================================

    #[test]
    fn bom_import_is_added_once_before_dependencies() {
        let out = patch(POM, &["web"], FeatureFlags::none());
        assert_eq!(count(&out, "<artifactId>spring-boot-dependencies</artifactId>"), 1);
        assert!(out.contains("<version>3.4.1</version>\n                <type>pom</type>"));
        let dm = out.find("<dependencyManagement>").unwrap();
        let deps = project_dependencies(&out).unwrap();
        assert!(dm < deps.open_start);
    }

    #[test]
    fn auth_libraries_are_injected_with_pinned_versions() {
        let out = patch(POM, &["web"], FeatureFlags::none().with(Feature::Auth, true));
        let versions = VersionCatalog::builtin().resolve(Some("3.4.1")).versions;
        let deps = project_dependencies(&out).unwrap();
        let inner = deps.inner(&out);

        assert!(inner.contains("<artifactId>jjwt-api</artifactId>"));
        assert!(inner.contains(&format!("<version>{}</version>", versions.jjwt)));
        assert!(inner.contains(&format!(
            "<artifactId>jjwt-impl</artifactId>\n            <version>{}</version>\n            <scope>runtime</scope>",
            versions.jjwt
        )));
        assert_eq!(count(&out, "<artifactId>jjwt-api</artifactId>"), 1);
    }

    #[test]
    fn processors_go_on_the_compiler_path_not_the_dependency_list() {
        let out = patch(POM, &["web", "lombok"], FeatureFlags::none().with(Feature::ObjectMapping, true));
        let deps = project_dependencies(&out).unwrap();
        assert!(deps.inner(&out).contains("<artifactId>mapstruct</artifactId>"));
        assert!(!deps.inner(&out).contains("mapstruct-processor"));

        let paths = find_element(&out, "annotationProcessorPaths").unwrap();
        let paths = paths.inner(&out);
        let processor = paths.find("mapstruct-processor").unwrap();
        let lombok = paths.find("<artifactId>lombok</artifactId>").unwrap();
        let binding = paths.find("lombok-mapstruct-binding").unwrap();
        assert!(processor < lombok && lombok < binding);
    }

    #[test]
    fn existing_declaration_is_not_duplicated() {
        let pom = POM.replace(
            "    </dependencies>",
            "        <dependency>\n            <groupId>org.springdoc</groupId>\n            <artifactId>springdoc-openapi-starter-webmvc-ui</artifactId>\n        </dependency>\n    </dependencies>",
        );
        let out = patch(&pom, &["web"], FeatureFlags::none().with(Feature::ApiDocs, true));
        assert_eq!(count(&out, "springdoc-openapi-starter-webmvc-ui"), 1);
    }

    #[test]
    fn declaration_needs_both_coordinates_in_one_dependency() {
        let registry = registry();
        let mutator = MavenMutator::new(&registry);
        let pom = POM.replace(
            "    </dependencies>",
            "        <dependency>\n            <groupId>org.springdoc</groupId>\n            <artifactId>springdoc-openapi-common</artifactId>\n        </dependency>\n        <dependency>\n            <groupId>com.other</groupId>\n            <artifactId>springdoc-openapi-starter-webmvc-ui</artifactId>\n        </dependency>\n    </dependencies>",
        );
        assert!(!mutator.is_declared(&pom, "org.springdoc", "springdoc-openapi-starter-webmvc-ui"));
        assert!(mutator.is_declared(&pom, "org.springdoc", "springdoc-openapi-common"));

        let out = patch(&pom, &["web"], FeatureFlags::none().with(Feature::ApiDocs, true));
        let deps = project_dependencies(&out).unwrap();
        assert!(deps.inner(&out).contains(
            "<groupId>org.springdoc</groupId>\n            <artifactId>springdoc-openapi-starter-webmvc-ui</artifactId>"
        ));
    }

    #[test]
    fn declarations_outside_the_project_list_do_not_count() {
        let registry = registry();
        let pom = POM.replace(
            "    <properties>",
            "    <dependencyManagement>\n        <dependencies>\n            <dependency>\n                <groupId>io.jsonwebtoken</groupId>\n                <artifactId>jjwt-api</artifactId>\n            </dependency>\n        </dependencies>\n    </dependencyManagement>\n\n    <properties>",
        );
        assert!(!MavenMutator::new(&registry).is_declared(&pom, "io.jsonwebtoken", "jjwt-api"));
    }

    #[test]
    fn commented_dependencies_element_is_not_an_anchor() {
        let pom = POM.replace(
            "    <dependencies>",
            "    <!-- <dependencies></dependencies> -->\n    <dependencies>",
        );
        let out = patch(&pom, &["web"], FeatureFlags::none().with(Feature::ApiDocs, true));
        assert!(out.contains("<!-- <dependencies></dependencies> -->"));
        let deps = project_dependencies(&out).unwrap();
        assert!(deps.inner(&out).contains("springdoc"));
    }

    // ========================================================================
    // Plugins and test configuration
    // ========================================================================

    #[test]
    fn build_section_is_synthesized_when_absent() {
        let out = patch(POM, &["web", "querydsl"], FeatureFlags::none());
        let plugins = plugins_element(&out).unwrap();
        let inner = plugins.inner(&out);
        for artifact in [
            "spring-boot-maven-plugin",
            "maven-compiler-plugin",
            "maven-surefire-plugin",
            "maven-failsafe-plugin",
            "jacoco-maven-plugin",
            "maven-enforcer-plugin",
            "apt-maven-plugin",
        ] {
            assert_eq!(count(inner, artifact), 1, "{artifact}");
        }
        assert!(inner.contains("<minimum>0.50</minimum>"));
        assert!(inner.contains("<argLine>@{argLine} -Xmx1024m</argLine>"));
        assert!(out.find("<build>").unwrap() > out.find("</dependencies>").unwrap());
    }

    #[test]
    fn coverage_is_skipped_without_web_or_jpa() {
        let out = patch(POM, &["lombok"], FeatureFlags::none());
        assert!(!out.contains("jacoco-maven-plugin"));
        assert!(out.contains("<argLine>-Xmx1024m</argLine>"));
    }

    #[test]
    fn existing_plugins_are_left_alone_but_gain_surefire() {
        let pom = POM.replace(
            "</project>",
            "    <build>\n        <plugins>\n            <plugin>\n                <groupId>org.springframework.boot</groupId>\n                <artifactId>spring-boot-maven-plugin</artifactId>\n            </plugin>\n        </plugins>\n    </build>\n</project>",
        );
        let out = patch(&pom, &["web"], FeatureFlags::none());
        assert_eq!(count(&out, "spring-boot-maven-plugin"), 1);
        assert!(!out.contains("maven-compiler-plugin"));
        assert_eq!(count(&out, "maven-surefire-plugin"), 1);
    }

    // ========================================================================
    // Missing anchors
    // ========================================================================

    #[test]
    fn missing_dependencies_element_skips_dependent_steps() {
        let pom = "<project>\n    <modelVersion>4.0.0</modelVersion>\n</project>\n";
        let out = patch(pom, &["web"], FeatureFlags::all());
        assert!(!out.contains("spring-boot-dependencies"));
        assert!(!out.contains("jjwt-api"));
        assert!(out.contains("<build>"));
        assert!(out.contains("<properties>"));
    }

    // ========================================================================
    // Free text
    // ========================================================================

    #[test]
    fn escape_text_produces_xml_entities() {
        let registry = registry();
        let mutator = MavenMutator::new(&registry);
        assert_eq!(
            mutator.escape_text(r#"Tom's "A" & <B>"#),
            "Tom&apos;s &quot;A&quot; &amp; &lt;B&gt;"
        );
        assert_eq!(mutator.escape_text("plain"), "plain");
    }

    #[test]
    fn escaped_description_keeps_its_spacing_through_patch() {
        let registry = registry();
        let mutator = MavenMutator::new(&registry);
        let description = mutator.escape_text("Orders  &  <Billing>   API");
        let pom = POM.replace(
            "    <version>0.0.1-SNAPSHOT</version>",
            &format!("    <version>0.0.1-SNAPSHOT</version>\n    <description>{description}</description>"),
        );

        let out = patch(&pom, &["web"], FeatureFlags::none().with(Feature::ApiDocs, true));
        assert!(out.contains(
            "<description>Orders  &amp;  &lt;Billing&gt;   API</description>"
        ));
        assert_eq!(count(&out, "<artifactId>spring-boot-dependencies</artifactId>"), 1);
        assert!(project_dependencies(&out).unwrap().inner(&out).contains("springdoc"));
    }

    #[test]
    fn text_without_project_is_returned_normalized() {
        let out = patch("not   xml\n\n\n\nat all", &["web"], FeatureFlags::all());
        assert_eq!(out, "not xml\n\nat all\n");
    }
}
