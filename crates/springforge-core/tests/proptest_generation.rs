//! Property-based tests for the generation pipeline

use proptest::prelude::*;
use springforge_core::{
    application::build_file::{feature_artifacts, mutator_for},
    domain::{
        ArchitectureStyle, BuildTool, DependencyRegistry, DependencyRule, DependencyScope, Feature,
        FeatureFlags, ProjectConfig, VersionCatalog, find_architecture, resolve_blueprints,
    },
};

const RULES: &str = r#"
- id: lombok
  name: Lombok
  category: TOOL
  priority: 100
  build:
    maven:
      dependencies:
        - { group-id: org.projectlombok, artifact-id: lombok, scope: provided }
    gradle:
      dependencies:
        - { group-id: org.projectlombok, artifact-id: lombok, scope: provided }
        - { group-id: org.projectlombok, artifact-id: lombok, scope: annotation-processor }
- id: web
  name: Spring Web
  category: WEB
  priority: 90
  build:
    dependencies:
      - { group-id: org.springframework.boot, artifact-id: spring-boot-starter-web }
- id: data-jpa
  name: Spring Data JPA
  category: DATA
  priority: 80
- id: security
  name: Spring Security
  category: SECURITY
  priority: 70
- id: h2
  name: H2 Database
  category: DATABASE
  priority: 40
- id: querydsl
  name: Querydsl
  category: DATA
  priority: 10
  build:
    gradle:
      compiler-options: ["-Aquerydsl.entityAccessors=true"]
      plugins:
        - { id: com.ewerk.gradle.plugins.querydsl, version: "1.0.10" }
"#;

const IDS: [&str; 6] = ["lombok", "web", "data-jpa", "security", "h2", "querydsl"];

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.acme</groupId>
    <artifactId>orders</artifactId>
    <description>DESCRIPTION</description>
    <!-- NOTE -->
    <!-- <dependencies></dependencies> -->
    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter</artifactId>
        </dependency>
    </dependencies>
</project>
"#;

const GRADLE: &str = r#"group = 'com.acme'
version = '0.0.1-SNAPSHOT'
description = 'DESCRIPTION'
// NOTE
/* dependencies { */

dependencies {
    implementation 'org.springframework.boot:spring-boot-starter'
    testImplementation('org.springframework.boot:spring-boot-starter-test') {
        exclude group: 'org.junit.vintage'
    }
}
"#;

fn registry() -> DependencyRegistry {
    let rules: Vec<DependencyRule> = serde_yaml::from_str(RULES).unwrap();
    DependencyRegistry::new(rules).unwrap()
}

fn build_tool() -> impl Strategy<Value = BuildTool> {
    prop_oneof![Just(BuildTool::Maven), Just(BuildTool::Gradle)]
}

proptest! {
    #[test]
    fn patching_twice_equals_patching_once(
        tool in build_tool(),
        bits in 0u16..512u16,
        deps in prop::sample::subsequence(IDS.to_vec(), 0..=IDS.len()),
        note in r#"[a-z '"{}<>&/*]{0,24}"#,
        description in r#"[a-zA-Z][a-zA-Z '"{}<>&/*\\]{0,23}"#,
        language in prop::sample::select(vec!["17", "21"]),
    ) {
        let registry = registry();
        let config = ProjectConfig::builder()
            .group_id("com.acme")
            .artifact_id("orders")
            .build_tool(tool)
            .language_version(language)
            .dependencies(deps)
            .features(FeatureFlags::from_bits(bits))
            .build()
            .unwrap();
        let resolution = VersionCatalog::builtin().resolve(Some("3.3.0"));

        let mutator = mutator_for(tool, &registry);
        let escaped = mutator.escape_text(&description);
        let base = match tool {
            BuildTool::Maven => POM,
            BuildTool::Gradle => GRADLE,
        }
        .replace("NOTE", &note)
        .replace("DESCRIPTION", &escaped);

        let once = mutator.patch(&base, &config, &resolution);
        let twice = mutator.patch(&once, &config, &resolution);
        prop_assert_eq!(&once, &twice);

        // Free text survives verbatim and no required declaration is skipped.
        prop_assert!(once.contains(&escaped));
        prop_assert_eq!(once.matches("spring-boot-dependencies").count(), 1);
        for artifact in feature_artifacts(config.features()) {
            if tool == BuildTool::Maven && artifact.scope == DependencyScope::AnnotationProcessor {
                continue;
            }
            prop_assert!(
                mutator.is_declared(&once, artifact.group_id, artifact.artifact_id),
                "{} missing", artifact.artifact_id
            );
        }
    }

    #[test]
    fn unmapped_versions_resolve_like_no_version(
        major in 4u32..100u32,
        minor in 0u32..100u32,
        patch in prop::option::of(0u32..20u32),
    ) {
        let catalog = VersionCatalog::builtin();
        let requested = match patch {
            Some(p) => format!("{major}.{minor}.{p}"),
            None => format!("{major}.{minor}"),
        };

        let fallback = catalog.resolve(Some(&requested));
        let none = catalog.resolve(None);
        prop_assert!(fallback.fell_back);
        prop_assert_eq!(fallback.versions, none.versions);
    }

    #[test]
    fn malformed_versions_resolve_like_no_version(requested in "[a-z ._-]{0,12}") {
        let catalog = VersionCatalog::builtin();
        prop_assert_eq!(catalog.resolve(Some(&requested)).versions, catalog.resolve(None).versions);
    }

    #[test]
    fn rule_order_ignores_input_order(ids in Just(IDS.to_vec()).prop_shuffle()) {
        let registry = registry();
        let ordered: Vec<&str> = registry.rules_for(&ids).iter().map(|r| r.id.as_str()).collect();
        prop_assert_eq!(ordered, vec!["lombok", "web", "data-jpa", "security", "h2", "querydsl"]);
    }
}

#[test]
fn every_feature_combination_yields_complete_blueprints() {
    for style in ArchitectureStyle::ALL {
        let Some(def) = find_architecture(style) else {
            panic!("{style} has no definition");
        };

        for bits in 0u16..(1 << Feature::ALL.len()) {
            let flags = FeatureFlags::from_bits(bits);
            let tasks = resolve_blueprints(style, &flags);

            assert!(tasks.iter().all(|t| !t.directory.is_empty()), "{style}: empty directory");
            assert!(tasks.len() >= def.blueprints.len());

            for gated in def.feature_blueprints {
                let hits = tasks
                    .iter()
                    .filter(|t| t.template_id == gated.template_id && t.gate == Some(gated.gate))
                    .count();
                let expected = usize::from(flags.is_enabled(gated.gate));
                assert_eq!(hits, expected, "{style} {}", gated.template_id);
            }
        }
    }
}
