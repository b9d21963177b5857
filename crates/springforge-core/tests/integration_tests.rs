//! Integration tests for springforge-core.
//!
//! Drives the public API end to end with a rule catalogue written in YAML,
//! a renderer that echoes its inputs and an in-memory filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use springforge_core::{
    application::{
        ApplicationError, ComposeOutcome, InfrastructureService,
        build_file::mutator_for,
    },
    domain::{
        ArchitectureStyle, BuildTool, DependencyRegistry, DependencyRule, Feature, FeatureFlags,
        ProjectConfig, RenderContext, VersionCatalog,
    },
    prelude::{Filesystem, GenerationService, SpringforgeError, SpringforgeResult, TemplateRenderer},
};

const RULES: &str = r#"
- id: web
  name: Spring Web
  category: WEB
  priority: 90
  build:
    dependencies:
      - { group-id: org.springframework.boot, artifact-id: spring-boot-starter-web }
  runtime:
    properties:
      server.port: "8080"

- id: data-jpa
  name: Spring Data JPA
  category: DATA
  priority: 80
  build:
    dependencies:
      - { group-id: org.springframework.boot, artifact-id: spring-boot-starter-data-jpa }

- id: h2
  name: H2 Database
  category: DATABASE
  priority: 40
  build:
    dependencies:
      - { group-id: com.h2database, artifact-id: h2, scope: runtime }
  runtime:
    properties:
      spring.datasource.url: "jdbc:h2:mem:{{artifactId}}"

- id: zookeeper
  name: ZooKeeper
  category: MESSAGING
  priority: 30
  infrastructure:
    service: zookeeper
    image: confluentinc/cp-zookeeper:7.6.0
    ports: ["2181:2181"]

- id: kafka
  name: Apache Kafka
  category: MESSAGING
  priority: 35
  build:
    dependencies:
      - { group-id: org.springframework.kafka, artifact-id: spring-kafka }
  infrastructure:
    service: kafka
    image: confluentinc/cp-kafka:7.6.0
    depends-on: [zookeeper]

- id: kafka-streams
  name: Kafka Streams worker
  category: MESSAGING
  priority: 50
  infrastructure:
    service: streams-worker
    image: example/streams-worker:1
    depends-on: [kafka]
"#;

fn registry() -> DependencyRegistry {
    let rules: Vec<DependencyRule> = serde_yaml::from_str(RULES).unwrap();
    DependencyRegistry::new(rules).unwrap()
}

struct EchoRenderer;

impl TemplateRenderer for EchoRenderer {
    fn render(&self, template_id: &str, context: &RenderContext) -> SpringforgeResult<String> {
        let text = match template_id {
            "build/pom" => "<project>\n    <dependencies>\n{{dependencies}}\n    </dependencies>\n</project>\n",
            "build/gradle" => "dependencies {\n{{dependencies}}\n}\n",
            _ => "{{package}}.{{className}}\n",
        };
        Ok(context.render(text))
    }
}

#[derive(Clone, Default)]
struct InMemoryDisk {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl Filesystem for InMemoryDisk {
    fn create_dir_all(&self, _path: &Path) -> SpringforgeResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SpringforgeResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap()
            .keys()
            .any(|p| p.starts_with(path))
    }

    fn remove_dir_all(&self, path: &Path) -> SpringforgeResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

fn service(disk: InMemoryDisk) -> GenerationService {
    GenerationService::new(
        Arc::new(registry()),
        Arc::new(VersionCatalog::builtin()),
        Box::new(EchoRenderer),
        Box::new(disk),
    )
}

fn config(tool: BuildTool, style: ArchitectureStyle, deps: &[&str], features: FeatureFlags) -> ProjectConfig {
    ProjectConfig::builder()
        .group_id("com.acme")
        .artifact_id("orders")
        .build_tool(tool)
        .architecture(style)
        .platform_version("3.4.1")
        .dependencies(deps.iter().copied())
        .features(features)
        .output_dir("/work")
        .build()
        .unwrap()
}

#[test]
fn clean_project_with_api_docs_and_no_auth() {
    let features = FeatureFlags::none().with(Feature::ApiDocs, true);
    let cfg = config(BuildTool::Maven, ArchitectureStyle::Clean, &["web", "data-jpa", "h2"], features);

    let project = service(InMemoryDisk::default()).generate(&cfg).unwrap();

    assert!(project.files.paths().any(|p| p.ends_with("/SwaggerConfig.java")));
    assert!(!project.files.paths().any(|p| p.ends_with("/JwtAuthenticationFilter.java")));
    assert_eq!(
        project
            .files
            .content("src/main/resources/application.properties")
            .unwrap()
            .lines()
            .find(|l| l.starts_with("spring.datasource.url")),
        Some("spring.datasource.url=jdbc:h2:mem:orders")
    );
}

#[test]
fn generate_and_write_lands_under_the_project_root() {
    let disk = InMemoryDisk::default();
    let cfg = config(BuildTool::Gradle, ArchitectureStyle::Hexagonal, &["web"], FeatureFlags::none());

    let project = service(disk.clone()).generate_and_write(&cfg).unwrap();

    let files = disk.files.lock().unwrap();
    assert_eq!(files.len(), project.file_count());
    assert!(files.keys().all(|p| p.starts_with("/work/orders")));
    let gradle = &files[&PathBuf::from("/work/orders/build.gradle")];
    assert!(gradle.contains("id 'org.springframework.boot' version '3.4.1'"));
    assert!(gradle.contains("implementation \"org.springframework.boot:spring-boot-starter-web\""));
}

#[test]
fn second_run_into_same_directory_is_rejected() {
    let disk = InMemoryDisk::default();
    let cfg = config(BuildTool::Maven, ArchitectureStyle::Mvc, &[], FeatureFlags::none());
    service(disk.clone()).generate_and_write(&cfg).unwrap();

    let before = disk.files.lock().unwrap().clone();
    let err = service(disk.clone()).generate_and_write(&cfg).unwrap_err();
    assert!(matches!(
        err,
        SpringforgeError::Application(ApplicationError::ProjectExists { .. })
    ));
    assert_eq!(*disk.files.lock().unwrap(), before);
}

#[test]
fn generation_is_deterministic_across_services() {
    let cfg = config(
        BuildTool::Maven,
        ArchitectureStyle::FeatureDriven,
        &["web", "kafka", "zookeeper"],
        FeatureFlags::all(),
    );
    let a = service(InMemoryDisk::default()).generate(&cfg).unwrap();
    let b = service(InMemoryDisk::default()).generate(&cfg).unwrap();
    assert_eq!(a.files, b.files);
    assert!(a.infrastructure_emitted);
}

#[test]
fn generated_build_file_is_a_fixed_point_of_patching() {
    let registry = registry();
    let catalog = VersionCatalog::builtin();
    let features = FeatureFlags::none()
        .with(Feature::Auth, true)
        .with(Feature::ObjectMapping, true);

    for tool in BuildTool::ALL {
        let cfg = config(tool, ArchitectureStyle::Layered, &["web", "h2"], features);
        let project = GenerationService::new(
            Arc::new(registry.clone()),
            Arc::new(catalog.clone()),
            Box::new(EchoRenderer),
            Box::new(InMemoryDisk::default()),
        )
        .generate(&cfg)
        .unwrap();

        let text = project.files.content(tool.build_file()).unwrap();
        let again = mutator_for(tool, &registry).patch(text, &cfg, &project.versions);
        assert_eq!(again, text, "{tool} descriptor changed on re-patch");
    }
}

#[test]
fn composer_orders_a_three_hop_chain() {
    let infra = InfrastructureService::new(Arc::new(registry()));
    let ComposeOutcome::Compose(doc) = infra.compose(["kafka-streams", "kafka", "zookeeper"]) else {
        panic!("expected a compose document");
    };
    assert!(doc.position("zookeeper") < doc.position("kafka"));
    assert!(doc.position("kafka") < doc.position("streams-worker"));

    assert_eq!(infra.compose(Vec::<String>::new()), ComposeOutcome::NotNeeded);
}
