//! End-to-end generation over the shipped catalogues.

use std::path::{Path, PathBuf};

use springforge_adapters::{
    LocalFilesystem, MemoryFilesystem, SimpleRenderer, TemplateCatalogue, builtin_registry,
};
use springforge_core::{
    application::ApplicationError,
    domain::{
        ArchitectureStyle, BuildTool, Feature, FeatureFlags, PRESET_REGISTRY, ProjectConfig,
        VersionCatalog,
    },
    prelude::{GenerationService, SpringforgeError},
};

fn service(fs: impl springforge_core::prelude::Filesystem + 'static) -> GenerationService {
    GenerationService::new(
        builtin_registry().unwrap(),
        std::sync::Arc::new(VersionCatalog::builtin()),
        Box::new(SimpleRenderer::new(TemplateCatalogue::builtin().unwrap())),
        Box::new(fs),
    )
}

fn config(out: &Path, tool: BuildTool, style: ArchitectureStyle, deps: &[&str], features: FeatureFlags) -> ProjectConfig {
    ProjectConfig::builder()
        .group_id("com.acme")
        .artifact_id("orders")
        .build_tool(tool)
        .architecture(style)
        .platform_version("3.3.2")
        .dependencies(deps.iter().copied())
        .features(features)
        .output_dir(out)
        .build()
        .unwrap()
}

#[test]
fn clean_rest_api_renders_real_sources() {
    let features = FeatureFlags::none()
        .with(Feature::ApiDocs, true)
        .with(Feature::GlobalErrorHandling, true);
    let cfg = config(
        Path::new("/work"),
        BuildTool::Maven,
        ArchitectureStyle::Clean,
        &["web", "data-jpa", "h2", "lombok"],
        features,
    );

    let project = service(MemoryFilesystem::new()).generate(&cfg).unwrap();
    let files = &project.files;

    let swagger = files
        .paths()
        .find(|p| p.ends_with("/SwaggerConfig.java"))
        .unwrap();
    let swagger = files.content(swagger).unwrap();
    assert!(swagger.starts_with("package com.acme.orders.infrastructure.config;"));

    let usecase = files
        .paths()
        .find(|p| p.ends_with("UseCase.java"))
        .unwrap();
    assert!(files.content(usecase).unwrap().contains("import com.acme.orders.domain.repository."));

    let pom = files.content("pom.xml").unwrap();
    assert!(pom.contains("<artifactId>spring-boot-starter-web</artifactId>"));
    assert!(pom.contains("<artifactId>spring-boot-dependencies</artifactId>"));
    assert!(pom.contains("<artifactId>spring-boot-maven-plugin</artifactId>"));
    assert!(!pom.contains("{{"));

    let props = files.content("src/main/resources/application.properties").unwrap();
    assert!(props.starts_with("spring.application.name=orders\n"));
    assert!(props.contains("spring.jpa.hibernate.ddl-auto=update\n"));
    assert!(props.contains("springdoc.api-docs.path=/api-docs\n"));
    assert!(!project.infrastructure_emitted);
}

#[test]
fn free_text_stays_inside_its_literals() {
    let description = r#"Bob's "beta" {v2} & <Billing>  API"#;
    let features = FeatureFlags::none().with(Feature::ApiDocs, true);

    for tool in [BuildTool::Maven, BuildTool::Gradle] {
        let cfg = config(Path::new("/work"), tool, ArchitectureStyle::Clean, &["web"], features)
            .to_builder()
            .description(description)
            .build()
            .unwrap();
        let project = service(MemoryFilesystem::new()).generate(&cfg).unwrap();
        let files = &project.files;

        let build = files.content(tool.build_file()).unwrap();
        match tool {
            BuildTool::Maven => {
                assert!(build.contains(
                    "<description>Bob&apos;s &quot;beta&quot; {v2} &amp; &lt;Billing&gt;  API</description>"
                ));
                assert!(build.contains("<artifactId>spring-boot-dependencies</artifactId>"));
                assert!(build.contains("<artifactId>springdoc-openapi-starter-webmvc-ui</artifactId>"));
            }
            BuildTool::Gradle => {
                assert!(build.contains(r#"description = 'Bob\'s "beta" {v2} & <Billing>  API'"#));
                assert!(build.contains("mavenBom \"org.springframework.boot:spring-boot-dependencies:"));
                assert!(build.contains("org.springdoc:springdoc-openapi-starter-webmvc-ui"));
            }
        }

        let swagger = files
            .paths()
            .find(|p| p.ends_with("/SwaggerConfig.java"))
            .unwrap();
        assert!(files
            .content(swagger)
            .unwrap()
            .contains(r#".description("Bob's \"beta\" {v2} & <Billing>  API")"#));

        let readme = files.content("README.md").unwrap();
        assert!(readme.contains(description), "{tool}");
    }
}

#[test]
fn every_style_renders_without_missing_templates() {
    for style in ArchitectureStyle::ALL {
        for tool in BuildTool::ALL {
            let cfg = config(Path::new("/work"), tool, style, &["web", "data-jpa"], FeatureFlags::all());
            let project = service(MemoryFilesystem::new())
                .generate(&cfg)
                .unwrap_or_else(|e| panic!("{style}/{tool}: {e}"));
            assert!(project.file_count() > 10, "{style}/{tool}");
        }
    }
}

#[test]
fn presets_generate() {
    for preset in PRESET_REGISTRY {
        let cfg = ProjectConfig::builder()
            .group_id("com.acme")
            .artifact_id("demo")
            .architecture(preset.architecture)
            .language_version(preset.language_version)
            .dependencies(preset.dependencies.iter().copied())
            .features(preset.features)
            .output_dir("/work")
            .build()
            .unwrap();
        let project = service(MemoryFilesystem::new()).generate(&cfg).unwrap();
        assert!(project.file_count() > 0, "{}", preset.id);
    }
}

#[test]
fn container_services_land_in_compose_file() {
    let features = FeatureFlags::none().with(Feature::ContainerFiles, true);
    let cfg = config(
        Path::new("/work"),
        BuildTool::Gradle,
        ArchitectureStyle::Mvc,
        &["web", "postgres", "kafka", "zookeeper"],
        features,
    );

    let project = service(MemoryFilesystem::new()).generate(&cfg).unwrap();
    assert!(project.infrastructure_emitted);

    let compose = project.files.content("docker-compose.yml").unwrap();
    assert!(compose.contains("orders-postgres"));
    assert!(!compose.contains("{{artifactId}}"));
    assert!(compose.find("  zookeeper:").unwrap() < compose.find("  kafka:").unwrap());
    assert!(project.files.content("Dockerfile").unwrap().contains("COPY build/libs/*.jar app.jar"));
    assert!(project.files.content("settings.gradle").unwrap().contains("rootProject.name = 'orders'"));
}

#[test]
fn dependency_scaffolding_uses_the_base_package() {
    let cfg = config(
        Path::new("/work"),
        BuildTool::Maven,
        ArchitectureStyle::Mvc,
        &["amqp", "flyway"],
        FeatureFlags::none(),
    );
    let project = service(MemoryFilesystem::new()).generate(&cfg).unwrap();

    let rabbit = project
        .files
        .content("src/main/java/com/acme/orders/messaging/RabbitConfig.java")
        .unwrap();
    assert!(rabbit.starts_with("package com.acme.orders.messaging;"));
    assert!(project.files.content("src/main/resources/db/migration/V1__init.sql").is_some());
}

#[test]
fn writes_to_disk_and_refuses_a_second_run() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config(tmp.path(), BuildTool::Maven, ArchitectureStyle::Layered, &["web"], FeatureFlags::none());

    let project = service(LocalFilesystem::new()).generate_and_write(&cfg).unwrap();
    let pom = std::fs::read_to_string(project.root.join("pom.xml")).unwrap();
    assert!(pom.contains("<groupId>com.acme</groupId>"));
    assert!(project.root.join("src/main/java/com/acme/orders/OrdersApplication.java").exists());

    let err = service(LocalFilesystem::new()).generate_and_write(&cfg).unwrap_err();
    assert!(matches!(
        err,
        SpringforgeError::Application(ApplicationError::ProjectExists { .. })
    ));
}

#[test]
fn failed_write_rolls_back_the_project_root() {
    let fs = MemoryFilesystem::new();
    fs.fail_writes_to(PathBuf::from("/work/orders/pom.xml"));
    let cfg = config(Path::new("/work"), BuildTool::Maven, ArchitectureStyle::Mvc, &["web"], FeatureFlags::none());

    let err = service(fs.clone()).generate_and_write(&cfg).unwrap_err();
    assert!(matches!(
        err,
        SpringforgeError::Application(ApplicationError::FilesystemError { .. })
    ));
    assert_eq!(fs.file_count(), 0);
    assert!(!springforge_core::prelude::Filesystem::exists(&fs, Path::new("/work/orders")));
}
