//! Shared fixtures for application-layer unit tests.

use std::collections::BTreeMap;

use crate::domain::{
    Artifact, BuildTool, DependencyRegistry, DependencyRule, DependencyScope, FeatureFlags,
    InfraDescriptor, ProjectConfig, RuleCategory,
    entities::{
        BuildSpec, GradlePlugin, HealthCheck, MavenPlugin, NamedVolume, RuntimeSpec, ScaffoldFile,
        ScaffoldingSpec,
    },
};

pub(crate) fn rule(id: &str, priority: i32) -> DependencyRule {
    DependencyRule {
        id: id.into(),
        name: id.to_uppercase(),
        description: String::new(),
        aliases: vec![],
        category: RuleCategory::Web,
        priority,
        build: BuildSpec::default(),
        runtime: RuntimeSpec::default(),
        infrastructure: None,
        scaffolding: None,
    }
}

pub(crate) fn starter(id: &str, priority: i32, artifact: &str) -> DependencyRule {
    let mut r = rule(id, priority);
    r.build.dependencies = vec![Artifact::new("org.springframework.boot", artifact)];
    r
}

pub(crate) fn service(name: &str, image: &str, depends_on: &[&str]) -> InfraDescriptor {
    InfraDescriptor {
        service: name.into(),
        image: image.into(),
        container_name: None,
        ports: vec![],
        environment: BTreeMap::new(),
        healthcheck: None,
        volume: None,
        depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        command: None,
    }
}

/// A small catalogue covering every rule feature the services look at.
pub(crate) fn registry() -> DependencyRegistry {
    let mut lombok = rule("lombok", 100);
    lombok.build.maven.dependencies = vec![
        Artifact::new("org.projectlombok", "lombok").with_scope(DependencyScope::Provided),
    ];
    lombok.build.gradle.dependencies = vec![
        Artifact::new("org.projectlombok", "lombok").with_scope(DependencyScope::Provided),
        Artifact::new("org.projectlombok", "lombok").with_scope(DependencyScope::AnnotationProcessor),
    ];

    let mut web = starter("web", 90, "spring-boot-starter-web");
    web.runtime.properties.insert("server.port".into(), "8080".into());

    let data_jpa = starter("data-jpa", 80, "spring-boot-starter-data-jpa");

    let mut h2 = rule("h2", 40);
    h2.category = RuleCategory::Database;
    h2.build.dependencies =
        vec![Artifact::new("com.h2database", "h2").with_scope(DependencyScope::Runtime)];
    h2.runtime
        .properties
        .insert("spring.datasource.url".into(), "jdbc:h2:mem:testdb".into());

    let mut postgresql = rule("postgresql", 40);
    postgresql.category = RuleCategory::Database;
    postgresql.aliases = vec!["postgres".into()];
    postgresql.build.dependencies =
        vec![Artifact::new("org.postgresql", "postgresql").with_scope(DependencyScope::Runtime)];
    postgresql.runtime.properties.insert(
        "spring.datasource.url".into(),
        "jdbc:postgresql://localhost:5432/app".into(),
    );
    let mut pg_service = service("postgres", "postgres:16-alpine", &[]);
    pg_service.ports = vec!["5432:5432".into()];
    pg_service
        .environment
        .insert("POSTGRES_DB".into(), "app".into());
    pg_service.healthcheck = Some(HealthCheck {
        test: vec!["CMD-SHELL".into(), "pg_isready -U postgres".into()],
        interval: "10s".into(),
        timeout: "5s".into(),
        retries: 5,
    });
    pg_service.volume = Some(NamedVolume {
        name: "postgres-data".into(),
        mount_path: "/var/lib/postgresql/data".into(),
    });
    postgresql.infrastructure = Some(pg_service);

    let mut zookeeper = rule("zookeeper", 30);
    zookeeper.category = RuleCategory::Messaging;
    zookeeper.infrastructure = Some(service("zookeeper", "confluentinc/cp-zookeeper:7.6.0", &[]));

    let mut kafka = starter("kafka", 35, "spring-kafka");
    kafka.category = RuleCategory::Messaging;
    kafka.infrastructure = Some(service("kafka", "confluentinc/cp-kafka:7.6.0", &["zookeeper"]));

    let mut consumer = rule("kafka-consumer", 50);
    consumer.category = RuleCategory::Messaging;
    consumer.infrastructure = Some(service("consumer", "example/consumer:1", &["kafka"]));

    let mut flyway = rule("flyway", 20);
    flyway.category = RuleCategory::Database;
    flyway.build.dependencies = vec![Artifact::new("org.flywaydb", "flyway-core")];
    flyway.scaffolding = Some(ScaffoldingSpec {
        files: vec![ScaffoldFile {
            path: "src/main/resources/db/migration/V1__init.sql".into(),
            content: "-- initial schema\n".into(),
        }],
    });

    let mut security = starter("security", 70, "spring-boot-starter-security");
    security.category = RuleCategory::Security;
    security.scaffolding = Some(ScaffoldingSpec {
        files: vec![ScaffoldFile {
            path: "src/main/java/{{basePackage}}/security/SecurityNotes.java".into(),
            content: "package {{basePackage}}.security;\n".into(),
        }],
    });

    let mut querydsl = rule("querydsl", 10);
    querydsl.build.maven.plugins = vec![MavenPlugin {
        group_id: "com.mysema.maven".into(),
        artifact_id: "apt-maven-plugin".into(),
        version: Some("1.1.3".into()),
        configuration: None,
    }];
    querydsl.build.gradle.plugins = vec![GradlePlugin {
        id: "com.ewerk.gradle.plugins.querydsl".into(),
        version: Some("1.0.10".into()),
    }];
    querydsl.build.gradle.compiler_options = vec!["-Aquerydsl.entityAccessors=true".into()];

    DependencyRegistry::new(vec![
        lombok, web, data_jpa, h2, postgresql, zookeeper, kafka, consumer, flyway, security,
        querydsl,
    ])
    .unwrap()
}

pub(crate) fn config(tool: BuildTool, deps: &[&str], features: FeatureFlags) -> ProjectConfig {
    ProjectConfig::builder()
        .group_id("com.example")
        .artifact_id("demo")
        .build_tool(tool)
        .platform_version("3.4.1")
        .dependencies(deps.iter().copied())
        .features(features)
        .output_dir("/tmp/out")
        .build()
        .unwrap()
}
