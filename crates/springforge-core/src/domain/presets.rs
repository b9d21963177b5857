//! Named starting points for common project shapes.

use crate::domain::error::DomainError;
use crate::domain::features::FeatureFlags;
use crate::domain::value_objects::ArchitectureStyle;

#[derive(Debug, Clone, Copy)]
pub struct PresetDef {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub architecture: ArchitectureStyle,
    pub language_version: &'static str,
    pub dependencies: &'static [&'static str],
    pub features: FeatureFlags,
}

const REST_FEATURES: FeatureFlags = FeatureFlags {
    enable_auth: true,
    enable_api_docs: true,
    enable_cors: true,
    enable_global_error_handling: true,
    enable_object_mapping: true,
    enable_container_files: false,
    enable_orchestration_manifests: false,
    enable_pipeline_config: false,
    enable_audit_fields: true,
};

pub static PRESET_REGISTRY: &[PresetDef] = &[
    PresetDef {
        id: "rest-api",
        display_name: "REST API",
        description: "Clean Architecture REST API",
        architecture: ArchitectureStyle::Clean,
        language_version: "21",
        dependencies: &["web", "data-jpa", "h2", "validation", "lombok", "devtools"],
        features: REST_FEATURES,
    },
    PresetDef {
        id: "graphql-api",
        display_name: "GraphQL API",
        description: "GraphQL API with Spring for GraphQL",
        architecture: ArchitectureStyle::Clean,
        language_version: "21",
        dependencies: &[
            "web",
            "graphql",
            "data-jpa",
            "h2",
            "validation",
            "lombok",
            "devtools",
        ],
        features: FeatureFlags {
            enable_api_docs: false,
            ..REST_FEATURES
        },
    },
    PresetDef {
        id: "microservice",
        display_name: "Microservice",
        description: "Hexagonal architecture microservice",
        architecture: ArchitectureStyle::Hexagonal,
        language_version: "21",
        dependencies: &[
            "web",
            "data-jpa",
            "postgresql",
            "cloud-eureka-client",
            "cloud-config-client",
            "actuator",
            "lombok",
        ],
        features: FeatureFlags::all(),
    },
    PresetDef {
        id: "monolith",
        display_name: "Monolith",
        description: "Traditional MVC monolith",
        architecture: ArchitectureStyle::Mvc,
        language_version: "21",
        dependencies: &[
            "web",
            "thymeleaf",
            "data-jpa",
            "mysql",
            "security",
            "validation",
            "lombok",
        ],
        features: FeatureFlags {
            enable_global_error_handling: true,
            enable_container_files: true,
            ..FeatureFlags::none()
        },
    },
    PresetDef {
        id: "minimal",
        display_name: "Minimal",
        description: "Minimal Spring Boot app",
        architecture: ArchitectureStyle::Mvc,
        language_version: "21",
        dependencies: &["web", "lombok", "devtools"],
        features: FeatureFlags::none(),
    },
];

pub fn find_preset(id: &str) -> Result<&'static PresetDef, DomainError> {
    let wanted = id.trim().to_ascii_lowercase().replace('_', "-");
    PRESET_REGISTRY
        .iter()
        .find(|p| p.id == wanted)
        .ok_or_else(|| DomainError::UnknownValue {
            kind: "preset",
            value: id.to_string(),
        })
}
