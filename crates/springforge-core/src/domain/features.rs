//! Feature toggles that gate optional generated capabilities.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One independently switchable capability.
///
/// `Feature::ALL` is the fixed order used everywhere a stable iteration over
/// features is needed (blueprint gating, build file injection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Auth,
    ApiDocs,
    Cors,
    GlobalErrorHandling,
    ObjectMapping,
    ContainerFiles,
    OrchestrationManifests,
    PipelineConfig,
    AuditFields,
}

impl Feature {
    pub const ALL: [Feature; 9] = [
        Self::Auth,
        Self::ApiDocs,
        Self::Cors,
        Self::GlobalErrorHandling,
        Self::ObjectMapping,
        Self::ContainerFiles,
        Self::OrchestrationManifests,
        Self::PipelineConfig,
        Self::AuditFields,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::ApiDocs => "api-docs",
            Self::Cors => "cors",
            Self::GlobalErrorHandling => "global-error-handling",
            Self::ObjectMapping => "object-mapping",
            Self::ContainerFiles => "container-files",
            Self::OrchestrationManifests => "orchestration-manifests",
            Self::PipelineConfig => "pipeline-config",
            Self::AuditFields => "audit-fields",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Auth => "JWT authentication with Spring Security",
            Self::ApiDocs => "OpenAPI documentation via springdoc",
            Self::Cors => "Cross-origin resource sharing configuration",
            Self::GlobalErrorHandling => "Global exception handler and error payloads",
            Self::ObjectMapping => "MapStruct based DTO mapping",
            Self::ContainerFiles => "Dockerfile and docker-compose.yml",
            Self::OrchestrationManifests => "Kubernetes deployment manifests",
            Self::PipelineConfig => "GitHub Actions CI workflow",
            Self::AuditFields => "JPA auditing base entity",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let key = normalized.strip_prefix("enable-").unwrap_or(&normalized);

        match key {
            "auth" | "jwt" => Ok(Self::Auth),
            "api-docs" | "swagger" | "openapi" => Ok(Self::ApiDocs),
            "cors" => Ok(Self::Cors),
            "global-error-handling" | "exception-handler" | "error-handling" => {
                Ok(Self::GlobalErrorHandling)
            }
            "object-mapping" | "mapstruct" => Ok(Self::ObjectMapping),
            "container-files" | "docker" => Ok(Self::ContainerFiles),
            "orchestration-manifests" | "kubernetes" | "k8s" => Ok(Self::OrchestrationManifests),
            "pipeline-config" | "ci" | "ci-cd" => Ok(Self::PipelineConfig),
            "audit-fields" | "audit" | "auditing" => Ok(Self::AuditFields),
            _ => Err(DomainError::UnknownValue {
                kind: "feature",
                value: s.to_string(),
            }),
        }
    }
}

/// A fixed record of independent feature booleans.
///
/// Serialized with the `enable-*` keys used in project description files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FeatureFlags {
    pub enable_auth: bool,
    pub enable_api_docs: bool,
    pub enable_cors: bool,
    pub enable_global_error_handling: bool,
    pub enable_object_mapping: bool,
    pub enable_container_files: bool,
    pub enable_orchestration_manifests: bool,
    pub enable_pipeline_config: bool,
    pub enable_audit_fields: bool,
}

impl FeatureFlags {
    /// All toggles off.
    pub const fn none() -> Self {
        Self {
            enable_auth: false,
            enable_api_docs: false,
            enable_cors: false,
            enable_global_error_handling: false,
            enable_object_mapping: false,
            enable_container_files: false,
            enable_orchestration_manifests: false,
            enable_pipeline_config: false,
            enable_audit_fields: false,
        }
    }

    /// All toggles on.
    pub const fn all() -> Self {
        Self {
            enable_auth: true,
            enable_api_docs: true,
            enable_cors: true,
            enable_global_error_handling: true,
            enable_object_mapping: true,
            enable_container_files: true,
            enable_orchestration_manifests: true,
            enable_pipeline_config: true,
            enable_audit_fields: true,
        }
    }

    pub const fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Auth => self.enable_auth,
            Feature::ApiDocs => self.enable_api_docs,
            Feature::Cors => self.enable_cors,
            Feature::GlobalErrorHandling => self.enable_global_error_handling,
            Feature::ObjectMapping => self.enable_object_mapping,
            Feature::ContainerFiles => self.enable_container_files,
            Feature::OrchestrationManifests => self.enable_orchestration_manifests,
            Feature::PipelineConfig => self.enable_pipeline_config,
            Feature::AuditFields => self.enable_audit_fields,
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        let slot = match feature {
            Feature::Auth => &mut self.enable_auth,
            Feature::ApiDocs => &mut self.enable_api_docs,
            Feature::Cors => &mut self.enable_cors,
            Feature::GlobalErrorHandling => &mut self.enable_global_error_handling,
            Feature::ObjectMapping => &mut self.enable_object_mapping,
            Feature::ContainerFiles => &mut self.enable_container_files,
            Feature::OrchestrationManifests => &mut self.enable_orchestration_manifests,
            Feature::PipelineConfig => &mut self.enable_pipeline_config,
            Feature::AuditFields => &mut self.enable_audit_fields,
        };
        *slot = enabled;
    }

    /// Builder-style toggle.
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.set(feature, enabled);
        self
    }

    /// Enabled features in `Feature::ALL` order.
    pub fn enabled(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL
            .into_iter()
            .filter(move |f| self.is_enabled(*f))
    }

    /// Build flags from a bitmask over `Feature::ALL` (bit 0 is `Auth`).
    pub fn from_bits(bits: u16) -> Self {
        Feature::ALL
            .into_iter()
            .enumerate()
            .fold(Self::none(), |flags, (i, f)| {
                flags.with(f, bits & (1 << i) != 0)
            })
    }
}

impl FromIterator<Feature> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::none(), |flags, f| flags.with(f, true))
    }
}
