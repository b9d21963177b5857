//! Architecture style catalogue and blueprint resolution.
//!
//! # Design
//!
//! Each [`ArchitectureStyle`] is described exactly once by an
//! [`ArchitectureDef`] in [`ARCHITECTURE_REGISTRY`]. A definition is pure
//! data: a layer map, unconditional blueprints and feature-gated blueprints.
//! Resolution walks that data in declaration order, so identical inputs
//! always produce identical task lists.
//!
//! # Adding a New Style
//!
//! 1. Add a variant to `ArchitectureStyle` in `value_objects.rs`
//! 2. Add one [`ArchitectureDef`] entry to [`ARCHITECTURE_REGISTRY`]

use crate::domain::features::{Feature, FeatureFlags};
use crate::domain::value_objects::ArchitectureStyle;

/// Placeholder in a layer path replaced by the feature slice name.
pub const SLICE_PLACEHOLDER: &str = "{feature}";

/// One file every project of a style receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blueprint {
    /// Logical layer, resolved through the style's layer map.
    pub layer: &'static str,
    pub template_id: &'static str,
    /// Appended to the entity name to form the file name.
    pub suffix: &'static str,
}

/// One file emitted only when its feature is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBlueprint {
    pub layer: &'static str,
    pub template_id: &'static str,
    /// Fixed file name, independent of the entity.
    pub file_name: &'static str,
    pub gate: Feature,
}

/// Everything the generator knows about one architecture style.
#[derive(Debug, Clone, Copy)]
pub struct ArchitectureDef {
    pub style: ArchitectureStyle,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Logical layer to physical path segment.
    pub layers: &'static [(&'static str, &'static str)],
    pub blueprints: &'static [Blueprint],
    pub feature_blueprints: &'static [FeatureBlueprint],
}

/// How a task's file name is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileName {
    /// `<Entity><suffix>`
    Suffix(&'static str),
    /// Used verbatim.
    Exact(&'static str),
}

impl FileName {
    pub fn resolve(&self, entity: &str) -> String {
        match self {
            Self::Suffix(suffix) => format!("{entity}{suffix}"),
            Self::Exact(name) => (*name).to_string(),
        }
    }
}

/// A single resolved file-generation instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub layer: &'static str,
    /// Physical directory relative to the base package directory. May still
    /// contain [`SLICE_PLACEHOLDER`].
    pub directory: &'static str,
    pub template_id: &'static str,
    pub file_name: FileName,
    /// The feature that gated this task, if any.
    pub gate: Option<Feature>,
}

impl FileTask {
    /// Directory with the slice placeholder substituted.
    pub fn directory_for(&self, slice: &str) -> String {
        self.directory.replace(SLICE_PLACEHOLDER, slice)
    }

    /// Namespace form of [`Self::directory_for`].
    pub fn package_suffix(&self, slice: &str) -> String {
        self.directory_for(slice).replace('/', ".")
    }
}

impl ArchitectureDef {
    /// Physical path for a logical layer, falling back to the layer name.
    pub fn physical_path(&self, layer: &'static str) -> &'static str {
        self.layers
            .iter()
            .find(|(logical, _)| *logical == layer)
            .map_or(layer, |(_, physical)| *physical)
    }

    /// Namespace segment for a logical layer (`/` becomes `.`).
    pub fn package_for(&self, layer: &'static str) -> String {
        self.physical_path(layer).replace('/', ".")
    }

    /// Ordered file tasks for this style under the given feature flags.
    ///
    /// Unconditional blueprints come first, then every feature blueprint whose
    /// gate is enabled, both in declaration order.
    pub fn resolve(&self, features: &FeatureFlags) -> Vec<FileTask> {
        let unconditional = self.blueprints.iter().map(|b| FileTask {
            layer: b.layer,
            directory: self.physical_path(b.layer),
            template_id: b.template_id,
            file_name: FileName::Suffix(b.suffix),
            gate: None,
        });

        let gated = self
            .feature_blueprints
            .iter()
            .filter(|fb| features.is_enabled(fb.gate))
            .map(|fb| FileTask {
                layer: fb.layer,
                directory: self.physical_path(fb.layer),
                template_id: fb.template_id,
                file_name: FileName::Exact(fb.file_name),
                gate: Some(fb.gate),
            });

        unconditional.chain(gated).collect()
    }

    /// Every logical layer this style knows about, including ones only
    /// referenced by blueprints.
    pub fn known_layers(&self) -> Vec<&'static str> {
        let mut layers: Vec<&'static str> = self.layers.iter().map(|(l, _)| *l).collect();
        for layer in self
            .blueprints
            .iter()
            .map(|b| b.layer)
            .chain(self.feature_blueprints.iter().map(|fb| fb.layer))
        {
            if !layers.contains(&layer) {
                layers.push(layer);
            }
        }
        layers
    }
}

/// Look up the definition for a style.
pub fn find_architecture(style: ArchitectureStyle) -> Option<&'static ArchitectureDef> {
    ARCHITECTURE_REGISTRY.iter().find(|d| d.style == style)
}

/// Resolve file tasks for a style. Total: every style has a definition.
pub fn resolve_blueprints(style: ArchitectureStyle, features: &FeatureFlags) -> Vec<FileTask> {
    find_architecture(style)
        .map(|def| def.resolve(features))
        .unwrap_or_default()
}

// ── Shared feature blueprints ────────────────────────────────────────────────

const fn gated(
    layer: &'static str,
    template_id: &'static str,
    file_name: &'static str,
    gate: Feature,
) -> FeatureBlueprint {
    FeatureBlueprint {
        layer,
        template_id,
        file_name,
        gate,
    }
}

const fn bp(layer: &'static str, template_id: &'static str, suffix: &'static str) -> Blueprint {
    Blueprint {
        layer,
        template_id,
        suffix,
    }
}

static COMMON_FEATURE_BLUEPRINTS: &[FeatureBlueprint] = &[
    gated("config", "config/SwaggerConfig", "SwaggerConfig.java", Feature::ApiDocs),
    gated("config", "config/CorsConfig", "CorsConfig.java", Feature::Cors),
    gated(
        "exception",
        "exception/GlobalExceptionHandler",
        "GlobalExceptionHandler.java",
        Feature::GlobalErrorHandling,
    ),
    gated("dto", "exception/ErrorResponse", "ErrorResponse.java", Feature::GlobalErrorHandling),
    gated(
        "exception",
        "exception/ResourceNotFoundException",
        "ResourceNotFoundException.java",
        Feature::GlobalErrorHandling,
    ),
    gated(
        "exception",
        "exception/BadRequestException",
        "BadRequestException.java",
        Feature::GlobalErrorHandling,
    ),
    gated("security", "security/SecurityConfig", "SecurityConfig.java", Feature::Auth),
    gated("security", "security/JwtService", "JwtService.java", Feature::Auth),
    gated(
        "security",
        "security/JwtAuthenticationFilter",
        "JwtAuthenticationFilter.java",
        Feature::Auth,
    ),
    gated(
        "security",
        "security/JwtAuthenticationEntryPoint",
        "JwtAuthenticationEntryPoint.java",
        Feature::Auth,
    ),
    gated(
        "security",
        "security/UserDetailsServiceImpl",
        "UserDetailsServiceImpl.java",
        Feature::Auth,
    ),
    gated("controller", "controller/AuthController", "AuthController.java", Feature::Auth),
    gated("dto", "dto/LoginRequest", "LoginRequest.java", Feature::Auth),
    gated("dto", "dto/AuthResponse", "AuthResponse.java", Feature::Auth),
    gated("config", "config/MapStructConfig", "MapStructConfig.java", Feature::ObjectMapping),
    gated("model", "audit/Auditable", "Auditable.java", Feature::AuditFields),
    gated("config", "audit/JpaAuditingConfig", "JpaAuditingConfig.java", Feature::AuditFields),
];

static CLASSIC_BLUEPRINTS: &[Blueprint] = &[
    bp("model", "entity/Entity", ".java"),
    bp("dto", "dto/DTO", "DTO.java"),
    bp("mapper", "mapper/Mapper", "Mapper.java"),
    bp("repository", "repository/Repository", "Repository.java"),
    bp("service", "service/Service", "Service.java"),
    bp("controller", "controller/Controller", "Controller.java"),
];

// ── Registry ─────────────────────────────────────────────────────────────────

/// Single source of truth for architecture styles.
pub static ARCHITECTURE_REGISTRY: &[ArchitectureDef] = &[
    ArchitectureDef {
        style: ArchitectureStyle::Mvc,
        display_name: "Model-View-Controller",
        description: "Flat packages per technical concern",
        layers: &[
            ("model", "model"),
            ("dto", "dto"),
            ("mapper", "mapper"),
            ("repository", "repository"),
            ("service", "service"),
            ("controller", "controller"),
            ("config", "config"),
            ("security", "security"),
            ("exception", "exception"),
        ],
        blueprints: CLASSIC_BLUEPRINTS,
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::Layered,
        display_name: "Layered Architecture",
        description: "Presentation, business and persistence tiers",
        layers: &[
            ("model", "database/model"),
            ("dto", "presentation/dto"),
            ("mapper", "business/mapper"),
            ("repository", "persistence/repository"),
            ("service", "business/service"),
            ("controller", "presentation/controller"),
            ("config", "presentation/config"),
            ("security", "presentation/security"),
            ("exception", "business/exception"),
        ],
        blueprints: CLASSIC_BLUEPRINTS,
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::Clean,
        display_name: "Clean Architecture",
        description: "Use cases at the centre, frameworks at the edge",
        layers: &[
            ("model", "domain/model"),
            ("port-out", "domain/repository"),
            ("exception", "domain/exception"),
            ("dto", "application/dto"),
            ("usecase", "application/usecase"),
            ("mapper", "application/mapper"),
            ("repository-impl", "infrastructure/persistence"),
            ("controller", "infrastructure/controller"),
            ("config", "infrastructure/config"),
            ("security", "infrastructure/security"),
        ],
        blueprints: &[
            bp("model", "entity/DomainModel", ".java"),
            bp("port-out", "port/RepositoryInterface", "Repository.java"),
            bp("usecase", "usecase/UseCase", "UseCase.java"),
            bp("controller", "controller/InfrastructureController", "Controller.java"),
            bp("repository-impl", "entity/JpaEntity", "Entity.java"),
            bp("repository-impl", "repository/JpaRepository", "JpaRepository.java"),
            bp("repository-impl", "repository/RepositoryImpl", "RepositoryImpl.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::Hexagonal,
        display_name: "Hexagonal Architecture",
        description: "Ports and adapters around an application core",
        layers: &[
            ("model", "domain/model"),
            ("exception", "domain/exception"),
            ("port-in", "application/port/in"),
            ("port-out", "application/port/out"),
            ("service", "application/service"),
            ("controller", "adapter/in/web"),
            ("dto", "adapter/in/web/dto"),
            ("repository-impl", "adapter/out/persistence"),
            ("config", "adapter/config"),
            ("security", "adapter/security"),
        ],
        blueprints: &[
            bp("model", "entity/DomainModel", ".java"),
            bp("port-in", "port/UseCasePort", "UseCase.java"),
            bp("port-out", "port/RepositoryInterface", "RepositoryPort.java"),
            bp("service", "service/ApplicationService", "Service.java"),
            bp("controller", "controller/InfrastructureController", "Controller.java"),
            bp("repository-impl", "entity/JpaEntity", "Entity.java"),
            bp("repository-impl", "repository/JpaRepository", "JpaRepository.java"),
            bp("repository-impl", "repository/PersistenceAdapter", "PersistenceAdapter.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::FeatureDriven,
        display_name: "Feature-Driven",
        description: "One package per business feature, shared kernel aside",
        layers: &[
            ("model", "features/{feature}/model"),
            ("dto", "features/{feature}/dto"),
            ("mapper", "features/{feature}/mapper"),
            ("repository", "features/{feature}/repository"),
            ("service", "features/{feature}/service"),
            ("controller", "features/{feature}/controller"),
            ("config", "shared/config"),
            ("security", "shared/security"),
            ("exception", "shared/exception"),
        ],
        blueprints: CLASSIC_BLUEPRINTS,
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::Ddd,
        display_name: "Domain-Driven Design",
        description: "Aggregates, value objects and domain services",
        layers: &[
            ("model", "domain/entities"),
            ("valueobject", "domain/valueobjects"),
            ("repository", "domain/repositories"),
            ("service", "domain/services"),
            ("exception", "domain/exceptions"),
            ("application", "application/services"),
            ("dto", "application/dto"),
            ("controller", "infrastructure/web"),
            ("repository-impl", "infrastructure/persistence"),
            ("config", "infrastructure/config"),
            ("security", "infrastructure/security"),
        ],
        blueprints: &[
            bp("model", "entity/AggregateRoot", ".java"),
            bp("valueobject", "entity/ValueObject", "Id.java"),
            bp("repository", "port/RepositoryInterface", "Repository.java"),
            bp("service", "service/DomainService", "DomainService.java"),
            bp("application", "service/ApplicationService", "ApplicationService.java"),
            bp("controller", "controller/InfrastructureController", "Controller.java"),
            bp("repository-impl", "repository/RepositoryImpl", "RepositoryImpl.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::Cqrs,
        display_name: "CQRS",
        description: "Separate command and query paths",
        layers: &[
            ("command", "command"),
            ("query", "query"),
            ("model", "domain/model"),
            ("dto", "shared/dto"),
            ("repository", "infrastructure/repository"),
            ("controller", "api"),
            ("config", "shared/config"),
            ("security", "shared/security"),
            ("exception", "shared/exception"),
        ],
        blueprints: &[
            bp("model", "entity/Entity", ".java"),
            bp("command", "cqrs/Command", "CreateCommand.java"),
            bp("command", "cqrs/CommandHandler", "CommandHandler.java"),
            bp("query", "cqrs/Query", "Query.java"),
            bp("query", "cqrs/QueryHandler", "QueryHandler.java"),
            bp("repository", "repository/Repository", "Repository.java"),
            bp("controller", "controller/CommandController", "CommandController.java"),
            bp("controller", "controller/QueryController", "QueryController.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::EventDriven,
        display_name: "Event-Driven",
        description: "Domain events published and consumed asynchronously",
        layers: &[
            ("model", "domain/model"),
            ("event", "domain/event"),
            ("publisher", "infrastructure/messaging"),
            ("listener", "application/listener"),
            ("service", "application/service"),
            ("repository", "infrastructure/repository"),
            ("controller", "api"),
            ("dto", "api/dto"),
            ("config", "shared/config"),
            ("security", "shared/security"),
            ("exception", "shared/exception"),
        ],
        blueprints: &[
            bp("model", "entity/Entity", ".java"),
            bp("event", "event/DomainEvent", "CreatedEvent.java"),
            bp("publisher", "event/EventPublisher", "EventPublisher.java"),
            bp("listener", "event/EventListener", "EventListener.java"),
            bp("service", "service/Service", "Service.java"),
            bp("repository", "repository/Repository", "Repository.java"),
            bp("controller", "controller/Controller", "Controller.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::Onion,
        display_name: "Onion Architecture",
        description: "Concentric core, application and infrastructure rings",
        layers: &[
            ("model", "core/domain"),
            ("port-out", "core/repository"),
            ("service", "core/services"),
            ("exception", "core/exception"),
            ("dto", "application/dto"),
            ("usecase", "application/usecase"),
            ("repository-impl", "infrastructure/persistence"),
            ("controller", "presentation/controller"),
            ("config", "infrastructure/config"),
            ("security", "infrastructure/security"),
        ],
        blueprints: &[
            bp("model", "entity/DomainModel", ".java"),
            bp("port-out", "port/RepositoryInterface", "Repository.java"),
            bp("service", "service/DomainService", "DomainService.java"),
            bp("usecase", "usecase/UseCase", "UseCase.java"),
            bp("repository-impl", "repository/RepositoryImpl", "RepositoryImpl.java"),
            bp("controller", "controller/Controller", "Controller.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
    ArchitectureDef {
        style: ArchitectureStyle::VerticalSlice,
        display_name: "Vertical Slice",
        description: "Each request handled end to end inside its slice",
        layers: &[
            ("feature", "features/{feature}"),
            ("model", "features/{feature}"),
            ("dto", "features/{feature}"),
            ("repository", "features/{feature}"),
            ("controller", "features/{feature}"),
            ("config", "shared/config"),
            ("security", "shared/security"),
            ("exception", "shared/exception"),
        ],
        blueprints: &[
            bp("model", "entity/Entity", ".java"),
            bp("feature", "slice/CreateEndpoint", "CreateEndpoint.java"),
            bp("feature", "slice/CreateHandler", "CreateHandler.java"),
            bp("feature", "slice/GetEndpoint", "GetEndpoint.java"),
            bp("feature", "slice/GetHandler", "GetHandler.java"),
            bp("repository", "repository/Repository", "Repository.java"),
            bp("dto", "dto/DTO", "DTO.java"),
        ],
        feature_blueprints: COMMON_FEATURE_BLUEPRINTS,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // ========================================================================
    // Registry integrity
    // ========================================================================

    #[test]
    fn every_style_has_exactly_one_definition() {
        for style in ArchitectureStyle::ALL {
            let count = ARCHITECTURE_REGISTRY
                .iter()
                .filter(|d| d.style == style)
                .count();
            assert_eq!(count, 1, "{style} should be defined once");
        }
    }

    #[test]
    fn unknown_layer_falls_back_to_identity() {
        let def = find_architecture(ArchitectureStyle::Clean).unwrap();
        assert_eq!(def.physical_path("model"), "domain/model");
        assert_eq!(def.physical_path("reporting"), "reporting");
        assert_eq!(def.package_for("repository-impl"), "infrastructure.persistence");
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    #[test]
    fn unconditional_blueprints_come_first_in_order() {
        let flags = FeatureFlags::all();
        let tasks = resolve_blueprints(ArchitectureStyle::Mvc, &flags);

        let templates: Vec<_> = tasks.iter().take(6).map(|t| t.template_id).collect();
        assert_eq!(
            templates,
            vec![
                "entity/Entity",
                "dto/DTO",
                "mapper/Mapper",
                "repository/Repository",
                "service/Service",
                "controller/Controller",
            ]
        );
        assert!(tasks[..6].iter().all(|t| t.gate.is_none()));
        assert!(tasks[6..].iter().all(|t| t.gate.is_some()));
    }

    #[test]
    fn disabled_features_emit_no_gated_tasks() {
        for style in ArchitectureStyle::ALL {
            let tasks = resolve_blueprints(style, &FeatureFlags::none());
            assert!(tasks.iter().all(|t| t.gate.is_none()), "{style}");
            assert!(!tasks.is_empty());
        }
    }

    #[test]
    fn clean_with_api_docs_and_no_auth() {
        let flags = FeatureFlags::none().with(Feature::ApiDocs, true);
        let tasks = resolve_blueprints(ArchitectureStyle::Clean, &flags);

        assert!(tasks.iter().any(|t| t.file_name == FileName::Exact("SwaggerConfig.java")));
        assert!(
            !tasks
                .iter()
                .any(|t| t.file_name == FileName::Exact("JwtAuthenticationFilter.java"))
        );
        let swagger = tasks
            .iter()
            .find(|t| t.template_id == "config/SwaggerConfig")
            .unwrap();
        assert_eq!(swagger.directory, "infrastructure/config");
    }

    #[test]
    fn slice_placeholder_is_substituted() {
        let tasks = resolve_blueprints(ArchitectureStyle::FeatureDriven, &FeatureFlags::none());
        let entity = tasks
            .iter()
            .find(|t| t.template_id == "entity/Entity")
            .unwrap();
        assert_eq!(entity.directory_for("order"), "features/order/model");
        assert_eq!(entity.package_suffix("order"), "features.order.model");
    }

    #[test]
    fn blueprint_completeness_for_every_flag_combination() {
        for style in ArchitectureStyle::ALL {
            for bits in 0u16..(1 << Feature::ALL.len()) {
                let flags = FeatureFlags::from_bits(bits);
                let tasks = resolve_blueprints(style, &flags);

                for task in &tasks {
                    assert!(!task.directory.is_empty());
                    assert!(!task.directory_for("x").is_empty());
                }

                let def = find_architecture(style).unwrap();
                for fb in def.feature_blueprints {
                    let hits = tasks
                        .iter()
                        .filter(|t| {
                            t.template_id == fb.template_id && t.gate == Some(fb.gate)
                        })
                        .count();
                    let expected = usize::from(flags.is_enabled(fb.gate));
                    assert_eq!(hits, expected, "{style} {}", fb.template_id);
                }
            }
        }
    }

    #[test]
    fn resolved_paths_are_unique_within_a_style() {
        for style in ArchitectureStyle::ALL {
            let tasks = resolve_blueprints(style, &FeatureFlags::all());
            let mut seen = HashSet::new();
            for t in &tasks {
                let path = format!("{}/{}", t.directory_for("demo"), t.file_name.resolve("Demo"));
                assert!(seen.insert(path.clone()), "{style}: duplicate {path}");
            }
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let flags = FeatureFlags::all();
        for style in ArchitectureStyle::ALL {
            assert_eq!(
                resolve_blueprints(style, &flags),
                resolve_blueprints(style, &flags)
            );
        }
    }
}
