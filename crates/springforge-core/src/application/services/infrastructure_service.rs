//! Container composition derived from the selected dependencies.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ApplicationError,
    domain::{DependencyRegistry, InfraDescriptor, entities::HealthCheck},
    error::SpringforgeResult,
};

const COMPOSE_VERSION: &str = "3.8";

/// Result of composing infrastructure for a dependency set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeOutcome {
    /// No selected dependency needs a container.
    NotNeeded,
    Compose(ComposeDocument),
}

impl ComposeOutcome {
    pub fn document(&self) -> Option<&ComposeDocument> {
        match self {
            Self::NotNeeded => None,
            Self::Compose(doc) => Some(doc),
        }
    }
}

/// Services in start-up order plus their named volumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeDocument {
    pub services: Vec<ComposeService>,
    pub volumes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeService {
    #[serde(skip)]
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthCheck>,
}

impl ComposeService {
    fn from_descriptor(infra: &InfraDescriptor, depends_on: Vec<String>) -> Self {
        Self {
            name: infra.service.clone(),
            image: infra.image.clone(),
            container_name: infra.container_name.clone(),
            command: infra.command.clone(),
            ports: infra.ports.clone(),
            environment: infra.environment.clone(),
            volumes: infra
                .volume
                .iter()
                .map(|v| format!("{}:{}", v.name, v.mount_path))
                .collect(),
            depends_on,
            healthcheck: infra.healthcheck.clone(),
        }
    }
}

/// Serialized shape of the compose file.
#[derive(Serialize)]
struct ComposeFile<'a> {
    version: &'static str,
    services: OrderedServices<'a>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    volumes: BTreeMap<&'a str, BTreeMap<String, String>>,
}

/// Services keep their start-up order instead of being sorted by name.
struct OrderedServices<'a>(&'a [ComposeService]);

impl Serialize for OrderedServices<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for service in self.0 {
            map.serialize_entry(&service.name, service)?;
        }
        map.end()
    }
}

impl ComposeDocument {
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| s.name.as_str())
    }

    /// Position of a service in start-up order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.services.iter().position(|s| s.name == name)
    }

    pub fn to_yaml(&self) -> SpringforgeResult<String> {
        let file = ComposeFile {
            version: COMPOSE_VERSION,
            services: OrderedServices(&self.services),
            volumes: self
                .volumes
                .iter()
                .map(|v| (v.as_str(), BTreeMap::new()))
                .collect(),
        };
        serde_yaml::to_string(&file).map_err(|e| {
            ApplicationError::ComposeSerialization {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

pub struct InfrastructureService {
    registry: Arc<DependencyRegistry>,
}

impl InfrastructureService {
    pub fn new(registry: Arc<DependencyRegistry>) -> Self {
        Self { registry }
    }

    /// Derive the service set and its start-up order.
    ///
    /// Services are emitted in rule priority order, except that a service
    /// always follows every selected service it depends on. Edges to
    /// services that were not selected are dropped. A cycle is broken by
    /// emitting the highest-priority waiting service and dropping its
    /// unsatisfied edges.
    #[instrument(skip_all)]
    pub fn compose<I, S>(&self, ids: I) -> ComposeOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let descriptors: Vec<&InfraDescriptor> = self
            .registry
            .rules_for(ids)
            .into_iter()
            .filter_map(|r| r.infrastructure.as_ref())
            .collect();

        if descriptors.is_empty() {
            debug!("No infrastructure needed");
            return ComposeOutcome::NotNeeded;
        }

        let selected: BTreeSet<&str> = descriptors.iter().map(|d| d.service.as_str()).collect();
        let mut waiting: Vec<(&InfraDescriptor, Vec<&str>)> = descriptors
            .iter()
            .map(|d| {
                let edges = d
                    .depends_on
                    .iter()
                    .map(String::as_str)
                    .filter(|dep| {
                        let known = selected.contains(dep);
                        if !known {
                            warn!(
                                service = %d.service,
                                depends_on = %dep,
                                "Start-up dependency is not part of the composition, edge dropped"
                            );
                        }
                        known
                    })
                    .collect();
                (*d, edges)
            })
            .collect();

        let mut started: BTreeSet<&str> = BTreeSet::new();
        let mut services = Vec::with_capacity(waiting.len());

        while !waiting.is_empty() {
            let ready = waiting
                .iter()
                .position(|(_, edges)| edges.iter().all(|e| started.contains(e)));

            let index = ready.unwrap_or_else(|| {
                warn!(
                    service = %waiting[0].0.service,
                    "Start-up dependency cycle, breaking it at this service"
                );
                0
            });

            let (descriptor, edges) = waiting.remove(index);
            let depends_on: Vec<String> = edges
                .into_iter()
                .filter(|e| started.contains(e))
                .map(str::to_string)
                .collect();
            started.insert(descriptor.service.as_str());
            services.push(ComposeService::from_descriptor(descriptor, depends_on));
        }

        let volumes = descriptors
            .iter()
            .filter_map(|d| d.volume.as_ref())
            .map(|v| v.name.clone())
            .collect();

        info!(services = services.len(), "Infrastructure composed");
        ComposeOutcome::Compose(ComposeDocument { services, volumes })
    }
}
