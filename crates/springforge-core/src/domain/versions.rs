//! Library version tables keyed by platform `major.minor`.
//!
//! Every externally referenced library or plugin version that ends up in a
//! generated build descriptor comes from one [`LibraryVersions`] row. The
//! catalogue is plain data built once and shared read-only.

use crate::domain::error::DomainError;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Pinned versions for one platform line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryVersions {
    /// Platform line this row belongs to, e.g. `"3.4"`.
    pub line: &'static str,
    /// Newest patch release of the line, used when no concrete version was asked for.
    pub boot_version: &'static str,
    pub jjwt: &'static str,
    pub springdoc: &'static str,
    pub mapstruct: &'static str,
    pub maven_compiler_plugin: &'static str,
    pub lombok_mapstruct_binding: &'static str,
    pub surefire: &'static str,
    pub failsafe: &'static str,
    pub jacoco: &'static str,
    pub enforcer: &'static str,
    pub versions_plugin: &'static str,
    pub dependency_check: &'static str,
    pub checkstyle: &'static str,
    pub junit: &'static str,
    pub lombok: &'static str,
    pub dependency_management: &'static str,
}

/// Addressable columns of [`LibraryVersions`].
///
/// Rule catalogues reference these as `{{versions.<key>}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionKey {
    Boot,
    Jjwt,
    Springdoc,
    Mapstruct,
    MavenCompilerPlugin,
    LombokMapstructBinding,
    Surefire,
    Failsafe,
    Jacoco,
    Enforcer,
    VersionsPlugin,
    DependencyCheck,
    Checkstyle,
    Junit,
    Lombok,
    DependencyManagement,
}

impl VersionKey {
    pub const ALL: [VersionKey; 16] = [
        Self::Boot,
        Self::Jjwt,
        Self::Springdoc,
        Self::Mapstruct,
        Self::MavenCompilerPlugin,
        Self::LombokMapstructBinding,
        Self::Surefire,
        Self::Failsafe,
        Self::Jacoco,
        Self::Enforcer,
        Self::VersionsPlugin,
        Self::DependencyCheck,
        Self::Checkstyle,
        Self::Junit,
        Self::Lombok,
        Self::DependencyManagement,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Jjwt => "jjwt",
            Self::Springdoc => "springdoc",
            Self::Mapstruct => "mapstruct",
            Self::MavenCompilerPlugin => "maven-compiler-plugin",
            Self::LombokMapstructBinding => "lombok-mapstruct-binding",
            Self::Surefire => "surefire",
            Self::Failsafe => "failsafe",
            Self::Jacoco => "jacoco",
            Self::Enforcer => "enforcer",
            Self::VersionsPlugin => "versions-plugin",
            Self::DependencyCheck => "dependency-check",
            Self::Checkstyle => "checkstyle",
            Self::Junit => "junit",
            Self::Lombok => "lombok",
            Self::DependencyManagement => "dependency-management",
        }
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::UnknownValue {
                kind: "version key",
                value: s.to_string(),
            })
    }
}

impl LibraryVersions {
    pub const fn get(&self, key: VersionKey) -> &'static str {
        match key {
            VersionKey::Boot => self.boot_version,
            VersionKey::Jjwt => self.jjwt,
            VersionKey::Springdoc => self.springdoc,
            VersionKey::Mapstruct => self.mapstruct,
            VersionKey::MavenCompilerPlugin => self.maven_compiler_plugin,
            VersionKey::LombokMapstructBinding => self.lombok_mapstruct_binding,
            VersionKey::Surefire => self.surefire,
            VersionKey::Failsafe => self.failsafe,
            VersionKey::Jacoco => self.jacoco,
            VersionKey::Enforcer => self.enforcer,
            VersionKey::VersionsPlugin => self.versions_plugin,
            VersionKey::DependencyCheck => self.dependency_check,
            VersionKey::Checkstyle => self.checkstyle,
            VersionKey::Junit => self.junit,
            VersionKey::Lombok => self.lombok,
            VersionKey::DependencyManagement => self.dependency_management,
        }
    }

    /// Replace every `{{versions.<key>}}` token with the pinned value.
    ///
    /// Unknown keys are left in place.
    pub fn interpolate(&self, text: &str) -> String {
        const OPEN: &str = "{{versions.";
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match VersionKey::from_str(key) {
                        Ok(k) => out.push_str(self.get(k)),
                        Err(_) => {
                            out.push_str(OPEN);
                            out.push_str(key);
                            out.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

// ── Built-in tables ──────────────────────────────────────────────────────────

static BUILTIN_TABLES: &[LibraryVersions] = &[
    LibraryVersions {
        line: "3.4",
        boot_version: "3.4.1",
        jjwt: "0.12.6",
        springdoc: "2.7.0",
        mapstruct: "1.6.3",
        maven_compiler_plugin: "3.13.0",
        lombok_mapstruct_binding: "0.2.0",
        surefire: "3.5.2",
        failsafe: "3.5.2",
        jacoco: "0.8.12",
        enforcer: "3.5.0",
        versions_plugin: "2.18.2",
        dependency_check: "10.21.0",
        checkstyle: "10.21.0",
        junit: "5.11.4",
        lombok: "1.18.36",
        dependency_management: "1.1.7",
    },
    LibraryVersions {
        line: "3.3",
        boot_version: "3.3.7",
        jjwt: "0.12.6",
        springdoc: "2.6.0",
        mapstruct: "1.6.0",
        maven_compiler_plugin: "3.13.0",
        lombok_mapstruct_binding: "0.2.0",
        surefire: "3.3.1",
        failsafe: "3.3.1",
        jacoco: "0.8.12",
        enforcer: "3.5.0",
        versions_plugin: "2.18.1",
        dependency_check: "10.20.2",
        checkstyle: "10.20.2",
        junit: "5.10.3",
        lombok: "1.18.34",
        dependency_management: "1.1.6",
    },
    LibraryVersions {
        line: "3.2",
        boot_version: "3.2.12",
        jjwt: "0.12.3",
        springdoc: "2.3.0",
        mapstruct: "1.5.5.Final",
        maven_compiler_plugin: "3.12.1",
        lombok_mapstruct_binding: "0.2.0",
        surefire: "3.2.5",
        failsafe: "3.2.5",
        jacoco: "0.8.11",
        enforcer: "3.4.1",
        versions_plugin: "2.17.1",
        dependency_check: "10.18.2",
        checkstyle: "10.18.2",
        junit: "5.10.2",
        lombok: "1.18.32",
        dependency_management: "1.1.4",
    },
    LibraryVersions {
        line: "3.1",
        boot_version: "3.1.12",
        jjwt: "0.11.5",
        springdoc: "2.2.0",
        mapstruct: "1.5.5.Final",
        maven_compiler_plugin: "3.11.0",
        lombok_mapstruct_binding: "0.2.0",
        surefire: "3.1.2",
        failsafe: "3.1.2",
        jacoco: "0.8.10",
        enforcer: "3.3.0",
        versions_plugin: "2.16.0",
        dependency_check: "10.12.7",
        checkstyle: "10.12.7",
        junit: "5.9.3",
        lombok: "1.18.30",
        dependency_management: "1.1.3",
    },
    LibraryVersions {
        line: "3.0",
        boot_version: "3.0.13",
        jjwt: "0.11.5",
        springdoc: "2.0.4",
        mapstruct: "1.5.3.Final",
        maven_compiler_plugin: "3.10.1",
        lombok_mapstruct_binding: "0.2.0",
        surefire: "3.0.0",
        failsafe: "3.0.0",
        jacoco: "0.8.9",
        enforcer: "3.2.2",
        versions_plugin: "2.15.0",
        dependency_check: "10.12.0",
        checkstyle: "10.12.0",
        junit: "5.9.2",
        lombok: "1.18.26",
        dependency_management: "1.1.0",
    },
];

/// Outcome of resolving a platform version against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResolution {
    /// What the caller asked for, verbatim.
    pub requested: Option<String>,
    /// The `major.minor` key that was looked up, if one could be extracted.
    pub key: Option<String>,
    pub versions: LibraryVersions,
    /// True when the latest table was substituted for an unmapped request.
    pub fell_back: bool,
    /// The platform version written into build descriptors.
    pub platform_version: String,
}

/// Read-only set of version tables, newest first.
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    tables: Vec<LibraryVersions>,
}

impl VersionCatalog {
    /// The catalogue compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            tables: BUILTIN_TABLES.to_vec(),
        }
    }

    /// Build a catalogue from explicit rows. The first row is the latest.
    pub fn new(tables: Vec<LibraryVersions>) -> Result<Self, DomainError> {
        if tables.is_empty() {
            return Err(DomainError::InvalidConfig {
                field: "version catalogue",
                reason: "at least one version table is required".into(),
            });
        }
        Ok(Self { tables })
    }

    pub fn latest(&self) -> &LibraryVersions {
        &self.tables[0]
    }

    pub fn lines(&self) -> impl Iterator<Item = &LibraryVersions> {
        self.tables.iter()
    }

    pub fn lookup(&self, line: &str) -> Option<&LibraryVersions> {
        self.tables.iter().find(|t| t.line == line)
    }

    /// Map a platform version to its pinned table.
    ///
    /// Blank, malformed or unmapped input falls back to the latest table and
    /// logs a warning. Never fails.
    pub fn resolve(&self, platform_version: Option<&str>) -> VersionResolution {
        let requested = platform_version
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let key = requested.as_deref().and_then(major_minor);
        let found = key.as_deref().and_then(|k| self.lookup(k)).copied();

        match found {
            Some(versions) => {
                debug!(line = versions.line, "Resolved library versions");
                let platform_version = match requested.as_deref() {
                    Some(r) if r != versions.line => r.to_string(),
                    _ => versions.boot_version.to_string(),
                };
                VersionResolution {
                    requested,
                    key,
                    versions,
                    fell_back: false,
                    platform_version,
                }
            }
            None => {
                let versions = *self.latest();
                warn!(
                    requested = requested.as_deref().unwrap_or("<none>"),
                    fallback = versions.line,
                    "Platform version not mapped, using latest version table"
                );
                VersionResolution {
                    requested,
                    key,
                    versions,
                    fell_back: true,
                    platform_version: versions.boot_version.to_string(),
                }
            }
        }
    }
}

impl Default for VersionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Extract `major.minor` from a version string such as `3.2.0-SNAPSHOT`.
fn major_minor(version: &str) -> Option<String> {
    let mut parts = version.split('.');
    let major = numeric_prefix(parts.next()?)?;
    let minor = numeric_prefix(parts.next()?)?;
    Some(format!("{major}.{minor}"))
}

fn numeric_prefix(part: &str) -> Option<&str> {
    let end = part
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(part.len(), |(i, _)| i);
    (end > 0).then(|| &part[..end])
}
