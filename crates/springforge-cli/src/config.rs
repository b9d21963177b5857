//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `SPRINGFORGE_*` environment variables, `__` between nested keys
//!    (`SPRINGFORGE_DEFAULTS__GROUP_ID=org.acme`)
//! 3. Config file (`--config`, or the per-user location)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use springforge_core::domain::{ArchitectureStyle, BuildTool};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SPRINGFORGE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Values used when neither a preset, a description file nor a flag
    /// supplies them.
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub group_id: String,
    /// Empty means "latest known platform line".
    pub platform_version: String,
    pub language_version: String,
    pub build_tool: BuildTool,
    pub architecture: ArchitectureStyle,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            group_id: "com.example".into(),
            platform_version: String::new(),
            language_version: "21".into(),
            build_tool: BuildTool::Maven,
            architecture: ArchitectureStyle::Layered,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of `*.tmpl` overrides.
    pub local_path: Option<PathBuf>,
    /// Rule files layered over the built-in catalogue, in order.
    pub rule_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write JSON logs to a daily rolling file.
    pub file: bool,
    /// Defaults to the per-user data directory.
    pub directory: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("io", "springforge", "springforge")
                .map(|d| d.data_local_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from(".springforge/logs"))
        })
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the per-user file is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .context("failed to seed configuration defaults")?;

        let file_source = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(Self::config_path().as_path()).required(false),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        settings
            .try_deserialize()
            .context("configuration has an unexpected shape")
    }

    /// Per-user configuration file, falling back to `.springforge.toml` in
    /// the current directory when no home directory can be determined.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "springforge", "springforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".springforge.toml"))
    }

    /// Effective template override directory.
    pub fn template_dir<'a>(&'a self, explicit: Option<&'a Path>) -> Option<&'a Path> {
        explicit.or(self.templates.local_path.as_deref())
    }

    /// Configured rule files followed by the ones given on the command line.
    pub fn rule_files(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        self.templates
            .rule_files
            .iter()
            .chain(extra)
            .cloned()
            .collect()
    }
}
