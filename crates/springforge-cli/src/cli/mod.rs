//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. Domain values (`BuildTool`,
//! `ArchitectureStyle`, `Feature`, ...) are parsed through their own
//! `FromStr` impls so the accepted aliases stay in one place.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use springforge_core::domain::{ArchitectureStyle, BuildTool, Feature, Packaging};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "springforge",
    bin_name = "springforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Spring Boot project generator",
    long_about = "springforge composes a complete Spring Boot project from an \
                  architecture style, a dependency selection and feature flags.",
    after_help = "EXAMPLES:\n\
        \x20 springforge new orders -g com.acme -a clean -d web,data-jpa,postgresql\n\
        \x20 springforge new shop --preset rest-api --build-tool gradle\n\
        \x20 springforge list dependencies --format json\n\
        \x20 springforge completions bash > /usr/share/bash-completion/completions/springforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project.
    #[command(
        visible_alias = "n",
        about = "Generate a new Spring Boot project",
        after_help = "EXAMPLES:\n\
            \x20 springforge new orders -g com.acme -d web,data-jpa,h2 --enable api-docs\n\
            \x20 springforge new orders --preset microservice -o ~/work\n\
            \x20 springforge new --from project.toml --dry-run"
    )]
    New(NewArgs),

    /// List catalogues.
    #[command(
        visible_alias = "ls",
        about = "List architectures, dependencies, presets or versions",
        after_help = "EXAMPLES:\n\
            \x20 springforge list\n\
            \x20 springforge list dependencies --category database\n\
            \x20 springforge list architectures --format csv"
    )]
    List(ListArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 springforge completions bash > ~/.local/share/bash-completion/completions/springforge\n\
            \x20 springforge completions zsh  > ~/.zfunc/_springforge\n\
            \x20 springforge completions fish > ~/.config/fish/completions/springforge.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Inspect configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 springforge config get defaults.group_id\n\
            \x20 springforge config list\n\
            \x20 springforge config path"
    )]
    Config(ConfigCommands),
}

impl Commands {
    /// Canonical subcommand name, for log spans.
    pub fn name(&self) -> &'static str {
        match self {
            Self::New(_) => "new",
            Self::List(_) => "list",
            Self::Completions(_) => "completions",
            Self::Config(_) => "config",
        }
    }
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `springforge new`.
///
/// Every project field is optional here: values are layered from the
/// configuration defaults, then `--preset`, then `--from`, then these flags.
#[derive(Debug, Default, Args)]
pub struct NewArgs {
    /// Artifact id; also the name of the generated directory.
    #[arg(value_name = "ARTIFACT_ID", help = "Artifact id (and directory name)")]
    pub artifact_id: Option<String>,

    #[arg(short = 'g', long = "group-id", value_name = "GROUP", help = "Maven group id")]
    pub group_id: Option<String>,

    #[arg(long = "name", value_name = "NAME", help = "Human readable project name")]
    pub name: Option<String>,

    #[arg(long = "description", value_name = "TEXT", help = "Project description")]
    pub description: Option<String>,

    #[arg(
        long = "package",
        value_name = "PACKAGE",
        help = "Base package (default: group id + artifact id)"
    )]
    pub package_name: Option<String>,

    #[arg(
        short = 'j',
        long = "java",
        value_name = "VERSION",
        help = "Java language version"
    )]
    pub language_version: Option<String>,

    #[arg(
        short = 'b',
        long = "build-tool",
        value_name = "TOOL",
        help = "Build tool: maven or gradle"
    )]
    pub build_tool: Option<BuildTool>,

    #[arg(long = "packaging", value_name = "KIND", help = "Packaging: jar or war")]
    pub packaging: Option<Packaging>,

    #[arg(
        short = 'a',
        long = "arch",
        value_name = "STYLE",
        help = "Architecture style (see `springforge list architectures`)"
    )]
    pub architecture: Option<ArchitectureStyle>,

    #[arg(
        short = 'p',
        long = "boot-version",
        value_name = "VERSION",
        help = "Spring Boot platform version (default: latest known)"
    )]
    pub platform_version: Option<String>,

    /// Repeatable and comma separated: `-d web,data-jpa -d h2`.
    #[arg(
        short = 'd',
        long = "dependency",
        value_name = "ID",
        value_delimiter = ',',
        help = "Dependency ids (see `springforge list dependencies`)"
    )]
    pub dependencies: Vec<String>,

    #[arg(
        short = 'e',
        long = "enable",
        value_name = "FEATURE",
        value_delimiter = ',',
        help = "Enable features, e.g. auth,api-docs,container-files"
    )]
    pub enable: Vec<Feature>,

    #[arg(
        long = "disable",
        value_name = "FEATURE",
        value_delimiter = ',',
        help = "Disable features turned on by a preset or file"
    )]
    pub disable: Vec<Feature>,

    #[arg(long = "all-features", help = "Enable every feature")]
    pub all_features: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory of the project (default: current directory)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long = "preset", value_name = "ID", help = "Start from a named preset")]
    pub preset: Option<String>,

    #[arg(
        long = "from",
        value_name = "FILE",
        help = "Read the project description from a TOML or JSON file"
    )]
    pub from: Option<PathBuf>,

    #[arg(
        long = "templates",
        value_name = "DIR",
        help = "Directory of *.tmpl files overriding built-in templates"
    )]
    pub templates: Option<PathBuf>,

    #[arg(
        long = "rules",
        value_name = "FILE",
        help = "Extra dependency rule file (TOML or JSON), repeatable"
    )]
    pub rules: Vec<PathBuf>,

    #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
    pub yes: bool,

    #[arg(long = "dry-run", help = "List the files that would be generated")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_enum, default_value = "dependencies", help = "What to list")]
    pub target: ListTarget,

    /// Only meaningful for `dependencies`.
    #[arg(long = "category", value_name = "CATEGORY", help = "Filter dependencies by category")]
    pub category: Option<String>,

    #[arg(
        long = "rules",
        value_name = "FILE",
        help = "Extra dependency rule file to include, repeatable"
    )]
    pub rules: Vec<PathBuf>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    #[value(alias = "arch")]
    Architectures,
    #[value(alias = "deps")]
    Dependencies,
    Presets,
    Versions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Aligned columns.
    Table,
    /// One id per line.
    List,
    /// JSON array of objects.
    Json,
    /// CSV with a header row.
    Csv,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// bash, zsh, fish, powershell or elvish
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value.
    Get {
        /// Dotted key path, e.g. `defaults.build_tool`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the default configuration file location.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
