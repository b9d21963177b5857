//! Command failures and how they reach the terminal.
//!
//! Every [`CliError`] resolves to an [`ExitStatus`] and a [`Report`]. The
//! report is rendered exactly once, by `main`, in colour or as plain text.

use std::error::Error as _;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use owo_colors::{OwoColorize, Style};
use thiserror::Error;

use springforge_adapters::AdapterError;
use springforge_core::{
    application::ApplicationError,
    domain::PRESET_REGISTRY,
    error::{ErrorCategory, SpringforgeError},
};

pub type CliResult<T> = Result<T, CliError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Flag values that parse but make no sense together.
    #[error("{message}")]
    Usage {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("unknown preset '{id}'")]
    UnknownPreset { id: String },

    /// `--from` file unreadable or not a project description.
    #[error("cannot use project file {path}: {reason}")]
    ProjectFile { path: PathBuf, reason: String },

    /// Rule files, the config file or its serialisation.
    #[error("configuration problem: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    #[error(transparent)]
    Core(#[from] SpringforgeError),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("generation cancelled")]
    Cancelled,
}

impl From<io::Error> for CliError {
    fn from(source: io::Error) -> Self {
        CliError::Io {
            context: "terminal I/O failed".into(),
            source,
        }
    }
}

impl From<AdapterError> for CliError {
    fn from(err: AdapterError) -> Self {
        CliError::Core(err.into())
    }
}

/// Process exit status. The discriminant is the code handed to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Internal = 1,
    Usage = 2,
    NotFound = 3,
    Config = 4,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl CliError {
    pub fn status(&self) -> ExitStatus {
        match self {
            Self::Usage { .. } | Self::ProjectFile { .. } | Self::Cancelled => ExitStatus::Usage,
            Self::UnknownPreset { .. } | Self::UnknownConfigKey { .. } => ExitStatus::NotFound,
            Self::Config { .. } => ExitStatus::Config,
            Self::Io { .. } => ExitStatus::Internal,
            Self::Core(core) => match core.category() {
                ErrorCategory::Validation | ErrorCategory::Conflict => ExitStatus::Usage,
                ErrorCategory::NotFound => ExitStatus::NotFound,
                ErrorCategory::Configuration => ExitStatus::Config,
                ErrorCategory::Internal => ExitStatus::Internal,
            },
        }
    }

    /// What the user can do about it.
    pub fn hints(&self) -> Vec<String> {
        match self {
            Self::Usage { .. } => vec!["See 'springforge <command> --help'".into()],

            Self::UnknownPreset { .. } => PRESET_REGISTRY
                .iter()
                .map(|preset| format!("--preset {:<12} {}", preset.id, preset.description))
                .collect(),

            Self::ProjectFile { .. } => vec![
                "Project files are .toml or .json with kebab-case keys".into(),
                "Example keys: group-id, artifact-id, build-tool, dependencies, features".into(),
            ],

            Self::Config { .. } => vec![
                "'springforge config path' shows which file is read".into(),
                "Environment overrides look like SPRINGFORGE_DEFAULTS__GROUP_ID".into(),
            ],

            Self::UnknownConfigKey { .. } => {
                vec!["'springforge config list' prints every key".into()]
            }

            Self::Core(SpringforgeError::Application(ApplicationError::ProjectExists {
                path,
            })) => vec![
                "Pick another artifact id or pass --output <dir>".into(),
                format!("Or remove {} first", path.display()),
            ],

            Self::Core(core) => core.suggestions(),

            Self::Io { .. } => vec!["Check permissions and free disk space".into()],

            Self::Cancelled => vec!["Nothing was written".into()],
        }
    }

    pub fn report(&self) -> Report {
        let mut causes = Vec::new();
        let mut source = self.source();
        while let Some(err) = source {
            causes.push(err.to_string());
            source = err.source();
        }
        Report {
            headline: self.to_string(),
            causes,
            hints: self.hints(),
        }
    }

    pub fn log(&self) {
        let status = self.status();
        match status {
            ExitStatus::Usage | ExitStatus::NotFound => {
                tracing::warn!(?status, error = %self, "Command rejected")
            }
            ExitStatus::Config | ExitStatus::Internal => {
                tracing::error!(?status, error = %self, "Command failed")
            }
        }
    }
}

/// A rendered-once view of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub headline: String,
    pub causes: Vec<String>,
    pub hints: Vec<String>,
}

impl Report {
    pub fn render(&self, color: bool, verbose: bool) -> String {
        let paint = |text: &str, style: Style| {
            if color {
                text.style(style).to_string()
            } else {
                text.to_string()
            }
        };

        let mut out = format!(
            "{} {}\n",
            paint("error:", Style::new().red().bold()),
            self.headline
        );

        if verbose {
            for cause in &self.causes {
                out.push_str(&format!("  {} {cause}\n", paint("caused by:", Style::new().dimmed())));
            }
        }

        if !self.hints.is_empty() {
            out.push_str(&format!("\n{}\n", paint("help:", Style::new().yellow().bold())));
            for hint in &self.hints {
                out.push_str(&format!("  {hint}\n"));
            }
        }

        if !verbose && !self.causes.is_empty() {
            out.push_str(&paint("\n(run with -v to see the cause chain)\n", Style::new().dimmed()));
        }
        out
    }
}
