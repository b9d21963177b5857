//! Everything a command prints on stdout goes through [`OutputManager`].
//!
//! Three kinds of text exist: narration (progress, hints, next steps) which
//! `--quiet` silences, status lines carrying a leading mark, and data
//! (listings, JSON documents, config values) which is always written so
//! pipes keep working.

use std::io::{self, IsTerminal as _};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn mark(self) -> &'static str {
        match self {
            Tone::Success => "\u{2713}",
            Tone::Warning => "\u{26a0}",
            Tone::Info => "\u{2139}",
        }
    }

    fn style(self) -> Style {
        match self {
            Tone::Success => Style::new().green().bold(),
            Tone::Warning => Style::new().yellow().bold(),
            Tone::Info => Style::new().blue().bold(),
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    term: Term,
}

impl OutputManager {
    /// `Auto` is settled here: human on a terminal, plain otherwise.
    /// Colour is only ever used for human output.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };
        let color = format == OutputFormat::Human && !args.no_color && !config.output.no_color;

        Self {
            format,
            quiet: args.quiet,
            color,
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    pub fn data(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    pub fn json(&self, value: &serde_json::Value) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.data(&text)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Tone::Info, msg)
    }

    /// Section title above a table.
    pub fn header(&self, text: &str) -> io::Result<()> {
        let style = Style::new().cyan().bold();
        self.print(&self.paint(text, style))
    }

    /// Ticking spinner for human output; `None` elsewhere. The caller
    /// clears it with [`ProgressBar::finish_and_clear`].
    pub fn spinner(&self, msg: &str) -> Option<ProgressBar> {
        if self.quiet || self.format != OutputFormat::Human {
            return None;
        }
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style);
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    }

    pub fn supports_color(&self) -> bool {
        self.color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn status(&self, tone: Tone, msg: &str) -> io::Result<()> {
        let line = format!("{} {msg}", self.paint(tone.mark(), tone.style()));
        self.print(&line)
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}
