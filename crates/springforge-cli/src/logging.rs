//! Tracing subscriber for the binary.
//!
//! The library crates only emit events; this is the single place a
//! subscriber is installed. `RUST_LOG` replaces the computed filter
//! entirely. Otherwise our own crates log at the level picked by `-v`/`-q`
//! and everything else only reports errors.

use std::io::{self, IsTerminal as _};

use anyhow::Context as _;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, LevelFilter},
    fmt,
    prelude::*,
};

use crate::cli::GlobalArgs;
use crate::config::LoggingConfig;

const OUR_CRATES: [&str; 3] = ["springforge", "springforge_core", "springforge_adapters"];

/// Rolled daily; the date is appended as a suffix.
const LOG_FILE_PREFIX: &str = "springforge.log";

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered file lines are lost.
pub fn init_logging(args: &GlobalArgs, logging: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => crate_filter(verbosity(args))?,
    };

    let console = fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_ansi(!args.no_color && io::stderr().is_terminal())
        .with_writer(io::stderr);

    let (file, guard) = if args.log_file || logging.file {
        let directory = logging.resolved_directory();
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("cannot create log directory {}", directory.display()))?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(&directory, LOG_FILE_PREFIX));
        let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("a tracing subscriber is already installed")?;

    Ok(guard)
}

/// `-q` wins over any number of `-v`.
fn verbosity(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn crate_filter(level: LevelFilter) -> anyhow::Result<EnvFilter> {
    OUR_CRATES.iter().try_fold(EnvFilter::default(), |filter, krate| {
        let directive = format!("{krate}={level}")
            .parse::<Directive>()
            .with_context(|| format!("bad log directive for {krate}"))?;
        Ok(filter.add_directive(directive))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
            log_file: false,
            output_format: OutputFormat::Auto,
        }
    }

    #[test]
    fn default_shows_warnings() {
        assert_eq!(verbosity(&args(0, false)), LevelFilter::WARN);
    }

    #[test]
    fn each_v_lowers_the_threshold() {
        assert_eq!(verbosity(&args(1, false)), LevelFilter::INFO);
        assert_eq!(verbosity(&args(2, false)), LevelFilter::DEBUG);
        assert_eq!(verbosity(&args(3, false)), LevelFilter::TRACE);
        assert_eq!(verbosity(&args(9, false)), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(verbosity(&args(0, true)), LevelFilter::ERROR);
        assert_eq!(verbosity(&args(3, true)), LevelFilter::ERROR);
    }

    #[test]
    fn filter_names_every_workspace_crate() {
        let rendered = crate_filter(LevelFilter::DEBUG).unwrap().to_string().to_lowercase();
        for krate in OUR_CRATES {
            assert!(rendered.contains(&format!("{krate}=debug")), "{rendered}");
        }
    }
}
