//! `springforge`: generate complete Spring Boot projects.
//!
//! Exit codes: 0 on success, 1 for internal failures, 2 for bad input,
//! 3 when a named preset, key or resource does not exist and 4 for
//! configuration problems.

use std::io::{self, IsTerminal as _};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliResult, ExitStatus},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(&e),
    };

    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: failed to load configuration: {e:#}");
            return ExitStatus::Config.into();
        }
    };

    // Dropping the guard flushes the file writer, so it lives until exit.
    let _log_guard = match init_logging(&cli.global, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: failed to initialise logging: {e:#}");
            return ExitStatus::Internal.into();
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.is_verbose();
    let color = output.supports_color() && io::stderr().is_terminal();

    match dispatch(cli, config, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.log();
            eprint!("{}", err.report().render(color, verbose));
            err.status().into()
        }
    }
}

/// `--help` and `--version` also arrive here and exit 0.
fn parse_failure(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitStatus::Usage.into()
    } else {
        ExitCode::SUCCESS
    }
}

#[instrument(skip_all, fields(command = cli.command.name()))]
fn dispatch(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        format = ?cli.global.output_format,
        "Dispatching"
    );
    match cli.command {
        Commands::New(args) => commands::new::execute(args, cli.global, config, output),
        Commands::List(args) => commands::list::execute(args, config, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}
