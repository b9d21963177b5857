//! `springforge completions <shell>`: print a completion script on stdout.

use std::io;

use clap::CommandFactory;
use clap_complete::{Generator, generate};

use crate::cli::{Cli, CompletionsArgs};
use crate::error::CliResult;

const BIN_NAME: &str = "springforge";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    write_script(args.shell, &mut io::stdout());
    Ok(())
}

fn write_script(shell: impl Generator, out: &mut dyn io::Write) {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
}
