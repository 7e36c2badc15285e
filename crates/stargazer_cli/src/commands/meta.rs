//! Meta commands: shell completion generation.

use std::io;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

pub(crate) fn handle_completions(shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
