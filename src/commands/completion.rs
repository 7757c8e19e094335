//! The `completion` command: emit shell completion scripts on stdout.
use anyhow::Result;
use clap::CommandFactory as _;

use crate::cli::{Cli, CompletionOpts};

/// Run the completion command.
///
/// # Errors
///
/// Infallible in practice; the `Result` keeps the command signatures uniform.
pub fn run(opts: &CompletionOpts) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(opts.shell, &mut command, "dotlink", &mut std::io::stdout());
    Ok(())
}
