//! Binary entry point: parse the CLI, install logging, dispatch.
use anyhow::Result;
use clap::Parser as _;

use dotlink::cli::{Cli, Command};
use dotlink::commands;
use dotlink::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command_name = match &args.command {
        Command::Link(_) => "link",
        Command::Unlink(_) => "unlink",
        Command::Status(_) => "status",
        Command::Completion(_) => "completion",
        Command::Version => "version",
    };
    logging::init_subscriber(command_name, args.verbose);
    let log = Logger::new(command_name);

    match args.command {
        Command::Link(opts) => commands::link::run(&args.global, &opts, &log),
        Command::Unlink(opts) => commands::unlink::run(&args.global, &opts, &log),
        Command::Status(opts) => commands::status::run(&args.global, &opts, &log),
        Command::Completion(opts) => commands::completion::run(&opts),
        Command::Version => {
            let version = option_env!("DOTLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("dotlink {version}");
            Ok(())
        }
    }
}
