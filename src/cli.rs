//! Command-line interface definitions.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the symlink manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Idempotent, backup-safe symlink manager for dotfiles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Assume "yes" for every displacement prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create symlinks, backing up anything in the way
    Link(LinkOpts),
    /// Remove symlinks previously created by link
    Unlink(UnlinkOpts),
    /// Show the state of every declared link
    Status(StatusOpts),
    /// Generate shell completion scripts
    Completion(CompletionOpts),
    /// Print version information
    Version,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct LinkOpts {
    /// Process only links whose source path contains one of these strings
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip links whose source path contains one of these strings
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,
}

/// Options for the `unlink` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UnlinkOpts {}

/// Options for the `status` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct StatusOpts {}

/// Options for the `completion` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
