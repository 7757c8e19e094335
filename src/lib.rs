//! Idempotent, backup-safe symlink manager for dotfiles.
//!
//! Given a declared set of source → destination pairs, `dotlink` ensures
//! each destination is a symlink to its source.  Anything already in the
//! way is moved — after confirmation — into a single per-run timestamped
//! backup directory, so a run is always safe to repeat and never silently
//! destroys data.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — parse the `conf/links.toml` link declarations
//! - **[`linker`]** — the core: classify, displace-with-backup, link
//! - **[`confirm`]** — the injected yes/no decision seam
//! - **[`commands`]** — top-level subcommand orchestration (`link`,
//!   `unlink`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod linker;
pub mod logging;
