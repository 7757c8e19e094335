//! Logger that routes messages through `tracing` with dotlink targets.
use std::path::{Path, PathBuf};

use super::types::Log;
use super::utils::log_file_path;

/// The standard logger.
///
/// All messages flow through `tracing`; the console layer and the persistent
/// file layer installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) decide what is
/// shown where.  Stage headers and dry-run lines use dedicated targets so
/// the formatters can style them.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for the given command name.
    ///
    /// Stores the log file path for display in error summaries.  The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// The persistent log file path, if the cache directory is available.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: "dotlink::stage", "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dotlink::dry_run", "{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_methods_do_not_panic_without_subscriber() {
        let log = Logger::new("test");
        log.stage("stage");
        log.info("info");
        log.debug("debug");
        log.warn("warn");
        log.error("error");
        log.dry_run("dry run");
    }

    #[test]
    fn log_path_ends_with_command_name() {
        let log = Logger::new("link");
        if let Some(path) = log.log_path() {
            assert!(path.to_string_lossy().ends_with("link.log"));
        }
    }
}
