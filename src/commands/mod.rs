//! Top-level subcommand orchestration.
pub mod completion;
pub mod link;
pub mod status;
pub mod unlink;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::linker::LinkRequest;
use crate::logging::Log;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates root resolution, home resolution, and configuration loading
/// so that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
    /// The user's home directory.
    pub home: PathBuf,
}

impl CommandSetup {
    /// Resolve the root and home directories and load all configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be determined, the home
    /// directory is unset, or a configuration file fails to parse.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let root = resolve_root(global)?;
        let home = resolve_home()?;

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.info(&format!(
            "loaded {} links from {}",
            config.links.len(),
            root.display()
        ));

        Ok(Self { config, home })
    }

    /// Turn the declared links into absolute link requests, in file order.
    ///
    /// Links whose source file does not exist are skipped with a warning —
    /// they cannot be requested of the linker, whose sources must exist.
    #[must_use]
    pub fn requests(&self, log: &dyn Log) -> Vec<LinkRequest> {
        let links_dir = self.config.links_dir();
        self.config
            .links
            .iter()
            .filter_map(|link| {
                let source = link.source_under(&links_dir);
                if source.exists() {
                    Some(LinkRequest::new(source, link.dest_under(&self.home)))
                } else {
                    log.warn(&format!("source missing, skipping: {}", link.source));
                    None
                }
            })
            .collect()
    }
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Tries, in order: the `--root` flag, the `DOTLINK_ROOT` environment
/// variable, and the current directory (when it contains a `conf/` entry).
///
/// # Errors
///
/// Returns an error if none of the candidates works out.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var("DOTLINK_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir()?;
    if cwd.join("conf").exists() {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine dotfiles root. Use --root or set DOTLINK_ROOT env var")
}

/// Resolve the user's home directory, the destination namespace and the
/// parent of the run's backup directory.
///
/// # Errors
///
/// Returns an error if the HOME (or USERPROFILE on Windows) environment
/// variable is not set.
pub fn resolve_home() -> Result<PathBuf> {
    let home = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE")
            .or_else(|_| std::env::var("HOME"))
            .map_err(|_| {
                anyhow::anyhow!("neither USERPROFILE nor HOME environment variable is set")
            })?
    } else {
        std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?
    };
    Ok(PathBuf::from(home))
}
