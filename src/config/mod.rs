//! Configuration loading: the `conf/links.toml` declarations that drive a run.
pub mod links;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// All loaded configuration for one run.
#[derive(Debug)]
pub struct Config {
    /// Root directory of the managed dotfiles repository.
    pub root: PathBuf,
    /// Declared links, in file order.
    pub links: Vec<links::Link>,
}

impl Config {
    /// Load configuration from the `conf/` directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `conf/links.toml` exists but cannot be parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let conf = root.join("conf");
        let links = links::load(&conf.join("links.toml")).context("loading links.toml")?;

        Ok(Self {
            root: root.to_path_buf(),
            links,
        })
    }

    /// The directory holding the link sources.
    #[must_use]
    pub fn links_dir(&self) -> PathBuf {
        self.root.join("links")
    }
}
