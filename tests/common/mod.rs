// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles repository plus a fake home
// directory, so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotlink::config::Config;
use dotlink::logging::Log;

/// An isolated dotfiles repository and home directory backed by a
/// [`tempfile::TempDir`].
#[derive(Debug)]
pub struct TestRepo {
    tmp: tempfile::TempDir,
}

impl TestRepo {
    /// Create an empty repository skeleton: `conf/`, `links/`, and `home/`.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("conf")).expect("create conf dir");
        std::fs::create_dir_all(tmp.path().join("links")).expect("create links dir");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create home dir");
        Self { tmp }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// The fake home directory.
    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    /// Write `conf/links.toml` with the given body.
    pub fn write_links_toml(&self, body: &str) -> &Self {
        std::fs::write(self.root().join("conf/links.toml"), body).expect("write links.toml");
        self
    }

    /// Create a source file under `links/` with the given content.
    pub fn add_source(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join("links").join(rel);
        std::fs::create_dir_all(path.parent().expect("source has a parent"))
            .expect("create source parent");
        std::fs::write(&path, content).expect("write source file");
        path
    }

    /// Create a pre-existing file in the fake home directory.
    pub fn add_home_file(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.home().join(rel);
        std::fs::create_dir_all(path.parent().expect("dest has a parent"))
            .expect("create dest parent");
        std::fs::write(&path, content).expect("write home file");
        path
    }

    /// Load the repository's configuration.
    pub fn config(&self) -> Config {
        Config::load(self.root()).expect("load config")
    }

    /// All backup directories created under the fake home.
    pub fn backup_dirs(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.home())
            .expect("read home dir")
            .map(|e| e.expect("read dir entry").path())
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(".dotlink_backup_"))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// A logger that discards everything.
#[derive(Debug)]
pub struct SilentLog;

impl Log for SilentLog {
    fn stage(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn debug(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn dry_run(&self, _: &str) {}
}
