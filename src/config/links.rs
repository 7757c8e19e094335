//! Link declaration loading and target derivation.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// A declared link: a source path under `links/`, and optionally an explicit
/// target path under `$HOME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Relative path under the repository's `links/` directory.
    pub source: String,
    /// Explicit target path relative to `$HOME`; derived by convention when
    /// absent.
    pub target: Option<String>,
}

impl Link {
    /// Absolute source path under the repository's `links/` directory.
    #[must_use]
    pub fn source_under(&self, links_dir: &Path) -> PathBuf {
        links_dir.join(&self.source)
    }

    /// Absolute destination path under `home`.
    ///
    /// Without an explicit target, the destination is derived by convention:
    /// a leading dot is prepended to the source path, so `bashrc` maps to
    /// `$HOME/.bashrc` and `config/git/config` to `$HOME/.config/git/config`.
    #[must_use]
    pub fn dest_under(&self, home: &Path) -> PathBuf {
        self.target.as_ref().map_or_else(
            || home.join(format!(".{}", self.source)),
            |target| home.join(target),
        )
    }
}

/// A single entry in the links file — either a plain source path or a
/// structured `{ source, target }` pair for an explicit target override.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinkEntry {
    /// Plain string: `"bashrc"` — target is derived by convention.
    Simple(String),
    /// Structured: `{ source = "foo", target = ".bar" }` — explicit target.
    WithTarget {
        source: String,
        target: String,
    },
}

/// Top-level shape of `conf/links.toml`.
#[derive(Debug, Deserialize)]
struct LinksFile {
    links: Vec<LinkEntry>,
}

/// Load link declarations from `path`.
///
/// A missing file yields an empty list; an unparsable file is an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<Link>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let parsed: LinksFile =
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    Ok(parsed
        .links
        .into_iter()
        .map(|entry| match entry {
            LinkEntry::Simple(source) => Link {
                source,
                target: None,
            },
            LinkEntry::WithTarget { source, target } => Link {
                source,
                target: Some(target),
            },
        })
        .collect())
}
