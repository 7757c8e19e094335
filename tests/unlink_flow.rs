#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the unlink flow: only symlinks pointing at our
//! sources are removed; everything else is left alone.

mod common;

use common::{SilentLog, TestRepo};
use dotlink::confirm::Preset;
use dotlink::linker::{LinkRequest, Linker, UnlinkOutcome};

fn requests_for(repo: &TestRepo) -> Vec<LinkRequest> {
    let config = repo.config();
    let links_dir = config.links_dir();
    config
        .links
        .iter()
        .map(|link| LinkRequest::new(link.source_under(&links_dir), link.dest_under(&repo.home())))
        .collect()
}

#[cfg(unix)]
#[test]
fn unlink_removes_installed_links() {
    let repo = TestRepo::new();
    repo.write_links_toml(r#"links = ["bashrc", "zshrc"]"#);
    repo.add_source("bashrc", b"b");
    repo.add_source("zshrc", b"z");

    let log = SilentLog;
    let linker = Linker::new(repo.home(), &log);
    let requests = requests_for(&repo);
    let report = linker.apply(&requests, &Preset::yes());
    assert_eq!(report.stats().linked, 2);

    let outcomes = linker.unapply(&requests);
    assert!(matches!(outcomes[0], UnlinkOutcome::Removed));
    assert!(matches!(outcomes[1], UnlinkOutcome::Removed));
    assert!(std::fs::symlink_metadata(repo.home().join(".bashrc")).is_err());
    assert!(std::fs::symlink_metadata(repo.home().join(".zshrc")).is_err());
}

#[cfg(unix)]
#[test]
fn unlink_leaves_foreign_files_alone() {
    let repo = TestRepo::new();
    repo.write_links_toml(r#"links = ["bashrc"]"#);
    repo.add_source("bashrc", b"b");
    let dest = repo.add_home_file(".bashrc", b"not a symlink");

    let log = SilentLog;
    let linker = Linker::new(repo.home(), &log);
    let outcomes = linker.unapply(&requests_for(&repo));

    assert!(matches!(outcomes[0], UnlinkOutcome::Foreign));
    assert_eq!(std::fs::read(&dest).unwrap(), b"not a symlink");
}

#[cfg(unix)]
#[test]
fn unlink_ignores_missing_destinations() {
    let repo = TestRepo::new();
    repo.write_links_toml(r#"links = ["bashrc"]"#);
    repo.add_source("bashrc", b"b");

    let log = SilentLog;
    let linker = Linker::new(repo.home(), &log);
    let outcomes = linker.unapply(&requests_for(&repo));

    assert!(matches!(outcomes[0], UnlinkOutcome::Missing));
}

#[cfg(unix)]
#[test]
fn link_then_unlink_roundtrip_restores_nothing_unexpected() {
    let repo = TestRepo::new();
    repo.write_links_toml(r#"links = ["gitconfig"]"#);
    repo.add_source("gitconfig", b"new");
    repo.add_home_file(".gitconfig", b"old");

    let log = SilentLog;
    let linker = Linker::new(repo.home(), &log);
    let requests = requests_for(&repo);

    let report = linker.apply(&requests, &Preset::yes());
    let backup_dir = report.backup_dir.expect("backup dir");

    let outcomes = linker.unapply(&requests);
    assert!(matches!(outcomes[0], UnlinkOutcome::Removed));

    // The displaced original stays in the backup directory; unlink does not
    // restore it automatically.
    assert!(std::fs::symlink_metadata(repo.home().join(".gitconfig")).is_err());
    assert_eq!(std::fs::read(backup_dir.join(".gitconfig")).unwrap(), b"old");
}
