//! The symlink manager: classify each destination, displace non-matching
//! content into a single per-run backup directory, and link.
//!
//! Requests are processed strictly in input order on one thread.  Every
//! request ends in exactly one [`LinkOutcome`]; no failure aborts the batch.
//! The backup directory is created at most once per run, lazily, the first
//! time a destination has to be displaced (see [`BackupSession`]).

pub mod backup;
pub mod fs;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::confirm::Confirm;
use crate::logging::Log;

pub use backup::BackupSession;

/// One declared link: `dest` should become a symlink pointing to `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    /// The canonical file inside the managed dotfiles tree.
    pub source: PathBuf,
    /// The well-known path where a tool expects its configuration file.
    pub dest: PathBuf,
}

impl LinkRequest {
    /// Create a new link request.
    #[must_use]
    pub const fn new(source: PathBuf, dest: PathBuf) -> Self {
        Self { source, dest }
    }

    /// Human-readable description, `dest -> source`.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.dest.display(), self.source.display())
    }
}

/// Current state of a destination relative to its request.
///
/// Symlinks are judged by comparing the existing link target against the
/// intended source path, never by content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Destination does not exist.
    Missing,
    /// Destination is a symlink pointing at the intended source.
    Correct,
    /// Destination exists but is not the intended symlink.
    Occupied(Occupant),
}

/// What is currently sitting at an occupied destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    /// A regular file.
    File,
    /// A real directory (not a directory symlink).
    Directory,
    /// A symlink pointing somewhere other than the intended source.
    WrongSymlink(PathBuf),
}

impl std::fmt::Display for Occupant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "a regular file"),
            Self::Directory => write!(f, "a directory"),
            Self::WrongSymlink(target) => {
                write!(f, "a symlink to {}", target.display())
            }
        }
    }
}

/// Why a single request failed.
///
/// All failures are local to one request; processing always continues with
/// the next request.  [`LinkFailure::LinkAfterBackup`] is the most severe
/// kind: the original content has been moved into the backup directory but
/// the symlink does not exist, so the destination is empty until the user
/// intervenes.
#[derive(Debug, Error)]
pub enum LinkFailure {
    /// The destination's parent directory could not be created.
    #[error("create parent directory for {}: {source}", .dest.display())]
    DirectoryCreation {
        /// Destination whose parent could not be created.
        dest: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The symlink could not be created (no backup was involved).
    #[error("create symlink {}: {source}", .dest.display())]
    Link {
        /// Destination that could not be linked.
        dest: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination or its parent directory is not writable; the
    /// confirmation callback was never invoked.
    #[error("permission denied: {}", .path.display())]
    PermissionDenied {
        /// The non-writable path (destination or its parent).
        path: PathBuf,
    },

    /// The per-run backup directory could not be created.  The session is
    /// left unset so a later request may retry.
    #[error("create backup directory under {}: {source}", .root.display())]
    BackupDirCreation {
        /// Directory the backup directory was to be created under.
        root: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination could not be moved into the backup directory; it is
    /// still where it was.
    #[error("move {} into backup {}: {source}", .dest.display(), .backup.display())]
    BackupMove {
        /// Destination that could not be displaced.
        dest: PathBuf,
        /// Backup directory it was to be moved into.
        backup: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The symlink could not be created *after* the original content was
    /// moved into the backup directory.  The displaced original is at
    /// `backup`; recovery is manual.
    #[error(
        "create symlink {} after backing up original to {}: {source}",
        .dest.display(),
        .backup.display()
    )]
    LinkAfterBackup {
        /// Destination that is now empty.
        dest: PathBuf,
        /// Where the displaced original was stored.
        backup: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Final outcome of one request.
#[derive(Debug)]
pub enum LinkOutcome {
    /// The destination did not exist and is now a symlink to the source.
    Linked,
    /// The destination was already a symlink to the source; nothing changed.
    AlreadyLinked,
    /// Pre-existing content was moved into the backup directory and the
    /// destination is now a symlink to the source.
    BackedUpAndLinked,
    /// The confirmation callback declined; the destination is untouched.
    SkippedByUser,
    /// The request failed; the destination is in whatever state the failure
    /// kind describes.
    Failed(LinkFailure),
}

/// Outcome counters for one run, used for the closing summary line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Destinations newly linked.
    pub linked: u32,
    /// Destinations that were already correct.
    pub already_linked: u32,
    /// Destinations backed up and then linked.
    pub backed_up: u32,
    /// Destinations skipped at the user's request.
    pub skipped: u32,
    /// Requests that failed.
    pub failed: u32,
}

impl LinkStats {
    /// Format the summary string, e.g. `2 linked, 3 already linked, 1 backed up`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} linked", self.linked),
            format!("{} already linked", self.already_linked),
        ];
        if self.backed_up > 0 {
            parts.push(format!("{} backed up", self.backed_up));
        }
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }
}

/// Everything `apply` produced: one outcome per request, in request order,
/// plus the backup directory path when one was created.
#[derive(Debug)]
pub struct LinkReport {
    /// Per-request outcomes, aligned with the input order.
    pub outcomes: Vec<LinkOutcome>,
    /// The run's backup directory, if any displacement created one.
    pub backup_dir: Option<PathBuf>,
}

impl LinkReport {
    /// Tally outcomes into summary counters.
    #[must_use]
    pub fn stats(&self) -> LinkStats {
        let mut stats = LinkStats::default();
        for outcome in &self.outcomes {
            match outcome {
                LinkOutcome::Linked => stats.linked += 1,
                LinkOutcome::AlreadyLinked => stats.already_linked += 1,
                LinkOutcome::BackedUpAndLinked => stats.backed_up += 1,
                LinkOutcome::SkippedByUser => stats.skipped += 1,
                LinkOutcome::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }

    /// Whether any request failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, LinkOutcome::Failed(_)))
    }
}

/// Classify a destination without mutating the filesystem.
#[must_use]
pub fn classify(request: &LinkRequest) -> LinkState {
    match std::fs::read_link(&request.dest) {
        Ok(existing) => {
            if fs::paths_equal(&existing, &request.source) {
                LinkState::Correct
            } else {
                LinkState::Occupied(Occupant::WrongSymlink(existing))
            }
        }
        Err(_) => match std::fs::symlink_metadata(&request.dest) {
            Ok(meta) if fs::is_dir_like(&meta) => LinkState::Occupied(Occupant::Directory),
            Ok(_) => LinkState::Occupied(Occupant::File),
            Err(_) => LinkState::Missing,
        },
    }
}

/// Outcome of removing one previously installed link.
#[derive(Debug)]
pub enum UnlinkOutcome {
    /// The destination was our symlink and has been removed.
    Removed,
    /// The destination does not exist; nothing to do.
    Missing,
    /// The destination exists but is not our symlink; left untouched.
    Foreign,
    /// Removal failed.
    Failed(io::Error),
}

/// The symlink manager for one run.
///
/// Owns the run's (lazily created) [`BackupSession`] and the logger; the
/// confirmation callback is injected per [`apply`](Self::apply) call so
/// interactive, scripted, and test callers can substitute their own.
pub struct Linker<'a> {
    backup_root: PathBuf,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Linker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linker")
            .field("backup_root", &self.backup_root)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl<'a> Linker<'a> {
    /// Create a linker whose backup directory (if needed) is created under
    /// `backup_root` (normally `$HOME`).
    #[must_use]
    pub fn new(backup_root: PathBuf, log: &'a dyn Log) -> Self {
        Self { backup_root, log }
    }

    /// Process every request in order, returning one outcome per request.
    ///
    /// Later requests see the backup directory created by earlier ones;
    /// at most one backup directory exists per call.
    #[must_use]
    pub fn apply(&self, requests: &[LinkRequest], confirm: &dyn Confirm) -> LinkReport {
        let mut session: Option<BackupSession> = None;
        let outcomes = requests
            .iter()
            .map(|request| self.apply_one(request, confirm, &mut session))
            .collect();
        LinkReport {
            outcomes,
            backup_dir: session.map(|s| s.dir().to_path_buf()),
        }
    }

    /// Preview what [`apply`](Self::apply) would do, without mutating the
    /// filesystem or prompting, and report the pending changes through the
    /// logger's dry-run channel.
    #[must_use]
    pub fn plan(&self, requests: &[LinkRequest]) -> LinkStats {
        let mut stats = LinkStats::default();
        for request in requests {
            let desc = request.description();
            match classify(request) {
                LinkState::Correct => {
                    self.log.debug(&format!("ok: {desc}"));
                    stats.already_linked += 1;
                }
                LinkState::Missing => {
                    self.log.dry_run(&format!("would link {desc}"));
                    stats.linked += 1;
                }
                LinkState::Occupied(occupant) => {
                    if let Some(path) = displacement_permission_gap(request) {
                        self.log.warn(&format!(
                            "would fail {desc}: permission denied: {}",
                            path.display()
                        ));
                        stats.failed += 1;
                    } else {
                        self.log.dry_run(&format!(
                            "would back up {} (currently {occupant}) and link {desc}",
                            request.dest.display()
                        ));
                        stats.backed_up += 1;
                    }
                }
            }
        }
        stats
    }

    /// Remove every destination that is currently our symlink, leaving
    /// foreign content untouched.
    #[must_use]
    pub fn unapply(&self, requests: &[LinkRequest]) -> Vec<UnlinkOutcome> {
        requests
            .iter()
            .map(|request| match classify(request) {
                LinkState::Correct => match fs::remove_symlink(&request.dest) {
                    Ok(()) => {
                        self.log
                            .debug(&format!("removed: {}", request.dest.display()));
                        UnlinkOutcome::Removed
                    }
                    Err(e) => {
                        self.log.warn(&format!(
                            "failed to remove {}: {e}",
                            request.dest.display()
                        ));
                        UnlinkOutcome::Failed(e)
                    }
                },
                LinkState::Missing => UnlinkOutcome::Missing,
                LinkState::Occupied(_) => {
                    self.log.debug(&format!(
                        "not ours, leaving in place: {}",
                        request.dest.display()
                    ));
                    UnlinkOutcome::Foreign
                }
            })
            .collect()
    }

    fn apply_one(
        &self,
        request: &LinkRequest,
        confirm: &dyn Confirm,
        session: &mut Option<BackupSession>,
    ) -> LinkOutcome {
        let desc = request.description();

        if let Err(e) = fs::ensure_parent_dir(&request.dest) {
            self.log.warn(&format!("failed to link {desc}: {e}"));
            return LinkOutcome::Failed(LinkFailure::DirectoryCreation {
                dest: request.dest.clone(),
                source: e,
            });
        }

        match classify(request) {
            LinkState::Correct => {
                self.log.debug(&format!("ok: {desc}"));
                LinkOutcome::AlreadyLinked
            }
            LinkState::Missing => match fs::create_symlink(&request.source, &request.dest) {
                Ok(()) => {
                    self.log.debug(&format!("linked {desc}"));
                    LinkOutcome::Linked
                }
                Err(e) => {
                    self.log.warn(&format!("failed to link {desc}: {e}"));
                    LinkOutcome::Failed(LinkFailure::Link {
                        dest: request.dest.clone(),
                        source: e,
                    })
                }
            },
            LinkState::Occupied(occupant) => {
                self.displace_and_link(request, &occupant, confirm, session)
            }
        }
    }

    /// The displacement path: permission gate, confirmation, lazy backup
    /// session, move, link.
    fn displace_and_link(
        &self,
        request: &LinkRequest,
        occupant: &Occupant,
        confirm: &dyn Confirm,
        session: &mut Option<BackupSession>,
    ) -> LinkOutcome {
        let desc = request.description();

        if let Some(path) = displacement_permission_gap(request) {
            self.log
                .warn(&format!("permission denied: {}", path.display()));
            return LinkOutcome::Failed(LinkFailure::PermissionDenied { path });
        }

        if !confirm.confirm(&request.dest) {
            self.log.info(&format!(
                "skipped {} (currently {occupant})",
                request.dest.display()
            ));
            return LinkOutcome::SkippedByUser;
        }

        let backup = match ensure_session(&self.backup_root, session) {
            Ok(backup) => backup,
            Err(e) => {
                self.log
                    .warn(&format!("failed to create backup directory: {e}"));
                return LinkOutcome::Failed(LinkFailure::BackupDirCreation {
                    root: self.backup_root.clone(),
                    source: e,
                });
            }
        };

        let stored = match backup.displace(&request.dest) {
            Ok(stored) => stored,
            Err(e) => {
                self.log.warn(&format!(
                    "failed to back up {}: {e}",
                    request.dest.display()
                ));
                return LinkOutcome::Failed(LinkFailure::BackupMove {
                    dest: request.dest.clone(),
                    backup: backup.dir().to_path_buf(),
                    source: e,
                });
            }
        };

        match fs::create_symlink(&request.source, &request.dest) {
            Ok(()) => {
                self.log.debug(&format!(
                    "backed up {} and linked {desc}",
                    stored.display()
                ));
                LinkOutcome::BackedUpAndLinked
            }
            Err(e) => {
                // The original has been moved but the link does not exist:
                // the one state that demands the user's attention.
                self.log.error(&format!(
                    "failed to link {desc} after backup; original preserved at {}",
                    stored.display()
                ));
                LinkOutcome::Failed(LinkFailure::LinkAfterBackup {
                    dest: request.dest.clone(),
                    backup: stored,
                    source: e,
                })
            }
        }
    }
}

/// Return the first non-writable path among the destination and its parent,
/// or `None` when displacement may proceed.
fn displacement_permission_gap(request: &LinkRequest) -> Option<PathBuf> {
    if !fs::is_writable(&request.dest) {
        return Some(request.dest.clone());
    }
    if let Some(parent) = request.dest.parent()
        && !fs::is_writable(parent)
    {
        return Some(parent.to_path_buf());
    }
    None
}

/// Create the run's backup session if it does not exist yet, and return a
/// reference to it.  On creation failure the session stays unset so a later
/// request can retry.
fn ensure_session<'s>(
    root: &Path,
    session: &'s mut Option<BackupSession>,
) -> io::Result<&'s BackupSession> {
    match session {
        Some(existing) => Ok(existing),
        None => {
            let created = BackupSession::create(root)?;
            Ok(session.insert(created))
        }
    }
}
