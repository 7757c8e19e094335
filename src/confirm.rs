//! Injected confirmation seam for destructive decisions.
//!
//! The linker never reads stdin itself: whether a pre-existing destination
//! may be displaced is answered by a [`Confirm`] implementation supplied by
//! the caller, so batch runs (`--yes`), non-interactive callers, and tests
//! can substitute deterministic answers.
use std::io::{BufRead as _, Write as _};
use std::path::Path;

/// A blocking yes/no decision for one destination.
pub trait Confirm {
    /// May the existing content at `dest` be displaced into the backup
    /// directory?  Returning `false` leaves the destination untouched.
    fn confirm(&self, dest: &Path) -> bool;
}

/// Interactive confirmation on the controlling terminal.
///
/// Prompts on stderr (so piped stdout stays clean) and reads one line from
/// stdin.  Anything other than `y`/`yes` declines, so pressing enter is the
/// safe default.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, dest: &Path) -> bool {
        let mut err = std::io::stderr();
        let _ = write!(
            err,
            "replace existing {} (a backup will be kept)? [y/N] ",
            dest.display()
        );
        let _ = err.flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// A fixed answer for every destination.
///
/// Used by `--yes` runs and by tests that need deterministic behaviour.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    answer: bool,
}

impl Preset {
    /// Approve every displacement.
    #[must_use]
    pub const fn yes() -> Self {
        Self { answer: true }
    }

    /// Decline every displacement.
    #[must_use]
    pub const fn no() -> Self {
        Self { answer: false }
    }
}

impl Confirm for Preset {
    fn confirm(&self, _dest: &Path) -> bool {
        self.answer
    }
}
