//! Per-run backup session: a single timestamped directory collecting every
//! destination displaced during one invocation.
use std::io;
use std::path::{Path, PathBuf};

use super::fs as fsutil;

/// The single backup directory for one run.
///
/// Created lazily by the linker the first time a destination has to be
/// displaced, and reused for every later displacement in the same run.
/// Displaced entries are stored flat, under their original basename; a
/// basename collision is resolved with a numeric suffix rather than
/// overwriting an earlier backup.
#[derive(Debug)]
pub struct BackupSession {
    dir: PathBuf,
}

impl BackupSession {
    /// Create a fresh backup directory under `root` (normally `$HOME`).
    ///
    /// The directory is named from the current local time at second
    /// precision.  If a directory with that name already exists (two runs
    /// within the same second), a `_1`, `_2`, … suffix is probed until
    /// creation succeeds.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if no directory can be created,
    /// e.g. when `root` itself is missing or not writable.
    pub fn create(root: &Path) -> io::Result<Self> {
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S").to_string();
        let mut candidate = root.join(format!(".dotlink_backup_{stamp}"));
        let mut n = 0u32;
        loop {
            match std::fs::create_dir(&candidate) {
                Ok(()) => return Ok(Self { dir: candidate }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    n += 1;
                    candidate = root.join(format!(".dotlink_backup_{stamp}_{n}"));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Absolute path of the backup directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Move `dest` into the backup directory, preserving its basename.
    ///
    /// Returns the path the entry was stored at.  When an earlier
    /// displacement already used the same basename the new entry is stored
    /// as `name.1`, `name.2`, … so that no backup is silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if `dest` has no final path component or the move
    /// (rename, or copy-and-delete across filesystems) fails.
    pub fn displace(&self, dest: &Path) -> io::Result<PathBuf> {
        let name = dest.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("destination has no file name: {}", dest.display()),
            )
        })?;

        let mut stored = self.dir.join(name);
        let mut n = 0u32;
        while std::fs::symlink_metadata(&stored).is_ok() {
            n += 1;
            let mut suffixed = name.to_os_string();
            suffixed.push(format!(".{n}"));
            stored = self.dir.join(suffixed);
        }

        move_entry(dest, &stored)?;
        Ok(stored)
    }
}

/// Move `from` to `to`, preferring an atomic rename and falling back to
/// copy-and-delete when the rename crosses a filesystem boundary (EXDEV).
fn move_entry(from: &Path, to: &Path) -> io::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    let meta = std::fs::symlink_metadata(from)?;
    if meta.is_symlink() {
        let target = std::fs::read_link(from)?;
        fsutil::create_symlink(&target, to)?;
        std::fs::remove_file(from)
    } else if fsutil::is_dir_like(&meta) {
        fsutil::copy_dir_recursive(from, to)?;
        std::fs::remove_dir_all(from)
    } else {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)
    }
}
