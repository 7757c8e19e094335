//! Filesystem primitives used by the linker: symlink creation and removal,
//! link-target comparison, and the write-permission probe.
use std::io;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    if let Some(rest) = s.strip_prefix(r"\\?\") {
        PathBuf::from(rest)
    } else {
        p.to_path_buf()
    }
}

/// Check whether `path` can plausibly be written (moved, removed, replaced).
///
/// Inspects the readonly bit of the entry's own metadata without following
/// symlinks.  Paths that do not exist are reported writable — the caller's
/// subsequent operation will surface the real error if there is one.
#[must_use]
pub fn is_writable(path: &Path) -> bool {
    std::fs::symlink_metadata(path).map_or(true, |m| !m.permissions().readonly())
}

/// Create a symlink at `dest` pointing to `source` (platform-specific).
///
/// On Windows, if symlink creation fails with "Access is denied" (OS error 5),
/// falls back to junctions for directories and hard links for files.
///
/// # Errors
///
/// Returns the underlying I/O error if the link cannot be created.
pub fn create_symlink(source: &Path, dest: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, dest)?;
    }

    #[cfg(windows)]
    {
        let result = if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, dest)
        } else {
            std::os::windows::fs::symlink_file(source, dest)
        };
        match result {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == Some(5) => {
                create_symlink_fallback(source, dest)?;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

/// Fallback for Windows when symlinks are not permitted.
/// Uses junctions for directories and hard links for files.
#[cfg(windows)]
fn create_symlink_fallback(source: &Path, dest: &Path) -> io::Result<()> {
    if source.is_dir() {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        let output = std::process::Command::new("cmd")
            .arg("/c")
            .arg(format!(
                "mklink /J \"{}\" \"{}\"",
                dest.display(),
                source.display()
            ))
            .creation_flags(CREATE_NO_WINDOW)
            .output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "cannot create symlink or junction for '{}': {}",
                dest.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    } else {
        std::fs::hard_link(source, dest)
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`).  Rust's `symlink_metadata().is_dir()` returns `false` for
/// symlinks, so the raw `FILE_ATTRIBUTE_DIRECTORY` flag is checked instead.
///
/// # Errors
///
/// Returns the underlying I/O error if the entry cannot be removed.
pub fn remove_symlink(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, so the raw `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
#[must_use]
pub fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Recursively copy a directory tree, following symlinks within the source.
///
/// # Errors
///
/// Returns an error if the destination cannot be created, a source entry
/// cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn paths_equal_plain() {
        let a = PathBuf::from("/home/user/dotfiles/links/bashrc");
        let b = PathBuf::from("/home/user/dotfiles/links/bashrc");
        assert!(paths_equal(&a, &b));
    }

    #[test]
    fn paths_equal_with_unc_prefix() {
        let a = PathBuf::from(r"\\?\C:\dotfiles\links\bashrc");
        let b = PathBuf::from(r"C:\dotfiles\links\bashrc");
        assert!(paths_equal(&a, &b));
    }

    #[test]
    fn paths_not_equal_different() {
        let a = PathBuf::from("/home/user/dotfiles/links/bashrc");
        let b = PathBuf::from("/home/user/dotfiles/links/zshrc");
        assert!(!paths_equal(&a, &b));
    }

    #[test]
    fn ensure_parent_dir_creates_ancestors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a/b/c/file");
        ensure_parent_dir(&path).unwrap();
        assert!(tmp.path().join("a/b/c").is_dir());
    }

    #[test]
    fn ensure_parent_dir_noop_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("file");
        ensure_parent_dir(&path).unwrap();
        assert!(tmp.path().is_dir());
    }

    #[test]
    fn missing_path_is_reported_writable() {
        assert!(is_writable(Path::new("/definitely/not/a/real/path")));
    }

    #[cfg(unix)]
    #[test]
    fn readonly_dir_is_not_writable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("ro");
        std::fs::create_dir(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555)).unwrap();
        assert!(!is_writable(&dir));
        // restore so the tempdir can be cleaned up
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn create_and_remove_symlink_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("source");
        let dest = tmp.path().join("dest");
        std::fs::write(&source, "x").unwrap();

        create_symlink(&source, &dest).unwrap();
        assert_eq!(std::fs::read_link(&dest).unwrap(), source);

        remove_symlink(&dest).unwrap();
        assert!(std::fs::symlink_metadata(&dest).is_err());
    }

    #[test]
    fn copy_dir_recursive_copies_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir_all(src.join("sub")).unwrap();
        std::fs::write(src.join("a.txt"), b"aaa").unwrap();
        std::fs::write(src.join("sub/b.txt"), b"bbb").unwrap();

        copy_dir_recursive(&src, &dst).unwrap();

        assert_eq!(std::fs::read(dst.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(std::fs::read(dst.join("sub/b.txt")).unwrap(), b"bbb");
    }
}
