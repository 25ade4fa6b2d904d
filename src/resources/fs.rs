//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when the file at `path` holds exactly `expected`.
///
/// Compares lengths from metadata first so large unchanged files are only
/// read when the sizes already agree.
///
/// # Errors
///
/// Returns an error if `path` exists but cannot be read.
pub fn content_matches(path: &Path, expected: &[u8]) -> Result<bool> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.len() != expected.len() as u64 {
        return Ok(false);
    }
    let current = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(current == expected)
}

/// Remove a file or directory tree at `path`.  Does nothing if it is absent.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_path(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path)
            .with_context(|| format!("remove directory: {}", path.display())),
        Ok(_) => {
            std::fs::remove_file(path).with_context(|| format!("remove file: {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("stat {}", path.display())),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("css/nested/site.css");
        ensure_parent_dir(&file).unwrap();
        assert!(dir.path().join("css/nested").is_dir());
    }

    #[test]
    fn content_matches_compares_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.css");
        std::fs::write(&file, b".a{}").unwrap();
        assert!(content_matches(&file, b".a{}").unwrap());
        assert!(!content_matches(&file, b".b{}").unwrap());
        assert!(!content_matches(&file, b".a{ }").unwrap());
    }

    #[test]
    fn remove_path_handles_dirs_files_and_absence() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("vendor/jquery");
        std::fs::create_dir_all(&tree).unwrap();
        std::fs::write(tree.join("jquery.js"), b"x").unwrap();
        remove_path(&dir.path().join("vendor")).unwrap();
        assert!(!dir.path().join("vendor").exists());

        let file = dir.path().join("stray");
        std::fs::write(&file, b"x").unwrap();
        remove_path(&file).unwrap();
        assert!(!file.exists());

        remove_path(&dir.path().join("absent")).unwrap();
    }
}
