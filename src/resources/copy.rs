//! Verbatim file copy resource.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Resource, ResourceState};

/// A file copied byte-for-byte from `source` to `dest`.
#[derive(Debug, Clone)]
pub struct CopiedFile {
    /// File to copy.
    pub source: PathBuf,
    /// Destination path.
    pub dest: PathBuf,
}

impl CopiedFile {
    /// Describe a copy of `source` at `dest`.
    #[must_use]
    pub const fn new(source: PathBuf, dest: PathBuf) -> Self {
        Self { source, dest }
    }
}

impl Resource for CopiedFile {
    fn target(&self) -> &Path {
        &self.dest
    }

    fn label(&self) -> String {
        format!("{} -> {}", self.source.display(), self.dest.display())
    }

    fn state(&self) -> Result<ResourceState> {
        if !self.source.is_file() {
            return Ok(ResourceState::Blocked {
                reason: format!("source is not a file: {}", self.source.display()),
            });
        }
        if self.dest.is_dir() {
            return Ok(ResourceState::Blocked {
                reason: "a directory is in the way".to_string(),
            });
        }
        if !self.dest.exists() {
            return Ok(ResourceState::Missing);
        }
        let wanted = std::fs::read(&self.source)
            .with_context(|| format!("read {}", self.source.display()))?;
        Ok(if super::fs::content_matches(&self.dest, &wanted)? {
            ResourceState::UpToDate
        } else {
            ResourceState::Stale
        })
    }

    fn apply(&self) -> Result<()> {
        super::fs::ensure_parent_dir(&self.dest)?;
        std::fs::copy(&self.source, &self.dest)
            .map(|_bytes| ())
            .with_context(|| format!("copy {}", self.label()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn copies_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("node_modules/jquery/dist/jquery.js");
        std::fs::create_dir_all(src.parent().unwrap()).unwrap();
        std::fs::write(&src, b"/* jquery */").unwrap();
        let dest = dir.path().join("vendor/jquery/jquery.js");

        let copy = CopiedFile::new(src, dest.clone());
        assert_eq!(copy.state().unwrap(), ResourceState::Missing);
        copy.apply().unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"/* jquery */");
        assert_eq!(copy.state().unwrap(), ResourceState::UpToDate);
    }

    #[test]
    fn differing_destination_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.js");
        let dest = dir.path().join("b.js");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dest, b"old").unwrap();
        assert_eq!(
            CopiedFile::new(src, dest).state().unwrap(),
            ResourceState::Stale
        );
    }

    #[test]
    fn missing_source_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let copy = CopiedFile::new(dir.path().join("absent.js"), dir.path().join("out.js"));
        assert!(matches!(copy.state().unwrap(), ResourceState::Blocked { .. }));
    }

    #[test]
    fn label_names_both_paths() {
        let copy = CopiedFile::new(PathBuf::from("a/x.css"), PathBuf::from("b/x.css"));
        assert_eq!(copy.label(), "a/x.css -> b/x.css");
        assert_eq!(copy.target(), Path::new("b/x.css"));
    }
}
