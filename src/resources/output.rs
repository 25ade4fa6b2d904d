//! Generated output file resource.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Resource, ResourceState};

/// A generated file whose bytes are fully determined by the build.
///
/// The file is written only when its current content differs, so an
/// unchanged source leaves the output untouched (mtime included).
#[derive(Debug, Clone)]
pub struct OutputFile {
    /// Destination path.
    pub path: PathBuf,
    /// Desired file content.
    pub contents: Vec<u8>,
}

impl OutputFile {
    /// Describe a file at `path` holding `contents`.
    #[must_use]
    pub fn new(path: PathBuf, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            contents: contents.into(),
        }
    }
}

impl Resource for OutputFile {
    fn target(&self) -> &Path {
        &self.path
    }

    fn state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Blocked {
                reason: "a directory is in the way".to_string(),
            });
        }
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        Ok(if super::fs::content_matches(&self.path, &self.contents)? {
            ResourceState::UpToDate
        } else {
            ResourceState::Stale
        })
    }

    fn apply(&self) -> Result<()> {
        super::fs::ensure_parent_dir(&self.path)?;
        std::fs::write(&self.path, &self.contents)
            .with_context(|| format!("write {}", self.path.display()))
    }
}
