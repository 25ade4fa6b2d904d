//! Vendor output directory resource.
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Resource, ResourceState};

/// A directory the build owns outright and recreates from scratch.
///
/// Anything present at the path counts as [`UpToDate`](ResourceState::UpToDate),
/// which is what the removal pass looks for.
#[derive(Debug, Clone)]
pub struct OwnedDirectory {
    /// Directory path.
    pub path: PathBuf,
}

impl OwnedDirectory {
    /// Describe the directory at `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Resource for OwnedDirectory {
    fn target(&self) -> &Path {
        &self.path
    }

    fn state(&self) -> Result<ResourceState> {
        Ok(if self.path.symlink_metadata().is_ok() {
            ResourceState::UpToDate
        } else {
            ResourceState::Missing
        })
    }

    fn remove(&self) -> Result<()> {
        super::fs::remove_path(&self.path)
    }
}
