//! Build artifacts as idempotent resources: inspect the target, then write or
//! delete it only when it differs from what the build wants.
pub mod copy;
pub mod directory;
pub mod fs;
pub mod output;

use std::path::Path;

use anyhow::Result;

/// How a target on disk compares to the desired artifact.
///
/// ```
/// use assetpipe_cli::resources::ResourceState;
///
/// assert!(ResourceState::Missing.needs_write());
/// assert!(ResourceState::Stale.needs_write());
/// assert!(!ResourceState::UpToDate.needs_write());
/// assert!(!ResourceState::Blocked { reason: "is a directory".into() }.needs_write());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the target path.
    Missing,
    /// The target already holds the desired bytes.
    UpToDate,
    /// The target exists with different content.
    Stale,
    /// The target cannot be produced, e.g. a directory sits where a file
    /// belongs or the copy source vanished.
    Blocked {
        /// Why the target cannot be produced.
        reason: String,
    },
}

impl ResourceState {
    /// `true` when applying the resource would change the disk.
    #[must_use]
    pub const fn needs_write(&self) -> bool {
        matches!(self, Self::Missing | Self::Stale)
    }
}

/// A file or directory the build owns.
pub trait Resource {
    /// Path this resource produces.
    fn target(&self) -> &Path;

    /// Text naming the resource in log output.
    fn label(&self) -> String {
        self.target().display().to_string()
    }

    /// Compare the target with the desired artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the target exists but cannot be read.
    fn state(&self) -> Result<ResourceState>;

    /// Bring the target to the desired state, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be written or this resource is
    /// only ever removed.
    fn apply(&self) -> Result<()> {
        anyhow::bail!("{} cannot be written", self.label())
    }

    /// Delete the target.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails or this resource cannot be deleted.
    fn remove(&self) -> Result<()> {
        anyhow::bail!("{} cannot be removed", self.label())
    }
}
