//! Execution context handed to every task.
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::logging::Log;

/// Shared context for task execution.
///
/// Cheap to clone: the configuration and logger are shared through `Arc`,
/// which lets watch mode move a context into a blocking worker.
#[derive(Clone)]
pub struct Context {
    /// Configuration loaded once at startup.
    pub config: Arc<Config>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (report changes without writing).
    pub dry_run: bool,
    /// Whether to process items in parallel using Rayon.
    pub parallel: bool,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(config: Arc<Config>, log: Arc<dyn Log>, dry_run: bool, parallel: bool) -> Self {
        Self {
            config,
            log,
            dry_run,
            parallel,
        }
    }

    /// Project root directory.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.config.root
    }

    /// Vendor output directory.
    #[must_use]
    pub fn vendor_dir(&self) -> PathBuf {
        self.config.vendor_dir()
    }

    /// Create a copy of this context with a different logger.
    ///
    /// Used by the parallel scheduler to give each task its own buffered
    /// logger while sharing the rest of the context.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            log,
            dry_run: self.dry_run,
            parallel: self.parallel,
        }
    }
}
