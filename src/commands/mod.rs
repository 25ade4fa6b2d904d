//! Top-level subcommand orchestration.
pub mod build;
pub mod scheduler;
pub mod version;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::logging::{Log, Logger};
use crate::tasks::{Context, Task};

/// Environment variable naming the project root when `--root` is absent.
pub const ROOT_ENV: &str = "ASSETPIPE_ROOT";

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Configuration loaded from the resolved project root.
    pub config: Arc<Config>,
}

impl CommandSetup {
    /// Resolve the project root and load all configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist or a
    /// configuration file fails to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let root = resolve_root(global)?;

        log.stage("Loading configuration");
        let config = Config::load(&root)?;
        log.info(&format!("project root: {}", root.display()));
        log.debug(&format!("{} vendor entries", config.settings.vendor.len()));
        log.debug(&format!("styles: {}", config.settings.styles.sources));
        log.debug(&format!("scripts: {}", config.settings.scripts.sources));
        if let Some(package) = &config.package {
            log.info(&format!("{} v{}", package.title(), package.version));
        }

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Build the task context for this run.
    #[must_use]
    pub fn context(&self, global: &GlobalOpts, log: &Arc<Logger>) -> Context {
        Context::new(
            Arc::clone(&self.config),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            global.parallel,
        )
    }
}

/// Resolve the project root: `--root`, then `$ASSETPIPE_ROOT`, then the
/// current directory.
///
/// # Errors
///
/// Returns an error if the chosen directory does not exist.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let candidate = match (&global.root, std::env::var_os(ROOT_ENV)) {
        (Some(root), _) => root.clone(),
        (None, Some(env)) if !env.is_empty() => PathBuf::from(env),
        _ => std::env::current_dir().context("reading current directory")?,
    };
    dunce::canonicalize(&candidate)
        .with_context(|| format!("project root not found: {}", candidate.display()))
}

/// Run `tasks` with the scheduler, print the summary, and bail if any task
/// failed.
///
/// # Errors
///
/// Returns an error if the task graph has a cycle or one or more tasks
/// recorded a failure.
pub fn run_tasks_to_completion(
    tasks: &[&dyn Task],
    ctx: &Context,
    log: &Arc<Logger>,
) -> Result<()> {
    scheduler::run_tasks(tasks, ctx, log)?;

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
