//! Filesystem watching for `watch` mode.
//!
//! [`spawn`] forwards raw changed paths over a channel; [`Classifier`] turns
//! them into the set of [`Trigger`]s a batch of changes calls for.
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::mpsc;

use crate::assets::{scripts, sources};
use crate::config::Config;
use crate::error::ConfigError;
use crate::server::livereload::ReloadEvent;
use crate::tasks::{Task, scripts::BuildScripts, styles::BuildStyles};

/// What a changed file asks for.  Ordered the way a batch is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Trigger {
    /// A stylesheet source changed.
    Styles,
    /// A script source changed.
    Scripts,
    /// A page changed.
    Html,
}

impl Trigger {
    /// The event sent to browsers once this trigger has been handled.
    #[must_use]
    pub const fn event(self) -> ReloadEvent {
        match self {
            Self::Styles => ReloadEvent::InjectCss,
            Self::Scripts | Self::Html => ReloadEvent::FullReload,
        }
    }

    /// The build task to run first, if any.
    #[must_use]
    pub fn task(self) -> Option<Box<dyn Task>> {
        match self {
            Self::Styles => Some(Box::new(BuildStyles)),
            Self::Scripts => Some(Box::new(BuildScripts)),
            Self::Html => None,
        }
    }
}

/// Maps changed paths to triggers using the project configuration.
#[derive(Debug)]
pub struct Classifier {
    root: PathBuf,
    ignored: Vec<PathBuf>,
    styles_base: PathBuf,
    scripts_base: PathBuf,
    script_excludes: Vec<Pattern>,
}

impl Classifier {
    /// Build a classifier for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a script exclusion pattern does not parse.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let settings = &config.settings;
        Ok(Self {
            root: config.root.clone(),
            ignored: vec![config.vendor_dir(), config.packages_dir()],
            styles_base: config.resolve(sources::glob_base(&settings.styles.sources)),
            scripts_base: config.resolve(sources::glob_base(&settings.scripts.sources)),
            script_excludes: sources::compile_patterns(&settings.scripts.exclude)?,
        })
    }

    /// Classify one changed path.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Option<Trigger> {
        let relative = path.strip_prefix(&self.root).ok()?;
        if relative.components().any(is_hidden) {
            return None;
        }
        if self.ignored.iter().any(|dir| path.starts_with(dir)) {
            return None;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)?;
        match ext.as_str() {
            "scss" | "sass" if path.starts_with(&self.styles_base) => Some(Trigger::Styles),
            "js" if path.starts_with(&self.scripts_base)
                && !scripts::is_generated(path)
                && !sources::matches_any(&self.script_excludes, relative) =>
            {
                Some(Trigger::Scripts)
            }
            "html" | "htm" => Some(Trigger::Html),
            _ => None,
        }
    }

    /// Classify a batch, deduplicating triggers.
    pub fn triggers<I>(&self, paths: I) -> BTreeSet<Trigger>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        paths
            .into_iter()
            .filter_map(|p| self.classify(p.as_ref()))
            .collect()
    }
}

fn is_hidden(component: Component<'_>) -> bool {
    matches!(component, Component::Normal(name) if name.to_string_lossy().starts_with('.'))
}

/// Watch `root` recursively, sending every changed path to `tx`.
///
/// The returned watcher stops when dropped.
///
/// # Errors
///
/// Returns an error if the platform watcher cannot be created or `root`
/// cannot be watched.
pub fn spawn(root: &Path, tx: mpsc::Sender<PathBuf>) -> notify::Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if matches!(event.kind, EventKind::Access(_)) {
                return;
            }
            for path in event.paths {
                if tx.blocking_send(path).is_err() {
                    return;
                }
            }
        }
        Err(e) => tracing::warn!("watch error: {e}"),
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;
    Ok(watcher)
}
