//! Core logging types: line kinds, task outcomes and the [`Log`] trait.
use tracing::Level;

/// Tracing target marking stage headers.
pub(super) const STAGE_TARGET: &str = "assetpipe::stage";

/// Tracing target marking dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "assetpipe::dry_run";

/// The kinds of line the pipeline prints.
///
/// Each kind maps onto one tracing level and target, so the console and
/// log-file layers can recover it from an event with [`LineKind::of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Section header, e.g. a task starting.
    Stage,
    /// Normal progress output.
    Info,
    /// Detail shown only with `--verbose`; always kept in the log file.
    Debug,
    /// Something was skipped or looks wrong.
    Warn,
    /// A task failed.
    Error,
    /// What a dry run would have changed.
    DryRun,
}

impl LineKind {
    /// Send `msg` through tracing at this kind's level and target.
    pub fn emit(self, msg: &str) {
        match self {
            Self::Stage => tracing::info!(target: STAGE_TARGET, "{msg}"),
            Self::Info => tracing::info!("{msg}"),
            Self::Debug => tracing::debug!("{msg}"),
            Self::Warn => tracing::warn!("{msg}"),
            Self::Error => tracing::error!("{msg}"),
            Self::DryRun => tracing::info!(target: DRY_RUN_TARGET, "{msg}"),
        }
    }

    /// Recover the kind of a tracing event.  Events from other crates land
    /// on the kind matching their level.
    pub(super) fn of(level: Level, target: &str) -> Self {
        match (level, target) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// One row of the end-of-run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name.
    pub name: String,
    /// How the task ended.
    pub status: TaskStatus,
    /// Skip reason or error text.
    pub message: Option<String>,
}

/// How a task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Ran to completion.
    Ok,
    /// Had nothing to do (empty vendor list).
    NotApplicable,
    /// Not run because a dependency failed, or nothing to build.
    Skipped,
    /// Ran without writing anything.
    DryRun,
    /// Returned an error.
    Failed,
}

impl TaskStatus {
    /// Summary glyph and its ANSI colour.
    pub(super) const fn glyph(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[37m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}

/// Where task code sends its output.
///
/// [`Logger`](super::Logger) prints immediately; [`BufferedLog`](super::BufferedLog)
/// holds lines back so parallel tasks print as whole blocks.
pub trait Log: Send + Sync {
    /// Print one line of the given kind.
    fn line(&self, kind: LineKind, msg: &str);

    /// Record how a task ended, for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);

    /// Print a stage header.
    fn stage(&self, msg: &str) {
        self.line(LineKind::Stage, msg);
    }

    /// Print a progress line.
    fn info(&self, msg: &str) {
        self.line(LineKind::Info, msg);
    }

    /// Print a verbose-only line.
    fn debug(&self, msg: &str) {
        self.line(LineKind::Debug, msg);
    }

    /// Print a warning.
    fn warn(&self, msg: &str) {
        self.line(LineKind::Warn, msg);
    }

    /// Print an error.
    fn error(&self, msg: &str) {
        self.line(LineKind::Error, msg);
    }

    /// Print a dry-run preview.
    fn dry_run(&self, msg: &str) {
        self.line(LineKind::DryRun, msg);
    }
}
