//! The resource loop shared by every task: inspect each target, write or
//! delete what differs, and count the outcome.
//!
//! - [`apply`]: single-resource processing (`sync_one`, `remove_one`)
//! - [`parallel`]: Rayon-based parallel processing helpers

mod apply;
mod parallel;

use anyhow::Result;

use super::Context;
use crate::resources::Resource;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use assetpipe_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no stylesheets".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped (nothing to build).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Per-task counters over the resources a task touched.
///
/// ```
/// use assetpipe_cli::tasks::TaskStats;
///
/// let stats = TaskStats { updated: 2, up_to_date: 5, skipped: 0 };
/// assert_eq!(stats.summary(false), "2 updated, 5 up to date");
/// assert_eq!(stats.summary(true), "2 to update, 5 up to date");
///
/// let blocked = TaskStats { updated: 0, up_to_date: 1, skipped: 1 };
/// assert_eq!(blocked.summary(false), "0 updated, 1 up to date, 1 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Targets written, copied or deleted (or that would be, in a dry run).
    pub updated: u32,
    /// Targets that already matched.
    pub up_to_date: u32,
    /// Targets left alone: blocked outputs, vendor globs matching nothing.
    pub skipped: u32,
}

impl TaskStats {
    /// All counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary for the task log.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "to update" } else { "updated" };
        let mut line = format!("{} {verb}, {} up to date", self.updated, self.up_to_date);
        if self.skipped > 0 {
            line.push_str(&format!(", {} skipped", self.skipped));
        }
        line
    }

    /// Log the summary and turn the counters into the task's result.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.updated += other.updated;
        self.up_to_date += other.up_to_date;
        self.skipped += other.skipped;
    }
}

/// Run `step` over every resource, on the rayon pool when the context
/// allows it, and add up the results.
fn for_each_resource<R, F>(ctx: &Context, resources: Vec<R>, step: F) -> Result<TaskStats>
where
    R: Resource + Send,
    F: Fn(&R) -> Result<TaskStats> + Sync + Send,
{
    if ctx.parallel && resources.len() > 1 {
        ctx.log
            .debug(&format!("processing {} targets in parallel", resources.len()));
        return parallel::collect_parallel_stats(resources, |resource| step(&resource));
    }
    resources.iter().try_fold(TaskStats::new(), |mut total, resource| {
        total += step(resource)?;
        Ok(total)
    })
}

/// Bring every resource up to date and return the counters without
/// logging them.
///
/// Tasks that add counts of their own (a vendor glob matching nothing)
/// call this and then [`TaskStats::finish`].
///
/// # Errors
///
/// Returns the first error from inspecting or writing a target.
pub fn collect_stats<R: Resource + Send>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskStats> {
    for_each_resource(ctx, resources.into_iter().collect(), |resource| {
        apply::sync_one(ctx, resource, verb)
    })
}

/// Bring every resource up to date and log the summary.
///
/// # Errors
///
/// Returns the first error from inspecting or writing a target.
pub fn process_resources<R: Resource + Send>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    Ok(collect_stats(ctx, resources, verb)?.finish(ctx))
}

/// Delete every resource whose target exists and log the summary.
///
/// # Errors
///
/// Returns the first error from inspecting or deleting a target.
pub fn process_resources_remove<R: Resource + Send>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    let stats = for_each_resource(ctx, resources.into_iter().collect(), |resource| {
        apply::remove_one(ctx, resource, verb)
    })?;
    Ok(stats.finish(ctx))
}
