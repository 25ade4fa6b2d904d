//! Build tasks and the code that runs one.
pub mod clean;
pub mod context;
pub mod graph;
mod processing;
pub mod scripts;
pub mod styles;
pub mod vendor;

/// Declare the tasks that must finish first, e.g.
/// `task_deps![super::clean::CleanVendor]`.
///
/// The ids live in a `const` so the returned slice is `'static`.
macro_rules! task_deps {
    [$($dep:ty),+ $(,)?] => {
        fn dependencies(&self) -> &[std::any::TypeId] {
            const DEPS: &[std::any::TypeId] = &[$(std::any::TypeId::of::<$dep>()),+];
            DEPS
        }
    };
}

pub(crate) use task_deps;

pub use context::Context;
pub use processing::{
    TaskResult, TaskStats, collect_stats, process_resources, process_resources_remove,
};

use std::any::TypeId;
use std::panic::{AssertUnwindSafe, catch_unwind};

use anyhow::Result;

use crate::logging::TaskStatus;

/// One step of the build pipeline.
///
/// Tasks refer to each other by [`TypeId`], hence `'static`.
pub trait Task: Send + Sync + 'static {
    /// Name shown in stage headers and the summary.
    fn name(&self) -> &str;

    /// Identity other tasks name in their dependencies.
    fn task_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Tasks that must complete before this task starts.
    ///
    /// Dependencies missing from the task list being run are ignored, which
    /// is how `assetpipe css` runs the style build on its own.
    fn dependencies(&self) -> &[TypeId] {
        &[]
    }

    /// `false` when the configuration gives this task nothing to do.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Do the work.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be compiled, an output cannot be
    /// written, or the configuration is unusable.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Every task of a full build.  The scheduler orders them by dependency.
#[must_use]
pub fn all_build_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(clean::CleanVendor),
        Box::new(vendor::CopyVendor),
        Box::new(styles::BuildStyles),
        Box::new(scripts::BuildScripts),
    ]
}

/// Run `task` and record its outcome for the summary.
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    let name = task.name();
    let (status, message) = if task.should_run(ctx) {
        ctx.log.stage(name);
        let result = catch_unwind(AssertUnwindSafe(|| task.run(ctx)))
            .unwrap_or_else(|_| Err(anyhow::anyhow!("task panicked")));
        outcome(name, result, ctx)
    } else {
        ctx.log.debug(&format!("{name}: nothing configured"));
        (TaskStatus::NotApplicable, None)
    };
    ctx.log.record_task(name, status, message.as_deref());
    status
}

fn outcome(name: &str, result: Result<TaskResult>, ctx: &Context) -> (TaskStatus, Option<String>) {
    match result {
        Ok(TaskResult::Ok) => (TaskStatus::Ok, None),
        Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None),
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            (TaskStatus::Skipped, Some(reason))
        }
        Err(e) => {
            let text = format!("{e:#}");
            ctx.log.error(&format!("{name}: {text}"));
            (TaskStatus::Failed, Some(text))
        }
    }
}
