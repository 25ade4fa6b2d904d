//! Dependency-driven task scheduling.
//!
//! Provides [`TaskGraph`] for tracking task completions and [`run_tasks`] for
//! executing tasks either concurrently on OS threads or sequentially in
//! topological order.  In both modes a task whose dependency failed is not
//! run; it is recorded as skipped and blocks its own dependents in turn.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex};

use anyhow::Result;

use crate::error::TaskError;
use crate::logging::{BufferedLog, Log, Logger, TaskStatus};
use crate::tasks::{self, Context, Task, graph};

#[derive(Debug, Default)]
struct GraphState {
    /// Tasks that have finished, successfully or not.
    completed: HashSet<TypeId>,
    /// Finished tasks that failed or were skipped because of a failure.
    blocked: HashSet<TypeId>,
}

/// Shared state for dependency-driven parallel task scheduling.
///
/// Tasks call [`wait_for_deps`](TaskGraph::wait_for_deps) before starting and
/// [`mark_complete`](TaskGraph::mark_complete) when finished.  The [`Condvar`]
/// wakes all waiting tasks whenever a new completion is recorded.
#[derive(Debug, Default)]
struct TaskGraph {
    state: Mutex<GraphState>,
    /// Notified whenever a task completes.
    condvar: Condvar,
}

impl TaskGraph {
    fn new() -> Self {
        Self::default()
    }

    /// Block until every [`TypeId`] in `deps` has completed.
    ///
    /// Returns the first dependency (in declaration order) that did not
    /// succeed, if any.
    fn wait_for_deps(&self, deps: &[TypeId]) -> Option<TypeId> {
        if deps.is_empty() {
            return None;
        }
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while !deps.iter().all(|d| state.completed.contains(d)) {
            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
        deps.iter().find(|d| state.blocked.contains(d)).copied()
    }

    /// Record a task as complete and wake all waiting threads.
    fn mark_complete(&self, id: TypeId, succeeded: bool) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.completed.insert(id);
        if !succeeded {
            state.blocked.insert(id);
        }
        drop(state);
        self.condvar.notify_all();
    }

    fn into_blocked(self) -> HashSet<TypeId> {
        self.state
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .blocked
    }
}

/// Run `tasks`, honouring their declared dependencies.
///
/// Runs in parallel when `ctx.parallel` is set, otherwise one at a time in
/// topological order.  Returns the ids of tasks that failed or were skipped
/// because a dependency failed.
///
/// # Errors
///
/// Returns [`TaskError::DependencyCycle`] if the dependencies form a cycle;
/// no task is run in that case.
pub fn run_tasks(
    tasks: &[&dyn Task],
    ctx: &Context,
    log: &Arc<Logger>,
) -> Result<HashSet<TypeId>> {
    let Some(order) = graph::topological_order(tasks) else {
        let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
        return Err(TaskError::DependencyCycle(names.join(", ")).into());
    };

    if ctx.parallel && tasks.len() > 1 {
        Ok(run_tasks_parallel(tasks, ctx, log))
    } else {
        Ok(run_tasks_sequential(tasks, &order, ctx))
    }
}

/// Dependencies of each task, restricted to the tasks being run.
fn present_deps(tasks: &[&dyn Task]) -> Vec<Vec<TypeId>> {
    let present: HashSet<TypeId> = tasks.iter().map(|t| t.task_id()).collect();
    tasks
        .iter()
        .map(|t| {
            t.dependencies()
                .iter()
                .filter(|d| present.contains(d))
                .copied()
                .collect()
        })
        .collect()
}

/// Record `task` as skipped because `dep_name` failed.
fn skip_blocked(task: &dyn Task, dep_name: &str, log: &dyn Log) {
    let reason = TaskError::DependencyFailed(dep_name.to_string()).to_string();
    log.warn(&format!("skipping {}: {reason}", task.name()));
    log.record_task(task.name(), TaskStatus::Skipped, Some(&reason));
}

fn run_tasks_sequential(tasks: &[&dyn Task], order: &[usize], ctx: &Context) -> HashSet<TypeId> {
    let deps = present_deps(tasks);
    let id_to_name: HashMap<TypeId, &str> =
        tasks.iter().map(|t| (t.task_id(), t.name())).collect();
    let mut blocked = HashSet::new();

    for &idx in order {
        let (Some(task), Some(task_deps)) = (tasks.get(idx), deps.get(idx)) else {
            continue;
        };
        if let Some(dep) = task_deps.iter().find(|d| blocked.contains(*d)) {
            skip_blocked(
                *task,
                id_to_name.get(dep).copied().unwrap_or("unknown"),
                &*ctx.log,
            );
            blocked.insert(task.task_id());
            continue;
        }
        if tasks::execute(*task, ctx) == TaskStatus::Failed {
            blocked.insert(task.task_id());
        }
    }
    blocked
}

/// Run tasks in parallel using a dependency graph.
///
/// Each task is spawned into an OS thread (via `std::thread::scope`) and waits
/// for its dependencies to complete before executing.  Blocking on a
/// `Condvar` inside a Rayon worker could exhaust Rayon's pool and deadlock,
/// and the tasks themselves use Rayon for per-file work.  Output is buffered
/// per task and flushed to the console on completion.
fn run_tasks_parallel(tasks: &[&dyn Task], ctx: &Context, log: &Arc<Logger>) -> HashSet<TypeId> {
    let resolved_deps = present_deps(tasks);
    let id_to_name: HashMap<TypeId, &str> =
        tasks.iter().map(|t| (t.task_id(), t.name())).collect();
    let graph = TaskGraph::new();

    std::thread::scope(|s| {
        for (task, deps) in tasks.iter().zip(resolved_deps.iter()) {
            let task = *task;
            let graph = &graph;
            let id_to_name = &id_to_name;
            s.spawn(move || {
                if let Some(dep) = graph.wait_for_deps(deps) {
                    let name = id_to_name.get(&dep).copied().unwrap_or("unknown");
                    skip_blocked(task, name, &**log);
                    graph.mark_complete(task.task_id(), false);
                    return;
                }

                log.notify_task_start(task.name());
                let buf = Arc::new(BufferedLog::new(Arc::clone(log)));
                let task_ctx = ctx.with_log(Arc::clone(&buf) as Arc<dyn Log>);
                let status = tasks::execute(task, &task_ctx);
                buf.flush_and_complete(task.name());
                graph.mark_complete(task.task_id(), status != TaskStatus::Failed);
            });
        }
    });

    graph.into_blocked()
}
