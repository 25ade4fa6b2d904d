//! Console logger: prints lines, tracks running tasks and prints the
//! end-of-run summary.
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::types::{LineKind, Log, TaskEntry, TaskStatus};
use super::utils::{log_file_path, terminal_columns};

/// Console logger shared by every task of a run.
///
/// Lines also land in `$XDG_CACHE_HOME/assetpipe/<command>.log` through the
/// file layer installed by [`init_subscriber`](super::init_subscriber),
/// with timestamps and without colour, whatever the verbosity.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
    /// Held while a block of task output or the progress line is printed.
    pub(super) flush_lock: Mutex<()>,
    /// Tasks currently running in parallel, in start order.
    active: Mutex<Vec<String>>,
    /// Whether the single-row progress line is on screen.
    progress_shown: Mutex<bool>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Only remembers where the log file lives, for the summary footer;
    /// [`init_subscriber`](super::init_subscriber) creates the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
            flush_lock: Mutex::new(()),
            active: Mutex::new(Vec::new()),
            progress_shown: Mutex::new(false),
        }
    }

    /// Path of the log file, if one is configured (test-only accessor).
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Outcomes recorded so far.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget recorded outcomes.
    ///
    /// Watch mode calls this before each rebuild so a summary covers one run.
    pub fn clear_tasks(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Record how a task ended.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }

    /// `true` if any recorded task failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(TaskStatus::Failed)
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|t| t.status == status)
            .count()
    }

    /// Print one row per recorded task, a totals line and the log path.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for task in &tasks {
            let (glyph, colour) = task.status.glyph();
            let detail = task
                .message
                .as_deref()
                .map_or_else(String::new, |m| format!(" ({m})"));
            self.info(&format!("{colour}{glyph} {}{detail}\x1b[0m", task.name));
        }

        println!();
        let mut totals = format!("{} tasks:", tasks.len());
        for (status, label) in [
            (TaskStatus::Ok, "ok"),
            (TaskStatus::NotApplicable, "n/a"),
            (TaskStatus::Skipped, "skipped"),
            (TaskStatus::DryRun, "dry-run"),
            (TaskStatus::Failed, "failed"),
        ] {
            let n = self.count(status);
            if n > 0 {
                let (_, colour) = status.glyph();
                totals.push_str(&format!(" {colour}{n} {label}\x1b[0m"));
            }
        }
        self.info(&totals);

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }

    /// Mark `name` as running and redraw the progress line.
    pub fn notify_task_start(&self, name: &str) {
        let _console = self.flush_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.clear_progress();
        let names = {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            active.push(name.to_string());
            active.join(", ")
        };
        self.draw_progress(&names);
    }

    /// Drop `name` from the running set, returning the names still running.
    pub(super) fn finish_active(&self, name: &str) -> Option<String> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        active.retain(|n| n != name);
        (!active.is_empty()).then(|| active.join(", "))
    }

    /// Erase the progress line if it is shown.  Caller holds `flush_lock`.
    #[allow(clippy::print_stdout)]
    pub(super) fn clear_progress(&self) {
        let mut shown = self
            .progress_shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *shown {
            print!("\r\x1b[K");
            std::io::stdout().flush().ok();
            *shown = false;
        }
    }

    /// Print `names` as the progress line, cut to one terminal row.  Caller
    /// holds `flush_lock`.
    #[allow(clippy::print_stdout)]
    pub(super) fn draw_progress(&self, names: &str) {
        let room = terminal_columns().saturating_sub(4);
        let shown_names = if names.chars().count() > room {
            let mut cut: String = names.chars().take(room.saturating_sub(1)).collect();
            cut.push('…');
            cut
        } else {
            names.to_string()
        };
        print!("  \x1b[2m▹ {shown_names}\x1b[0m");
        std::io::stdout().flush().ok();
        *self
            .progress_shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }

    #[cfg(test)]
    pub(crate) fn progress_rows_count(&self) -> u16 {
        u16::from(*self.progress_shown.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[cfg(test)]
    pub(crate) fn active_task_names(&self) -> Vec<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Log for Logger {
    fn line(&self, kind: LineKind, msg: &str) {
        kind.emit(msg);
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        Self::record_task(self, name, status, message);
    }
}
