//! Per-task line buffer used while tasks run in parallel.
use std::sync::{Arc, Mutex, PoisonError};

use super::logger::Logger;
use super::types::{LineKind, Log, TaskStatus};

/// Holds a task's lines until it finishes, then prints them as one block.
///
/// Task outcomes skip the buffer and go straight to the [`Logger`], whose
/// summary list is already shared between threads.
#[derive(Debug)]
pub struct BufferedLog {
    inner: Arc<Logger>,
    lines: Mutex<Vec<(LineKind, String)>>,
}

impl BufferedLog {
    /// Buffer lines destined for `inner`.
    #[must_use]
    pub const fn new(inner: Arc<Logger>) -> Self {
        Self {
            inner,
            lines: Mutex::new(Vec::new()),
        }
    }

    fn drain(&self) -> Vec<(LineKind, String)> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Print the buffered lines without touching the progress line.
    #[cfg(test)]
    pub fn flush(&self) {
        for (kind, msg) in self.drain() {
            kind.emit(&msg);
        }
    }

    /// Print the buffered lines as one block and drop `task_name` from the
    /// progress line.
    pub fn flush_and_complete(&self, task_name: &str) {
        let _console = self
            .inner
            .flush_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.clear_progress();
        for (kind, msg) in self.drain() {
            kind.emit(&msg);
        }
        if let Some(still_running) = self.inner.finish_active(task_name) {
            self.inner.draw_progress(&still_running);
        }
    }
}

impl Log for BufferedLog {
    fn line(&self, kind: LineKind, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, msg.to_string()));
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.inner.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn outcomes_bypass_the_buffer() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let buf = BufferedLog::new(Arc::clone(&log));
        buf.record_task("Build styles", TaskStatus::Ok, None);
        assert_eq!(log.task_entries()[0].name, "Build styles");
    }

    #[test]
    fn lines_reach_the_file_only_after_flush() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let buf = BufferedLog::new(Arc::clone(&log));
        let marker = format!("buffered-{}", std::process::id());
        buf.info(&marker);

        let path = log.log_path().expect("log path");
        assert!(!fs::read_to_string(path).unwrap().contains(&marker));
        buf.flush();
        assert!(fs::read_to_string(path).unwrap().contains(&marker));
    }

    #[test]
    fn flush_keeps_order_and_empties_the_buffer() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        let buf = BufferedLog::new(Arc::clone(&log));
        buf.stage("order-stage");
        buf.info("order-info");
        buf.warn("order-warn");
        buf.dry_run("order-dry");
        buf.flush();
        buf.flush();

        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        let at = |s: &str| contents.find(s).expect(s);
        assert!(at("order-stage") < at("order-info"));
        assert!(at("order-info") < at("order-warn"));
        assert!(at("order-warn") < at("order-dry"));
        assert_eq!(contents.matches("order-info").count(), 1);
    }

    #[test]
    fn completing_the_last_task_clears_progress() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        log.notify_task_start("Copy vendor");
        BufferedLog::new(Arc::clone(&log)).flush_and_complete("Copy vendor");
        assert_eq!(log.progress_rows_count(), 0);
    }

    #[test]
    fn completing_one_task_keeps_the_others_active() {
        let (log, _tmp, _guard) = isolated_logger();
        let log = Arc::new(log);
        log.notify_task_start("Build styles");
        log.notify_task_start("Build scripts");
        BufferedLog::new(Arc::clone(&log)).flush_and_complete("Build styles");
        assert_eq!(log.active_task_names(), vec!["Build scripts".to_string()]);
    }
}
