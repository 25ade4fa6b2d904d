//! Tracing subscriber: the console formatter and the log-file layer.
use std::fs;
use std::io::Write as _;
use std::sync::{Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::types::LineKind;
use super::utils::{Clock, log_file_path, strip_ansi};

/// Pulls the `message` field out of an event.
#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Read an event's kind and message.
fn decode(event: &tracing::Event<'_>) -> (LineKind, String) {
    let metadata = event.metadata();
    let mut message = Message::default();
    event.record(&mut message);
    (LineKind::of(*metadata.level(), metadata.target()), message.0)
}

impl LineKind {
    /// Tag written before the message in the log file.
    const fn file_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Info => "    ",
            Self::Debug => "    [debug] ",
            Self::Warn => "    [warn] ",
            Self::Error => "    [error] ",
            Self::DryRun => "    [dry run] ",
        }
    }
}

/// Writes every event to `<cache>/assetpipe/<command>.log`, timestamped and
/// without colour.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log for `command`, write the run banner and open it for
    /// appending.  `None` if the cache directory is unusable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version = crate::commands::version::version();
        let rule = "=".repeat(42);
        fs::write(
            &path,
            format!("{rule}\nassetpipe {version} {}\n{rule}\n", Clock::Date.now()),
        )
        .ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let (kind, msg) = decode(event);
        let line = format!(
            "[{}] {}{}",
            Clock::Time.now(),
            kind.file_tag(),
            strip_ansi(&msg)
        );
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(file, "{line}").ok();
    }
}

/// Console rendering: bold stage arrows, indented progress, coloured
/// warnings and errors.
struct PipelineFormatter;

impl<S, N> FormatEvent<S, N> for PipelineFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let (kind, msg) = decode(event);
        match kind {
            LineKind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            LineKind::Info => writeln!(writer, "  {msg}"),
            LineKind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
            LineKind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            LineKind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            LineKind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        }
    }
}

/// Install the global subscriber.  Call once, before anything logs.
///
/// Warnings and errors go to stderr, everything else to stdout.  The console
/// shows `info` and up (`debug` with `verbose`) unless `ASSETPIPE_LOG` holds
/// [`EnvFilter`](tracing_subscriber::EnvFilter) directives such as
/// `ASSETPIPE_LOG=tower_http=debug`.  The log file always gets `debug`.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = EnvFilter::try_from_env("ASSETPIPE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let console = fmt::layer()
        .event_format(PipelineFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(tracing::Level::WARN)
                .and(std::io::stdout.with_min_level(tracing::Level::INFO)),
        )
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(console)
        .with(FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG)))
        .init();
}
