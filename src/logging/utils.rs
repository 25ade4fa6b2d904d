//! Helpers for the log file location, terminal width and timestamps.
use std::path::PathBuf;

/// Timestamp formats used by the log file.
#[derive(Debug, Clone, Copy)]
pub(super) enum Clock {
    /// `YYYY-MM-DD HH:MM:SS`, for the run banner.
    Date,
    /// `HH:MM:SS`, for each line.
    Time,
}

impl Clock {
    /// The current UTC time in this format.
    pub(super) fn now(self) -> String {
        let format = match self {
            Self::Date => "%Y-%m-%d %H:%M:%S",
            Self::Time => "%H:%M:%S",
        };
        chrono::Utc::now().format(format).to_string()
    }
}

/// Remove CSI escape sequences (colours, cursor moves, erases) from `s`.
///
/// A lone escape drops itself and the character after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            // Parameters run until the final byte in `@..=~`.
            for param in chars.by_ref() {
                if ('@'..='~').contains(&param) {
                    break;
                }
            }
        }
    }
    out
}

/// Columns available for the progress line: the terminal's width, else
/// `COLUMNS`, else 80.
pub(super) fn terminal_columns() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| usize::from(w))
        .filter(|&w| w > 0)
        .unwrap_or_else(|| columns_from(std::env::var("COLUMNS").ok().as_deref()))
}

fn columns_from(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(80)
}

/// `$XDG_CACHE_HOME/assetpipe/<command>.log`, falling back to
/// `~/.cache/assetpipe/`.  Creates the directory; `None` if that fails.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })
        .unwrap_or_else(|| PathBuf::from(".cache"));
    let dir = base.join("assetpipe");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
