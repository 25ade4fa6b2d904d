//! Glob expansion relative to the project root.
//!
//! Matched files keep their path relative to the glob base, the leading
//! components of the pattern that contain no metacharacters.  This is how
//! `node_modules/jquery/dist/*` lands in `vendor/jquery/` without the
//! `node_modules/jquery/dist` prefix.
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;

/// Wildcards never match a leading dot, so `**/*` skips `.DS_Store` and
/// hidden directories such as `.cache/` unless the pattern names them.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A file matched by [`expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    /// Absolute path of the matched file.
    pub path: PathBuf,
    /// Path relative to the glob base.
    pub relative: PathBuf,
}

/// Return the glob base of `pattern`.
///
/// ```
/// use assetpipe_cli::assets::sources::glob_base;
/// use std::path::Path;
///
/// assert_eq!(glob_base("scss/**/*.scss"), Path::new("scss"));
/// assert_eq!(glob_base("node_modules/jquery/dist/*"), Path::new("node_modules/jquery/dist"));
/// assert_eq!(glob_base("*.js"), Path::new(""));
/// ```
#[must_use]
pub fn glob_base(pattern: &str) -> PathBuf {
    pattern
        .split('/')
        .take_while(|part| !part.contains(['*', '?', '[']))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

/// Compile a list of root-relative exclusion patterns.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPattern`] for the first pattern that does
/// not parse.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

/// `true` if the root-relative `relative` path matches any of `patterns`.
#[must_use]
pub fn matches_any(patterns: &[Pattern], relative: &Path) -> bool {
    let candidate = to_slash(relative);
    patterns
        .iter()
        .any(|p| p.matches_with(&candidate, MATCH_OPTIONS))
}

/// Expand `pattern` under `root`, dropping directories and anything that
/// matches one of `exclude`.
///
/// The result is sorted by path so repeated runs see the same order.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or a directory on the way cannot
/// be read.
pub fn expand(root: &Path, pattern: &str, exclude: &[String]) -> Result<Vec<Matched>, ConfigError> {
    let excludes = compile_patterns(exclude)?;
    let full = format!(
        "{}/{}",
        Pattern::escape(&to_slash(root)),
        pattern.trim_start_matches("./")
    );
    let paths = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.msg.to_string(),
    })?;

    let base = root.join(glob_base(pattern));
    let mut matched = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| ConfigError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if !path.is_file() {
            continue;
        }
        let Ok(from_root) = path.strip_prefix(root) else {
            continue;
        };
        if matches_any(&excludes, from_root) {
            continue;
        }
        let relative = path
            .strip_prefix(&base)
            .map_or_else(|_| from_root.to_path_buf(), Path::to_path_buf);
        matched.push(Matched { path, relative });
    }
    matched.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(matched)
}

/// Render a path with `/` separators for pattern matching.
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
        .replacen("//", "/", 1)
}
