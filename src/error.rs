//! Domain-specific error types for the asset pipeline.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`AssetError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error types
//!
//! ```text
//! ConfigError  unreadable or invalid configuration
//! TaskError    dependency cycles and failures, unsafe clean targets
//! AssetError   compiler and minifier failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from loading configuration and package metadata.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML or JSON for its schema.
    #[error("Invalid syntax in {path}: {message}")]
    InvalidSyntax {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A glob pattern in the configuration cannot be compiled.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as written in the configuration.
        pattern: String,
        /// Parser message.
        message: String,
    },

    /// The browser target query cannot be resolved.
    #[error("Invalid browser query {query:?}: {message}")]
    InvalidBrowsers {
        /// The browserslist queries.
        query: Vec<String>,
        /// Resolver message.
        message: String,
    },
}

/// Errors that arise during task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The task dependency graph contains a cycle.
    #[error("Task dependency cycle detected: {0}")]
    DependencyCycle(String),

    /// A task was not started because one of its dependencies failed.
    #[error("dependency '{0}' failed")]
    DependencyFailed(String),

    /// The vendor directory points at the project root or outside it.
    #[error("refusing to delete {path}: not inside the project root")]
    UnsafeCleanTarget {
        /// The resolved vendor directory.
        path: PathBuf,
    },
}

/// Errors that arise while transforming a single asset.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The stylesheet could not be compiled.
    #[error("failed to compile {path}: {message}")]
    Compile {
        /// Source file.
        path: PathBuf,
        /// Compiler message.
        message: String,
    },

    /// The compiled CSS could not be parsed, prefixed or printed.
    #[error("failed to process CSS for {path}: {message}")]
    Css {
        /// Source file.
        path: PathBuf,
        /// Processor message.
        message: String,
    },

    /// The script could not be minified.
    #[error("failed to minify {path}: {message}")]
    Minify {
        /// Source file.
        path: PathBuf,
        /// Minifier message.
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: PathBuf::from("/site/assetpipe.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/site/assetpipe.toml"));
        assert!(e.to_string().contains("IO error reading"));
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("package.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn config_error_invalid_pattern_display() {
        let e = ConfigError::InvalidPattern {
            pattern: "scss/[".to_string(),
            message: "invalid range pattern".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid glob pattern 'scss/[': invalid range pattern"
        );
    }

    #[test]
    fn task_error_dependency_failed_display() {
        let e = TaskError::DependencyFailed("Clean vendor".to_string());
        assert_eq!(e.to_string(), "dependency 'Clean vendor' failed");
    }

    #[test]
    fn task_error_unsafe_clean_target_display() {
        let e = TaskError::UnsafeCleanTarget {
            path: PathBuf::from("/"),
        };
        assert!(e.to_string().contains("refusing to delete /"));
    }

    #[test]
    fn asset_error_compile_display() {
        let e = AssetError::Compile {
            path: PathBuf::from("scss/site.scss"),
            message: "expected \"}\".".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "failed to compile scss/site.scss: expected \"}\"."
        );
    }

    #[test]
    fn minify_error_names_the_script() {
        let e = AssetError::Minify {
            path: PathBuf::from("js/app.js"),
            message: "unexpected token".to_string(),
        };
        assert_eq!(e.to_string(), "failed to minify js/app.js: unexpected token");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<TaskError>();
        assert_send_sync::<AssetError>();
    }

    #[test]
    fn asset_error_converts_to_anyhow() {
        let e = AssetError::Css {
            path: PathBuf::from("scss/a.scss"),
            message: "bad".to_string(),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
