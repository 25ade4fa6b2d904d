//! SCSS compilation, vendor prefixing and CSS minification.
//!
//! `grass` turns SCSS into plain CSS; `lightningcss` parses that once,
//! applies the browser targets and prints it twice, expanded for
//! `<name>.css` and minified for `<name>.min.css`.
//!
//! Prefixing happens in the same lightningcss pass that optimises the
//! sheet, so both renditions are normalised: adjacent rules with the same
//! declarations are merged and values take their shortest form
//! (`#ff0000` prints as `red`).  The expanded file differs from the
//! minified one only in whitespace.
use std::path::{Path, PathBuf};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::error::{AssetError, ConfigError};

/// Expanded and minified renditions of one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStyle {
    /// Human-readable output.
    pub expanded: String,
    /// Minified output.
    pub minified: String,
}

/// Compiles stylesheets for a fixed set of load paths and browser targets.
#[derive(Debug, Clone)]
pub struct StyleCompiler {
    load_paths: Vec<PathBuf>,
    targets: Targets,
}

impl StyleCompiler {
    /// Resolve the browserslist `browsers` queries and build a compiler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBrowsers`] if the queries cannot be
    /// resolved.
    pub fn new(load_paths: Vec<PathBuf>, browsers: &[String]) -> Result<Self, ConfigError> {
        let targets = if browsers.is_empty() {
            Targets::default()
        } else {
            let resolved =
                Browsers::from_browserslist(browsers).map_err(|e| ConfigError::InvalidBrowsers {
                    query: browsers.to_vec(),
                    message: e.to_string(),
                })?;
            Targets::from(resolved.unwrap_or_default())
        };
        Ok(Self {
            load_paths,
            targets,
        })
    }

    /// Compile the SCSS file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Compile`] with the compiler message when the
    /// SCSS is invalid, or [`AssetError::Css`] when the result cannot be
    /// processed.
    pub fn compile(&self, path: &Path) -> Result<CompiledStyle, AssetError> {
        let options = grass::Options::default()
            .style(grass::OutputStyle::Expanded)
            .load_paths(&self.load_paths);
        let css = grass::from_path(path, &options).map_err(|e| AssetError::Compile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.process(path, &css)
    }

    /// Prefix, normalise and print already-compiled CSS.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Css`] if `css` cannot be parsed or printed.
    pub fn process(&self, path: &Path, css: &str) -> Result<CompiledStyle, AssetError> {
        let css_error = |message: String| AssetError::Css {
            path: path.to_path_buf(),
            message,
        };

        let mut sheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename: path.display().to_string(),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| css_error(e.to_string()))?;

        sheet
            .minify(MinifyOptions {
                targets: self.targets,
                ..MinifyOptions::default()
            })
            .map_err(|e| css_error(e.to_string()))?;

        let expanded = sheet
            .to_css(PrinterOptions {
                targets: self.targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| css_error(e.to_string()))?
            .code;
        let minified = sheet
            .to_css(PrinterOptions {
                minify: true,
                targets: self.targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| css_error(e.to_string()))?
            .code;

        Ok(CompiledStyle { expanded, minified })
    }
}

/// `true` for SCSS partials (`_variables.scss`), which are only imported.
#[must_use]
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}
