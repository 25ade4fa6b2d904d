//! Front-end asset pipeline.
//!
//! Rebuilds a static site's derived assets from its sources: vendor files
//! copied out of installed packages, SCSS compiled to prefixed and minified
//! CSS, and JavaScript minified next to its source.  `watch` mode serves the
//! project with live reload and rebuilds on every save.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: load `assetpipe.toml` and `package.json`, render the banner
//! - **[`assets`]**: glob expansion and the style and script compilers
//! - **[`resources`]**: idempotent `check + apply` primitives (written files, copies, directories)
//! - **[`tasks`]**: named, dependency-ordered units of work wired to resources
//! - **[`server`]** and **[`watcher`]**: the live-reload dev server and change detection
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod resources;
pub mod server;
pub mod tasks;
pub mod watcher;
