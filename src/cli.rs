//! Command-line interface definitions.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the asset pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "assetpipe",
    about = "Front-end asset pipeline: vendor sync, SCSS and JS builds, live-reload dev server",
    version
)]
pub struct Cli {
    /// Command to run; defaults to `build`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The selected command, `build` when none was given.
    #[must_use]
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Build)
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without writing
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Project root directory (defaults to $ASSETPIPE_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Disable parallel execution of tasks and of files within tasks
    #[arg(long = "no-parallel", global = true, action = clap::ArgAction::SetFalse)]
    pub parallel: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clean, copy vendor files, then build styles and scripts
    Build,
    /// Clean and copy vendor files
    Vendor,
    /// Build stylesheets only
    Css,
    /// Build scripts only
    Js,
    /// Delete the vendor directory
    Clean,
    /// Build, then serve the project with live reload and rebuild on change
    Watch(WatchOpts),
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Vendor => "vendor",
            Self::Css => "css",
            Self::Js => "js",
            Self::Clean => "clean",
            Self::Watch(_) => "watch",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `watch` subcommand.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct WatchOpts {
    /// Port for the development server (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}
