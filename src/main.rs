//! `assetpipe` binary: parse the command line and dispatch.
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

use assetpipe_cli::cli::{Cli, Command};
use assetpipe_cli::commands::{self, build::Target};
use assetpipe_cli::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.selected_command();

    if let Command::Completions { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "assetpipe", &mut std::io::stdout());
        return Ok(());
    }
    if command == Command::Version {
        commands::version::run();
        return Ok(());
    }

    init_subscriber(args.verbose, command.log_name());
    let log = Arc::new(Logger::new(command.log_name()));

    match command {
        Command::Build => commands::build::run(&args.global, Target::All, &log),
        Command::Vendor => commands::build::run(&args.global, Target::Vendor, &log),
        Command::Css => commands::build::run(&args.global, Target::Styles, &log),
        Command::Js => commands::build::run(&args.global, Target::Scripts, &log),
        Command::Clean => commands::build::run(&args.global, Target::Clean, &log),
        Command::Watch(opts) => commands::watch::run(&args.global, &opts, &log),
        Command::Completions { .. } | Command::Version => Ok(()),
    }
}
