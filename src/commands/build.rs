//! Commands that run a fixed selection of build tasks once.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::{Log as _, Logger};
use crate::tasks::{Task, clean, scripts, styles, vendor};

use super::{CommandSetup, run_tasks_to_completion};

/// Which part of the pipeline to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Clean, vendor copy, styles and scripts.
    All,
    /// Clean and vendor copy.
    Vendor,
    /// Styles only.
    Styles,
    /// Scripts only.
    Scripts,
    /// Clean only.
    Clean,
}

impl Target {
    /// The tasks this target runs.
    ///
    /// Dependencies outside the returned list are ignored by the scheduler,
    /// so `Styles` builds without cleaning the vendor directory first.
    #[must_use]
    pub fn tasks(self) -> Vec<Box<dyn Task>> {
        match self {
            Self::All => crate::tasks::all_build_tasks(),
            Self::Vendor => vec![Box::new(clean::CleanVendor), Box::new(vendor::CopyVendor)],
            Self::Styles => vec![Box::new(styles::BuildStyles)],
            Self::Scripts => vec![Box::new(scripts::BuildScripts)],
            Self::Clean => vec![Box::new(clean::CleanVendor)],
        }
    }
}

/// Run the selected part of the pipeline.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, target: Target, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("assetpipe {}", super::version::version()));
    let setup = CommandSetup::init(global, log)?;
    let ctx = setup.context(global, log);

    let all_tasks = target.tasks();
    let tasks: Vec<&dyn Task> = all_tasks.iter().map(AsRef::as_ref).collect();
    run_tasks_to_completion(&tasks, &ctx, log)
}
