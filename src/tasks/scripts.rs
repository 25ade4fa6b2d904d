//! Task: minify JavaScript into `<name>.min.js`.
use anyhow::Result;
use rayon::prelude::*;
use std::path::PathBuf;

use super::{Context, Task, TaskResult, process_resources, task_deps};
use crate::assets::scripts::{is_generated, minify_script};
use crate::assets::sources::{self, Matched};
use crate::assets::with_banner;
use crate::error::AssetError;
use crate::resources::output::OutputFile;

/// Minify every script source, writing the result next to it.
#[derive(Debug)]
pub struct BuildScripts;

impl Task for BuildScripts {
    fn name(&self) -> &'static str {
        "Build scripts"
    }

    task_deps![super::vendor::CopyVendor];

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let settings = &ctx.config.settings.scripts;
        let sources: Vec<Matched> =
            sources::expand(ctx.root(), &settings.sources, &settings.exclude)?
                .into_iter()
                .filter(|m| !is_generated(&m.path))
                .collect();
        if sources.is_empty() {
            ctx.log
                .info(&format!("no scripts match {}", settings.sources));
            return Ok(TaskResult::Ok);
        }

        let output_dir = settings.output.as_ref().map(|dir| ctx.config.resolve(dir));
        let banner = ctx.config.banner_text();
        let build = |m: Matched| -> Result<OutputFile> {
            let source = std::fs::read(&m.path).map_err(|e| AssetError::Minify {
                path: m.path.clone(),
                message: e.to_string(),
            })?;
            let minified = minify_script(&m.path, &source)?;
            let dest = output_path(&m, output_dir.as_ref());
            Ok(OutputFile::new(dest, with_banner(banner, &minified)))
        };

        let files: Vec<OutputFile> = if ctx.parallel {
            sources.into_par_iter().map(build).collect::<Result<_>>()?
        } else {
            sources.into_iter().map(build).collect::<Result<_>>()?
        };
        process_resources(ctx, files, "write")
    }
}

/// `js/app.js` → `js/app.min.js`, or `<output>/app.min.js` when an output
/// directory is configured.
fn output_path(source: &Matched, output_dir: Option<&PathBuf>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(source.relative.with_extension("min.js")),
        None => source.path.with_extension("min.js"),
    }
}
