//! Task: compile SCSS into expanded and minified CSS.
use anyhow::Result;
use rayon::prelude::*;

use super::{Context, Task, TaskResult, process_resources, task_deps};
use crate::assets::sources::{self, Matched};
use crate::assets::styles::{CompiledStyle, StyleCompiler, is_partial};
use crate::assets::with_banner;
use crate::error::AssetError;
use crate::resources::output::OutputFile;

/// Compile every non-partial stylesheet to `<name>.css` and `<name>.min.css`.
#[derive(Debug)]
pub struct BuildStyles;

impl Task for BuildStyles {
    fn name(&self) -> &'static str {
        "Build styles"
    }

    task_deps![super::vendor::CopyVendor];

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let settings = &ctx.config.settings.styles;
        let sources: Vec<Matched> = sources::expand(ctx.root(), &settings.sources, &[])?
            .into_iter()
            .filter(|m| !is_partial(&m.path))
            .collect();
        if sources.is_empty() {
            ctx.log
                .info(&format!("no stylesheets match {}", settings.sources));
            return Ok(TaskResult::Ok);
        }

        let compiler = StyleCompiler::new(vec![ctx.config.packages_dir()], &settings.browsers)?;
        let compiled: Vec<(Matched, CompiledStyle)> = if ctx.parallel {
            sources
                .into_par_iter()
                .map(|m| compile_one(&compiler, m))
                .collect::<Result<_, _>>()?
        } else {
            sources
                .into_iter()
                .map(|m| compile_one(&compiler, m))
                .collect::<Result<_, _>>()?
        };

        let output = ctx.config.resolve(&settings.output);
        let banner = ctx.config.banner_text();
        let files = compiled.into_iter().flat_map(|(m, style)| {
            [
                OutputFile::new(
                    output.join(m.relative.with_extension("css")),
                    with_banner(banner, &style.expanded),
                ),
                OutputFile::new(
                    output.join(m.relative.with_extension("min.css")),
                    with_banner(banner, &style.minified),
                ),
            ]
        });
        process_resources(ctx, files, "write")
    }
}

fn compile_one(
    compiler: &StyleCompiler,
    source: Matched,
) -> Result<(Matched, CompiledStyle), AssetError> {
    let style = compiler.compile(&source.path)?;
    Ok((source, style))
}
