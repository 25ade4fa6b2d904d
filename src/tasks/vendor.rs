//! Task: copy third-party package files into the vendor directory.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats, collect_stats, task_deps};
use crate::assets::sources;
use crate::config::validation::escapes_root;
use crate::resources::copy::CopiedFile;

/// Copy every configured vendor entry verbatim.
#[derive(Debug)]
pub struct CopyVendor;

impl Task for CopyVendor {
    fn name(&self) -> &'static str {
        "Copy vendor"
    }

    task_deps![super::clean::CleanVendor];

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.settings.vendor.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let root = ctx.root();
        let vendor_dir = ctx.vendor_dir();
        let mut files = Vec::new();
        let mut stats = TaskStats::new();

        for entry in &ctx.config.settings.vendor {
            if escapes_root(&entry.dest) {
                anyhow::bail!(
                    "vendor entry '{}' writes outside the vendor directory: {}",
                    entry.name,
                    entry.dest
                );
            }
            let matched = sources::expand(root, &entry.source, &entry.exclude)?;
            if matched.is_empty() {
                ctx.log.warn(&format!(
                    "vendor entry '{}' matched no files: {}",
                    entry.name, entry.source
                ));
                stats.skipped += 1;
                continue;
            }
            ctx.log
                .debug(&format!("{}: {} files", entry.name, matched.len()));
            let dest = vendor_dir.join(&entry.dest);
            files.extend(
                matched
                    .into_iter()
                    .map(|m| CopiedFile::new(m.path, dest.join(m.relative))),
            );
        }

        stats += collect_stats(ctx, files, "copy")?;
        Ok(stats.finish(ctx))
    }
}
