//! One resource at a time: compare, then write or delete.

use anyhow::Result;

use super::TaskStats;
use crate::resources::{Resource, ResourceState};
use crate::tasks::Context;

/// Bring one resource up to date, returning its contribution to the stats.
pub(super) fn sync_one<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<TaskStats> {
    let label = resource.label();
    let mut delta = TaskStats::new();
    match resource.state()? {
        ResourceState::UpToDate => {
            ctx.log.debug(&format!("up to date: {label}"));
            delta.up_to_date += 1;
        }
        ResourceState::Blocked { reason } => {
            ctx.log.warn(&format!("cannot {verb} {label}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing | ResourceState::Stale if ctx.dry_run => {
            ctx.log.dry_run(&format!("would {verb} {label}"));
            delta.updated += 1;
        }
        ResourceState::Missing | ResourceState::Stale => {
            resource.apply()?;
            ctx.log.debug(&format!("{verb}: {label}"));
            delta.updated += 1;
        }
    }
    Ok(delta)
}

/// Delete one resource if anything exists at its target.
pub(super) fn remove_one<R: Resource>(
    ctx: &Context,
    resource: &R,
    verb: &str,
) -> Result<TaskStats> {
    let label = resource.label();
    let mut delta = TaskStats::new();
    if resource.state()? == ResourceState::Missing {
        delta.up_to_date += 1;
    } else if ctx.dry_run {
        ctx.log.dry_run(&format!("would {verb} {label}"));
        delta.updated += 1;
    } else {
        resource.remove()?;
        ctx.log.debug(&format!("{verb}: {label}"));
        delta.updated += 1;
    }
    Ok(delta)
}
