//! Task: delete the vendor output directory.
use anyhow::Result;
use std::path::{Component, Path, PathBuf};

use super::{Context, Task, TaskResult, process_resources_remove};
use crate::error::TaskError;
use crate::resources::directory::OwnedDirectory;

/// Recursively delete the vendor directory so the copy starts from scratch.
#[derive(Debug)]
pub struct CleanVendor;

impl Task for CleanVendor {
    fn name(&self) -> &'static str {
        "Clean vendor"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let target = clean_target(ctx.root(), &ctx.config.settings.paths.vendor)?;
        process_resources_remove(ctx, [OwnedDirectory::new(target)], "remove")
    }
}

/// Resolve the vendor directory and refuse anything that is not strictly
/// inside `root`.
///
/// The check is lexical: `..` components are folded before comparing, so
/// `vendor/../..` is rejected without touching the file system.
fn clean_target(root: &Path, vendor: &str) -> Result<PathBuf, TaskError> {
    let root = normalize(root);
    let target = normalize(&root.join(vendor));
    if target == root || !target.starts_with(&root) {
        return Err(TaskError::UnsafeCleanTarget { path: target });
    }
    Ok(target)
}

/// Fold `.` and `..` components without consulting the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::config::settings::Settings;
    use crate::tasks::test_helpers::{make_context, make_dry_run_context, write_file};

    fn config_with_vendor(root: &Path, vendor: &str) -> Config {
        let mut settings = Settings::default();
        settings.paths.vendor = vendor.to_string();
        settings.vendor.clear();
        Config::from_parts(root.to_path_buf(), settings, None)
    }

    #[test]
    fn removes_vendor_tree() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "vendor/bootstrap/css/bootstrap.css", "x");
        write_file(dir.path(), "vendor/jquery/jquery.js", "y");
        let ctx = make_context(config_with_vendor(dir.path(), "vendor"));

        let result = CleanVendor.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Ok));
        assert!(!dir.path().join("vendor").exists());
    }

    #[test]
    fn absent_vendor_dir_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = make_context(config_with_vendor(dir.path(), "vendor"));
        assert!(matches!(CleanVendor.run(&ctx).unwrap(), TaskResult::Ok));
        assert!(matches!(CleanVendor.run(&ctx).unwrap(), TaskResult::Ok));
    }

    #[test]
    fn dry_run_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "vendor/jquery/jquery.js", "y");
        let ctx = make_dry_run_context(config_with_vendor(dir.path(), "vendor"));

        let result = CleanVendor.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::DryRun));
        assert!(dir.path().join("vendor/jquery/jquery.js").exists());
    }

    #[test]
    fn refuses_project_root() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "index.html", "<html></html>");
        for vendor in [".", "", "vendor/.."] {
            let ctx = make_context(config_with_vendor(dir.path(), vendor));
            let err = CleanVendor.run(&ctx).unwrap_err();
            assert!(
                err.to_string().contains("refusing to delete"),
                "vendor = {vendor:?}: {err}"
            );
        }
        assert!(dir.path().join("index.html").exists());
    }

    #[test]
    fn refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("site");
        std::fs::create_dir_all(&project).unwrap();
        write_file(dir.path(), "sibling/keep.txt", "keep");

        let ctx = make_context(config_with_vendor(&project, "../sibling"));
        assert!(CleanVendor.run(&ctx).is_err());
        assert!(dir.path().join("sibling/keep.txt").exists());
    }

    #[test]
    fn nested_vendor_dir_is_allowed() {
        let target = clean_target(Path::new("/site"), "static/./lib").unwrap();
        assert_eq!(target, PathBuf::from("/site/static/lib"));
    }

    #[test]
    fn normalize_folds_parent_components() {
        assert_eq!(
            normalize(Path::new("/site/vendor/../css/./x")),
            PathBuf::from("/site/css/x")
        );
    }
}
