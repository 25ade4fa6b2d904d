//! Integration tests for the build commands.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use assetpipe_cli::commands::build::{self, Target};
use assetpipe_cli::logging::TaskStatus;
use common::{IntegrationTestContext, TestContextBuilder};

#[test]
fn full_build_produces_every_output() {
    let ctx = IntegrationTestContext::new();
    let log = ctx.logger();

    build::run(&ctx.global(true), Target::All, &log).unwrap();

    for rel in [
        "vendor/bootstrap/css/bootstrap.css",
        "vendor/bootstrap/js/bootstrap.js",
        "vendor/jquery/jquery.js",
        "vendor/jquery-easing/jquery.easing.js",
        "vendor/fontawesome-free/css/all.css",
        "css/agency.css",
        "css/agency.min.css",
        "js/agency.min.js",
    ] {
        assert!(ctx.path(rel).is_file(), "missing {rel}");
    }
    assert!(!ctx.path("vendor/jquery/core.js").exists());
    assert!(!ctx.path("css/_variables.css").exists());
    assert!(log.task_entries().iter().all(|e| e.status == TaskStatus::Ok));
}

#[test]
fn outputs_start_with_the_banner() {
    let ctx = IntegrationTestContext::new();
    build::run(&ctx.global(false), Target::All, &ctx.logger()).unwrap();

    for rel in ["css/agency.css", "css/agency.min.css", "js/agency.min.js"] {
        let out = ctx.read(rel);
        assert!(
            out.starts_with("/*!\n * Start Bootstrap - Agency v5.0.6"),
            "{rel}: {out}"
        );
    }
    assert!(ctx.read("css/agency.css").contains("#fed136"));
}

#[test]
fn vendor_files_are_copied_verbatim() {
    let ctx = IntegrationTestContext::new();
    build::run(&ctx.global(true), Target::Vendor, &ctx.logger()).unwrap();

    assert_eq!(ctx.read("vendor/jquery/jquery.js"), "var jQuery = {};\n");
    assert!(!ctx.path("css").exists());
}

#[test]
fn rebuild_is_byte_identical_and_leaves_outputs_alone() {
    let ctx = IntegrationTestContext::new();
    build::run(&ctx.global(true), Target::All, &ctx.logger()).unwrap();
    let first_css = ctx.read("css/agency.min.css");
    let first_js = ctx.read("js/agency.min.js");
    let mtime = std::fs::metadata(ctx.path("css/agency.min.css"))
        .unwrap()
        .modified()
        .unwrap();

    build::run(&ctx.global(true), Target::All, &ctx.logger()).unwrap();

    assert_eq!(ctx.read("css/agency.min.css"), first_css);
    assert_eq!(ctx.read("js/agency.min.js"), first_js);
    let again = std::fs::metadata(ctx.path("css/agency.min.css"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(mtime, again);
}

#[test]
fn minified_scripts_are_not_inputs() {
    let ctx = IntegrationTestContext::new();
    build::run(&ctx.global(false), Target::Scripts, &ctx.logger()).unwrap();
    build::run(&ctx.global(false), Target::Scripts, &ctx.logger()).unwrap();

    assert!(ctx.path("js/agency.min.js").is_file());
    assert!(!ctx.path("js/agency.min.min.js").exists());
}

#[test]
fn clean_removes_stale_vendor_files() {
    let ctx = TestContextBuilder::new()
        .with_file("vendor/stale/old.js", "var old;\n")
        .build();

    build::run(&ctx.global(true), Target::Vendor, &ctx.logger()).unwrap();

    assert!(!ctx.path("vendor/stale").exists());
    assert!(ctx.path("vendor/jquery/jquery.js").is_file());
}

#[test]
fn vendor_copies_follow_the_configured_vendor_dir() {
    let ctx = TestContextBuilder::new()
        .with_config("[paths]\nvendor = \"static/vendor\"\n")
        .with_file("static/vendor/stale/old.js", "var old;\n")
        .build();

    build::run(&ctx.global(true), Target::Vendor, &ctx.logger()).unwrap();

    assert!(!ctx.path("static/vendor/stale").exists());
    assert!(ctx.path("static/vendor/jquery/jquery.js").is_file());
    assert!(ctx.path("static/vendor/bootstrap/css/bootstrap.css").is_file());
    assert!(ctx.path("static/vendor/fontawesome-free/css/all.css").is_file());
    assert!(!ctx.path("vendor").exists());
}

#[test]
fn missing_package_json_builds_without_banner() {
    let ctx = TestContextBuilder::new().without_file("package.json").build();
    build::run(&ctx.global(true), Target::Styles, &ctx.logger()).unwrap();

    let css = ctx.read("css/agency.css");
    assert!(!css.starts_with("/*!"), "{css}");
}

#[test]
fn unsafe_vendor_dir_fails_and_skips_dependents() {
    let ctx = TestContextBuilder::new()
        .with_config("[paths]\nvendor = \"..\"\n")
        .build();
    let log = ctx.logger();

    let err = build::run(&ctx.global(false), Target::All, &log).unwrap_err();
    assert!(err.to_string().contains("failed"), "{err}");

    let entries = log.task_entries();
    let status = |name: &str| {
        entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.status)
            .unwrap()
    };
    assert_eq!(status("Clean vendor"), TaskStatus::Failed);
    assert_eq!(status("Copy vendor"), TaskStatus::Skipped);
    assert_eq!(status("Build styles"), TaskStatus::Skipped);
    assert_eq!(status("Build scripts"), TaskStatus::Skipped);
    assert!(ctx.root_path().exists());
    assert!(!ctx.path("css").exists());
}

#[test]
fn compile_error_fails_the_build() {
    let ctx = TestContextBuilder::new()
        .with_file("scss/broken.scss", ".a { color: red;\n")
        .build();
    let log = ctx.logger();

    assert!(build::run(&ctx.global(true), Target::Styles, &log).is_err());
    let failed = log
        .task_entries()
        .into_iter()
        .find(|e| e.status == TaskStatus::Failed)
        .unwrap();
    assert!(failed.message.unwrap_or_default().contains("broken.scss"));
}

#[test]
fn navbar_script_with_if_else_minifies() {
    let ctx = IntegrationTestContext::new();
    let log = ctx.logger();
    build::run(&ctx.global(true), Target::Scripts, &log).unwrap();

    let out = ctx.read("js/agency.min.js");
    assert!(out.contains("navbar-shrink"), "{out}");
    assert!(out.contains("removeClass"), "{out}");
    assert!(!out.contains("\n    "), "still indented: {out}");
    assert_eq!(log.task_entries()[0].status, TaskStatus::Ok);
}

#[test]
fn script_error_is_a_failed_task_not_a_crash() {
    let ctx = TestContextBuilder::new()
        .with_file("js/broken.js", "function (( {\n")
        .build();
    let log = ctx.logger();

    assert!(build::run(&ctx.global(true), Target::All, &log).is_err());

    let scripts = log
        .task_entries()
        .into_iter()
        .find(|e| e.name == "Build scripts")
        .expect("scripts recorded");
    assert_eq!(scripts.status, TaskStatus::Failed);
    assert!(scripts.message.unwrap_or_default().contains("broken.js"));
    assert!(ctx.path("css/agency.min.css").is_file());
}
