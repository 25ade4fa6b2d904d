//! Stamps `ASSETPIPE_VERSION` into the binary.
//!
//! Release builds pass the variable in; a git checkout uses `git describe`;
//! anything else (a crates.io tarball, a copy without `.git`) gets
//! `dev-<package version>`.
use std::env;
use std::process::Command;

fn main() {
    let version = env::var("ASSETPIPE_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| format!("dev-{}", env!("CARGO_PKG_VERSION")));
    println!("cargo:rustc-env=ASSETPIPE_VERSION={version}");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=ASSETPIPE_VERSION");
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}
