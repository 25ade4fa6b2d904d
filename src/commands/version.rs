//! Command: print version information.

/// The build version stamped by the build script: the release version, a
/// `git describe` string, or `dev-<package version>`.
///
/// The log file banner and `assetpipe version` both read this.
#[must_use]
pub const fn version() -> &'static str {
    env!("ASSETPIPE_VERSION")
}

/// Print the version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("assetpipe {}", version());
}
