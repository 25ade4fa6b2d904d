//! Shared helpers for integration tests.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use assetpipe_cli::cli::GlobalOpts;
use assetpipe_cli::logging::Logger;

/// `package.json` of the fixture site.
pub const PACKAGE_JSON: &str = r#"{
  "title": "Agency",
  "name": "startbootstrap-agency",
  "version": "5.0.6",
  "homepage": "https://startbootstrap.com/template-overviews/agency",
  "author": "Start Bootstrap",
  "license": "MIT"
}"#;

/// The Agency theme's navbar script: an `if`/`else` inside a function
/// expression inside an IIFE.
pub const AGENCY_JS: &str = r"(function($) {
  'use strict';

  var navbarCollapse = function() {
    if ($('#mainNav').offset().top > 100) {
      $('#mainNav').addClass('navbar-shrink');
    } else {
      $('#mainNav').removeClass('navbar-shrink');
    }
  };
  navbarCollapse();
  $(window).scroll(navbarCollapse);
})(jQuery);
";

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, contents).expect("write fixture file");
}

/// Populate `root` with a small site using the stock layout:
///
/// - `package.json` with banner metadata
/// - `scss/agency.scss` importing `scss/_variables.scss`
/// - `js/agency.js`
/// - `node_modules/` holding the packages the stock vendor list copies
/// - `index.html`
fn setup_minimal_site(root: &Path) {
    write(root, "package.json", PACKAGE_JSON);
    write(root, "scss/_variables.scss", "$primary: #fed136;\n");
    write(
        root,
        "scss/agency.scss",
        "@import 'variables';\n\n.btn-primary {\n  color: $primary;\n  user-select: none;\n}\n",
    );
    write(root, "js/agency.js", AGENCY_JS);
    write(root, "node_modules/bootstrap/dist/css/bootstrap.css", ".row{display:flex}\n");
    write(root, "node_modules/bootstrap/dist/js/bootstrap.js", "var bootstrap = {};\n");
    write(root, "node_modules/jquery/dist/jquery.js", "var jQuery = {};\n");
    write(root, "node_modules/jquery/dist/core.js", "var core = {};\n");
    write(root, "node_modules/jquery.easing/jquery.easing.js", "var easing = {};\n");
    write(
        root,
        "node_modules/@fortawesome/fontawesome-free/css/all.css",
        ".fa{display:inline-block}\n",
    );
    write(root, "index.html", "<html><body><h1>Agency</h1></body></html>\n");
}

/// An isolated test project backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context holding the minimal site.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_minimal_site(root.path());
        Self { root }
    }

    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `rel` inside the project.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Read `rel` as UTF-8.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read output file")
    }

    /// Global options pointing at this project.
    pub fn global(&self, parallel: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run: false,
            root: Some(self.root.path().to_path_buf()),
            parallel,
        }
    }

    /// A fresh logger.
    pub fn logger(&self) -> Arc<Logger> {
        Arc::new(Logger::new("test"))
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by the minimal site.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `assetpipe.toml`.
    pub fn with_config(self, content: &str) -> Self {
        write(self.ctx.root.path(), "assetpipe.toml", content);
        self
    }

    /// Write an extra project file.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        write(self.ctx.root.path(), rel, content);
        self
    }

    /// Remove a file written by the minimal site.
    pub fn without_file(self, rel: &str) -> Self {
        std::fs::remove_file(self.ctx.root.path().join(rel)).expect("remove fixture file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
