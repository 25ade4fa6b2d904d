//! Project configuration: `assetpipe.toml`, `package.json` and the banner.
//!
//! Loaded once per command and shared with every task through `Arc`.
pub mod banner;
pub mod package;
pub mod settings;
pub mod toml_loader;
pub mod validation;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use package::PackageMeta;
use settings::Settings;

/// Name of the pipeline configuration file at the project root.
pub const CONFIG_FILE: &str = "assetpipe.toml";

/// All loaded configuration for one project.
#[derive(Debug)]
pub struct Config {
    /// Project root every relative path is resolved against.
    pub root: PathBuf,
    /// Parsed `assetpipe.toml`, or the stock layout when it is absent.
    pub settings: Settings,
    /// Parsed `package.json`, if present.
    pub package: Option<PackageMeta>,
    /// Rendered banner text, `None` when disabled or without package metadata.
    pub banner: Option<String>,
}

impl Config {
    /// Load `assetpipe.toml` and `package.json` from `root`.
    ///
    /// Both files are optional. The banner is rendered once here so every
    /// generated file in a run carries the same text.
    pub fn load(root: &Path) -> Result<Self> {
        let settings: Settings = toml_loader::load_config(&root.join(CONFIG_FILE))
            .with_context(|| format!("loading {CONFIG_FILE}"))?;
        let package = PackageMeta::load(root)
            .with_context(|| format!("loading {}", package::PACKAGE_FILE))?;
        Ok(Self::from_parts(root.to_path_buf(), settings, package))
    }

    /// Assemble a configuration from already-parsed parts.
    #[must_use]
    pub fn from_parts(root: PathBuf, settings: Settings, package: Option<PackageMeta>) -> Self {
        let banner = match (&package, settings.banner.enabled) {
            (Some(meta), true) => Some(banner::render_now(&settings.banner.template, meta)),
            _ => None,
        };
        Self {
            root,
            settings,
            package,
            banner,
        }
    }

    /// Resolve a project-relative path.
    #[must_use]
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// The vendor output directory.
    #[must_use]
    pub fn vendor_dir(&self) -> PathBuf {
        self.resolve(&self.settings.paths.vendor)
    }

    /// The package install directory.
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.resolve(&self.settings.paths.packages)
    }

    /// Banner text to prepend to generated files, or `""`.
    #[must_use]
    pub fn banner_text(&self) -> &str {
        self.banner.as_deref().unwrap_or_default()
    }

    /// Run all validators and return their warnings.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self)
    }
}
