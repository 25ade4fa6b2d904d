//! Load-time configuration checks that produce warnings, not errors.
use std::path::{Component, Path};

use super::Config;
use super::settings::VendorEntry;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "assetpipe.toml", "package.json").
    pub source: String,
    /// The specific item or section that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item` in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
///
/// Implementations check one slice of the configuration for problems that
/// do not prevent loading but will surprise the user at build time.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, root: &Path) -> Vec<ValidationWarning>;
}

/// Validator for vendor copy rules.
#[derive(Debug)]
pub struct VendorValidator<'a> {
    entries: &'a [VendorEntry],
}

impl<'a> VendorValidator<'a> {
    /// Validate `entries`.
    #[must_use]
    pub const fn new(entries: &'a [VendorEntry]) -> Self {
        Self { entries }
    }
}

impl ConfigValidator for VendorValidator<'_> {
    fn validate(&self, _root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for entry in self.entries {
            if !seen.insert(entry.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "assetpipe.toml",
                    &entry.name,
                    "duplicate vendor entry name",
                ));
            }
            if entry.source.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    "assetpipe.toml",
                    &entry.name,
                    "vendor source pattern is empty",
                ));
            }
            if escapes_root(&entry.dest) {
                warnings.push(ValidationWarning::new(
                    "assetpipe.toml",
                    &entry.name,
                    format!("destination escapes the vendor directory: {}", entry.dest),
                ));
            }
        }

        warnings
    }
}

/// Validator for the banner configuration.
#[derive(Debug)]
pub struct BannerValidator<'a> {
    config: &'a Config,
}

impl<'a> BannerValidator<'a> {
    /// Validate the banner settings of `config`.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl ConfigValidator for BannerValidator<'_> {
    fn validate(&self, _root: &Path) -> Vec<ValidationWarning> {
        let settings = &self.config.settings.banner;
        if settings.enabled && self.config.package.is_none() {
            return vec![ValidationWarning::new(
                "package.json",
                "banner",
                "banner is enabled but package.json was not found; banner disabled",
            )];
        }
        Vec::new()
    }
}

/// Validator for directory settings.
#[derive(Debug)]
pub struct PathValidator<'a> {
    config: &'a Config,
}

impl<'a> PathValidator<'a> {
    /// Validate the directory settings of `config`.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl ConfigValidator for PathValidator<'_> {
    fn validate(&self, root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let paths = &self.config.settings.paths;

        if paths.vendor.trim().is_empty() || escapes_root(&paths.vendor) {
            warnings.push(ValidationWarning::new(
                "assetpipe.toml",
                "paths.vendor",
                format!(
                    "vendor directory must be a sub-directory of the project: {:?}",
                    paths.vendor
                ),
            ));
        }

        if !root.join(&paths.packages).is_dir() && !self.config.settings.vendor.is_empty() {
            warnings.push(ValidationWarning::new(
                "assetpipe.toml",
                "paths.packages",
                format!(
                    "package directory does not exist: {} (run your package manager install first)",
                    root.join(&paths.packages).display()
                ),
            ));
        }

        if self.config.settings.server.port == 0 {
            warnings.push(ValidationWarning::new(
                "assetpipe.toml",
                "server.port",
                "port 0 binds a random port",
            ));
        }

        warnings
    }
}

/// `true` when `path` is absolute or climbs out of its base with `..`.
pub(crate) fn escapes_root(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_absolute() {
        return true;
    }
    let mut depth = 0i32;
    for component in path.components() {
        match component {
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            Component::Normal(_) => depth += 1,
            _ => {}
        }
    }
    false
}

/// Run every validator against `config`.
#[must_use]
pub fn validate_all(config: &Config) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator + '_>> = vec![
        Box::new(PathValidator::new(config)),
        Box::new(VendorValidator::new(&config.settings.vendor)),
        Box::new(BannerValidator::new(config)),
    ];
    validators
        .iter()
        .flat_map(|v| v.validate(&config.root))
        .collect()
}
