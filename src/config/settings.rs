//! Pipeline settings loaded from `assetpipe.toml`.
//!
//! Every field has a default that reproduces the stock project layout
//! (`scss/`, `css/`, `js/`, `vendor/`, `node_modules/`), so the file is
//! optional and usually only overrides a handful of keys.
use serde::Deserialize;

/// Default banner template, interpolated from `package.json` metadata.
pub const DEFAULT_BANNER_TEMPLATE: &str = "/*!\n * Start Bootstrap - {title} v{version} ({homepage})\n * Copyright 2013-{year} {author}\n * Licensed under {license} (https://github.com/BlackrockDigital/{name}/blob/master/LICENSE)\n */\n\n";

/// All settings from `assetpipe.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Shared directories.
    pub paths: PathSettings,
    /// Stylesheet build.
    pub styles: StyleSettings,
    /// Script build.
    pub scripts: ScriptSettings,
    /// Development server.
    pub server: ServerSettings,
    /// License banner.
    pub banner: BannerSettings,
    /// Third-party files copied into the vendor directory.
    pub vendor: Vec<VendorEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            styles: StyleSettings::default(),
            scripts: ScriptSettings::default(),
            server: ServerSettings::default(),
            banner: BannerSettings::default(),
            vendor: default_vendor_entries(),
        }
    }
}

/// Shared directories, relative to the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
    /// Vendor output directory, deleted and rebuilt on every build.
    pub vendor: String,
    /// Package install directory; also an SCSS load path.
    pub packages: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            vendor: "vendor".to_string(),
            packages: "node_modules".to_string(),
        }
    }
}

/// Stylesheet build settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSettings {
    /// Glob selecting SCSS sources.
    pub sources: String,
    /// Output directory for `.css` and `.min.css` files.
    pub output: String,
    /// Browserslist queries used for vendor prefixing.
    pub browsers: Vec<String>,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            sources: "scss/**/*.scss".to_string(),
            output: "css".to_string(),
            browsers: vec!["last 2 versions".to_string()],
        }
    }
}

/// Script build settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptSettings {
    /// Glob selecting JavaScript sources.
    pub sources: String,
    /// Globs removed from the source set.
    pub exclude: Vec<String>,
    /// Output directory; `None` writes next to each source.
    pub output: Option<String>,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            sources: "js/*.js".to_string(),
            exclude: vec!["js/*.min.js".to_string()],
            output: None,
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// License banner settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerSettings {
    /// Whether generated files get the banner.
    pub enabled: bool,
    /// Template with `{name}`-style placeholders.
    pub template: String,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            template: DEFAULT_BANNER_TEMPLATE.to_string(),
        }
    }
}

/// One third-party copy rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorEntry {
    /// Label used in log output.
    pub name: String,
    /// Glob selecting the files to copy.
    pub source: String,
    /// Destination directory relative to `paths.vendor`; empty means the
    /// vendor directory itself. Files keep their path relative to the glob base.
    #[serde(default)]
    pub dest: String,
    /// Globs removed from the matched set.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl VendorEntry {
    fn new(name: &str, source: &str, dest: &str, exclude: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            dest: dest.to_string(),
            exclude: exclude.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The stock vendor list: Bootstrap, Font Awesome, jQuery and jQuery Easing.
#[must_use]
pub fn default_vendor_entries() -> Vec<VendorEntry> {
    vec![
        VendorEntry::new(
            "bootstrap",
            "node_modules/bootstrap/dist/**/*",
            "bootstrap",
            &[],
        ),
        VendorEntry::new("fontawesome", "node_modules/@fortawesome/**/*", "", &[]),
        VendorEntry::new(
            "jquery",
            "node_modules/jquery/dist/*",
            "jquery",
            &["node_modules/jquery/dist/core.js"],
        ),
        VendorEntry::new(
            "jquery-easing",
            "node_modules/jquery.easing/*.js",
            "jquery-easing",
            &[],
        ),
    ]
}
