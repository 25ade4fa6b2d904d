//! `package.json` metadata used to render the license banner.
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the package manifest at the project root.
pub const PACKAGE_FILE: &str = "package.json";

/// The subset of `package.json` the banner needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackageMeta {
    /// Package name (used in the license URL).
    pub name: String,
    /// Display title; falls back to `name` when absent.
    pub title: Option<String>,
    /// Package version.
    pub version: String,
    /// Package author.
    pub author: Option<Author>,
    /// SPDX license identifier.
    pub license: String,
    /// Project homepage.
    pub homepage: String,
}

/// `author` may be a plain string or a person object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// `"author": "Start Bootstrap"`
    Name(String),
    /// `"author": { "name": "...", "email": "..." }`
    Person {
        /// Author name.
        name: String,
    },
}

impl PackageMeta {
    /// Read `package.json` from `root`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not
    /// valid JSON.
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = root.join(PACKAGE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigError::InvalidSyntax {
                path,
                message: e.to_string(),
            })
    }

    /// Display title, falling back to the package name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Author name, or an empty string.
    #[must_use]
    pub fn author_name(&self) -> &str {
        match &self.author {
            Some(Author::Name(name) | Author::Person { name }) => name,
            None => "",
        }
    }
}
