//! Deployment configuration for the offline cache.
//!
//! Bumping `version` is the only way to invalidate what clients have cached:
//! the next install fills a fresh generation and the following activation
//! purges the old one.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application prefix of the FoodFest deployment
pub const DEFAULT_APP_PREFIX: &str = "FoodFest";

/// Current FoodFest cache version
pub const DEFAULT_VERSION: &str = "version_01";

/// Static files precached at install time. Images are left out to stay well
/// under browser cache limits; HTML shells, styles and bundles are enough for
/// the site to work offline.
pub const DEFAULT_MANIFEST: &[&str] = &[
    "/index.html",
    "/events.html",
    "/tickets.html",
    "/schedule.html",
    "/assets/css/style.css",
    "/assets/css/bootstrap.css",
    "/assets/css/tickets.css",
    "/dist/app.bundle.js",
    "/dist/events.bundle.js",
    "/dist/tickets.bundle.js",
    "/dist/schedule.bundle.js",
];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field is empty
    #[error("cache config field `{0}` must not be empty")]
    Empty(&'static str),
    /// The JSON document could not be parsed
    #[error("invalid cache config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Name of one cache generation, `"<prefix>-<version>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheGeneration(String);

impl CacheGeneration {
    /// Build the identifier for a prefix and version
    pub fn new(prefix: &str, version: &str) -> Self {
        Self(format!("{}-{}", prefix, version))
    }

    /// Get the partition name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for CacheGeneration {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Ordered list of URLs that must be present after install.
///
/// Duplicates are dropped, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AssetManifest(Vec<String>);

impl AssetManifest {
    /// Create a manifest
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for url in urls {
            let url = url.into();
            if !out.contains(&url) {
                out.push(url);
            }
        }
        Self(out)
    }

    /// Iterate over URLs in manifest order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Check whether a URL is listed
    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|u| u == url)
    }

    /// Number of URLs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the manifest is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for AssetManifest {
    fn from(urls: Vec<String>) -> Self {
        Self::new(urls)
    }
}

impl From<AssetManifest> for Vec<String> {
    fn from(manifest: AssetManifest) -> Self {
        manifest.0
    }
}

/// Offline cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Prefix shared by every generation this application owns
    pub app_prefix: String,
    /// Version label of the current generation
    pub version: String,
    /// Files to precache
    pub manifest: AssetManifest,
}

impl CacheConfig {
    /// Create a configuration
    pub fn new(
        app_prefix: impl Into<String>,
        version: impl Into<String>,
        manifest: AssetManifest,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            app_prefix: app_prefix.into(),
            version: version.into(),
            manifest,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app_prefix.is_empty() {
            return Err(ConfigError::Empty("app_prefix"));
        }
        if self.version.is_empty() {
            return Err(ConfigError::Empty("version"));
        }
        Ok(())
    }

    /// Identifier of the current generation
    pub fn generation(&self) -> CacheGeneration {
        CacheGeneration::new(&self.app_prefix, &self.version)
    }

    /// Whether a partition name belongs to this application
    pub fn owns(&self, partition: &str) -> bool {
        partition
            .strip_prefix(self.app_prefix.as_str())
            .map(|rest| rest.starts_with('-'))
            .unwrap_or(false)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            app_prefix: DEFAULT_APP_PREFIX.to_string(),
            version: DEFAULT_VERSION.to_string(),
            manifest: AssetManifest::new(DEFAULT_MANIFEST.iter().copied()),
        }
    }
}
