//! Site configuration for the ezserve dev server.
//!
//! Parses the site's `_config.yml` with serde_yaml. A missing or empty
//! configuration file is not an error: every field has a default, so the
//! server always starts with a usable configuration.

use std::path::Path;

use serde::Deserialize;

/// Configuration filename, resolved against the site root.
pub const CONFIG_FILENAME: &str = "_config.yml";

/// Bundled web-components script path inside `components` URLs.
pub const BUNDLED_COMPONENTS_SCRIPT: &str = "/juncture/wc/dist/js/index.js";

/// Dev-server entry point that replaces bundled script references when
/// local component development is active.
pub const LOCAL_COMPONENTS_URL: &str = "http://localhost:5173/src/main.ts";

/// Site configuration loaded once at startup; immutable afterwards.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site rendering mode.
    pub mode: String,
    /// Site title, used in the SEO block.
    pub title: String,
    /// Site description, used in the SEO block.
    pub description: String,
    /// Canonical site URL.
    pub url: String,
    /// Source repository coordinates.
    pub github: GithubConfig,
    /// Web-components script URL injected into the layout.
    pub components: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            mode: "default".to_owned(),
            title: "Juncture".to_owned(),
            description: String::new(),
            url: String::new(),
            github: GithubConfig::default(),
            components: String::new(),
        }
    }
}

/// Source repository coordinates (`github` section).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl SiteConfig {
    /// Load configuration from `<root>/_config.yml`.
    ///
    /// A missing or empty file yields the default configuration. When
    /// `local_components` is set, bundled web-components script
    /// references inside `components` are rewritten to the local dev
    /// server so component changes are picked up live.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path, local_components: bool) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILENAME);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Self::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            tracing::debug!(path = %path.display(), "no site configuration file, using defaults");
            Self::default()
        };

        if local_components {
            config.components = config
                .components
                .replace(BUNDLED_COMPONENTS_SCRIPT, LOCAL_COMPONENTS_URL);
        }

        Ok(config)
    }
}
