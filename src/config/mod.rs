//! Site configuration management for `gazette.toml`.
//!
//! # Sections
//!
//! | Section   | Purpose                                            |
//! |-----------|----------------------------------------------------|
//! | `[site]`  | Site metadata (title, url, language)               |
//! | `[news]`  | Item URL layout (`auto_item`), feed output dir     |
//! | `[paths]` | Web root and content database locations            |

mod error;
mod handle;
pub mod section;

pub use error::ConfigError;
pub use handle::{cfg, init_config};
pub use section::{NewsOptions, PathsConfig, SiteInfo};

use crate::{cli::Cli, log};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing gazette.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteInfo,

    /// News URL layout and feed output settings
    #[serde(default)]
    pub news: NewsOptions,

    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project
    /// root is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = match find_config_file(&cli.config) {
            Some(path) => path,
            None => bail!(
                "config file '{}' not found in the current directory or any parent",
                cli.config.display()
            ),
        };

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:", path.display());
            for field in &ignored {
                eprintln!("- {}", field);
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Resolve the root directory and normalize paths against it.
    fn finalize(&mut self) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.paths.web_dir = root.join(&self.paths.web_dir);
        self.paths.content = root.join(&self.paths.content);
        self.root = root;
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            bail!(ConfigError::Validation("site.title must not be empty".into()));
        }

        if let Some(base) = &self.site.url
            && url::Url::parse(base).is_err()
        {
            bail!(ConfigError::Validation(format!(
                "site.url is not a valid URL: {base:?}"
            )));
        }

        if self.news.share_dir.contains(['/', '\\']) {
            bail!(ConfigError::Validation(
                "news.share_dir must be a plain directory name".into(),
            ));
        }

        if !self.paths.content.exists() {
            bail!(ConfigError::Validation(format!(
                "content database not found: {}",
                self.paths.content.display()
            )));
        }

        Ok(())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving generated feed files (`<web_dir>/<share_dir>`).
    pub fn share_dir(&self) -> PathBuf {
        self.paths.web_dir.join(&self.news.share_dir)
    }

    /// Output path of a feed file by its name stem.
    pub fn feed_path(&self, feed_name: &str) -> PathBuf {
        self.share_dir().join(format!("{feed_name}.xml"))
    }

    /// Public URL prefix of the share directory under a base URL.
    pub fn share_url(&self, base: &str) -> String {
        format!("{}/{}/", base.trim_end_matches('/'), self.news.share_dir)
    }
}

/// Search upward from the current directory for the config file.
fn find_config_file(name: &Path) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("[site]\ntitle = \"Test\"\ndescription = \"Test\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
