//! `[site]` section: site metadata used by feeds and absolute URLs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Site title (feed channel fallback title).
    pub title: String,
    pub description: String,
    /// Canonical base URL (`https://example.org`). Absolute links and
    /// feed entry links are joined onto this.
    pub url: Option<String>,
    /// Feed channel language.
    pub language: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            url: None,
            language: "en".to_string(),
        }
    }
}

impl SiteInfo {
    /// Base URL without a trailing slash; empty when unset.
    pub fn base_url(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }
}
