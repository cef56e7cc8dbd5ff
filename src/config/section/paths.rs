//! `[paths]` section: filesystem locations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Web root directory receiving generated artifacts.
    pub web_dir: PathBuf,
    /// Content database file.
    pub content: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            web_dir: "public".into(),
            content: "content.json".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.web_dir, PathBuf::from("public"));
        assert_eq!(config.paths.content, PathBuf::from("content.json"));
    }

    #[test]
    fn test_custom() {
        let config = test_parse_config("[paths]\nweb_dir = \"www\"\ncontent = \"db/news.json\"");
        assert_eq!(config.paths.web_dir, PathBuf::from("www"));
        assert_eq!(config.paths.content, PathBuf::from("db/news.json"));
    }
}
