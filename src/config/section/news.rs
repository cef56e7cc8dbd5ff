//! `[news]` section: item URL layout and feed output location.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsOptions {
    /// Item detail URLs directly under the archive page (`/news/<alias>/`)
    /// instead of the `/news/items/<alias>/` form.
    pub auto_item: bool,
    /// Directory under the web root receiving generated feed files.
    pub share_dir: String,
}

impl Default for NewsOptions {
    fn default() -> Self {
        Self {
            auto_item: true,
            share_dir: "share".to_string(),
        }
    }
}
