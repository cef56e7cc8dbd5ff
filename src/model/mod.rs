//! Content model: archives, news items, feeds and their neighbors.
//!
//! The records mirror what the admin side persists; this crate only
//! reads them. Everything is loaded once from the content database
//! (JSON) into a [`ContentStore`].

mod load;
mod store;

pub use load::load_content;
pub use store::ContentStore;

use serde::{Deserialize, Serialize};

use crate::utils::date::DateTimeUtc;

/// Record identifier used across all tables.
pub type Id = i64;

/// How a news item links out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Own detail page under the archive's target page.
    #[default]
    Default,
    /// Raw external URL.
    External,
    /// An existing site page.
    Internal,
    /// A linked article on another page.
    Article,
}

/// One news item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Id,
    /// Parent archive.
    pub archive: Id,
    pub headline: String,
    /// Human-readable slug; derived from the headline when absent.
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub teaser: String,
    pub date: DateTimeUtc,
    #[serde(default)]
    pub author: Option<Id>,
    #[serde(default)]
    pub source: Source,
    /// External target URL (`source = external`).
    #[serde(default)]
    pub url: Option<String>,
    /// Internal target page (`source = internal`).
    #[serde(default)]
    pub jump_to: Option<Id>,
    /// Linked article (`source = article`).
    #[serde(default)]
    pub article: Option<Id>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub start: Option<DateTimeUtc>,
    #[serde(default)]
    pub stop: Option<DateTimeUtc>,
    /// Teaser image file reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Additional enclosure file references.
    #[serde(default)]
    pub enclosures: Vec<String>,
    #[serde(default)]
    pub sub_headline: Option<String>,
    #[serde(default)]
    pub css_class: Option<String>,
    /// Open external links in a new window.
    #[serde(default)]
    pub new_window: bool,
    /// Robots directive carried into the sitemap ("noindex,nofollow").
    #[serde(default)]
    pub robots: Option<String>,
}

impl NewsItem {
    /// Alias, falling back to the numeric id.
    pub fn slug(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Published and inside the start/stop window.
    pub fn is_visible(&self, now: DateTimeUtc) -> bool {
        self.published
            && self.start.is_none_or(|start| start <= now)
            && self.stop.is_none_or(|stop| stop > now)
    }

    /// Excluded from search/sitemap output.
    pub fn is_unindexable(&self) -> bool {
        self.robots.as_deref() == Some("noindex,nofollow")
    }
}

/// A named grouping of news items mapped to one target front-end page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArchive {
    pub id: Id,
    pub title: String,
    /// Target page hosting the item detail views.
    #[serde(default)]
    pub jump_to: Option<Id>,
    #[serde(default)]
    pub protected: bool,
    /// Member groups allowed when protected.
    #[serde(default)]
    pub groups: Vec<Id>,
}

/// Output format of a generated feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// RSS 2.0 format (default).
    #[default]
    Rss,
    /// Atom 1.0 format.
    Atom,
}

/// What goes into a feed entry's description.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Teaser text only (default).
    #[default]
    Teaser,
    /// Full concatenated content-element output.
    Full,
}

/// Configuration of one generated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub id: Id,
    /// Output file stem; derived from the title when absent.
    #[serde(default)]
    pub alias: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub format: FeedFormat,
    /// Source archives.
    #[serde(default)]
    pub archives: Vec<Id>,
    /// Entry cap; 0 = unlimited.
    #[serde(default)]
    pub max_items: usize,
    /// Base URL override for entry links and enclosures.
    #[serde(default)]
    pub feed_base: Option<String>,
    #[serde(default)]
    pub source: FeedSource,
    /// Last configuration change, used as the channel publication date.
    #[serde(default)]
    pub updated: Option<DateTimeUtc>,
}

impl FeedConfig {
    /// Output file stem: alias, or `news<id>` when no alias is set.
    pub fn feed_name(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| format!("news{}", self.id))
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// A front-end site page (reduced to what URL generation needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: Id,
    pub title: String,
    /// Site path of the page ("news", "press/releases").
    pub alias: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub start: Option<DateTimeUtc>,
    #[serde(default)]
    pub stop: Option<DateTimeUtc>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub robots: Option<String>,
}

impl Page {
    /// Site-relative front-end path (with trailing slash).
    pub fn path(&self) -> crate::core::UrlPath {
        crate::core::UrlPath::from_page(&self.alias)
    }

    /// Published and inside the start/stop window.
    pub fn is_published(&self, now: DateTimeUtc) -> bool {
        self.published
            && self.start.is_none_or(|start| start <= now)
            && self.stop.is_none_or(|stop| stop > now)
    }

    /// Excluded from search/sitemap output.
    pub fn is_unindexable(&self) -> bool {
        self.robots.as_deref() == Some("noindex,nofollow")
    }
}

/// A standalone article referenced by `source = article` items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Id,
    #[serde(default)]
    pub alias: Option<String>,
    /// Hosting page.
    pub page: Id,
    #[serde(default)]
    pub published: bool,
}

impl Article {
    pub fn slug(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// A back-end user referenced as item author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A managed file, addressed by UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    pub uuid: String,
    /// Web-root-relative path.
    pub path: String,
}

/// A rendered content element belonging to a news item's body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentElement {
    pub id: Id,
    /// Owning news item.
    pub item: Id,
    #[serde(default)]
    pub sorting: i32,
    #[serde(default)]
    pub published: bool,
    /// Pre-rendered HTML fragment.
    pub html: String,
}

/// Sort order for list/archive module queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    DateDesc,
    DateAsc,
    HeadlineAsc,
    HeadlineDesc,
    Random,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_slug_falls_back_to_id() {
        let json = r#"{"id": 7, "archive": 1, "headline": "X", "date": "2024-06-15"}"#;
        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.slug(), "7");
        assert_eq!(item.source, Source::Default);
        assert!(!item.published);
    }

    #[test]
    fn test_item_visibility_window() {
        let json = r#"{
            "id": 1, "archive": 1, "headline": "X", "date": "2024-06-15",
            "published": true, "start": "2024-06-01", "stop": "2024-07-01"
        }"#;
        let item: NewsItem = serde_json::from_str(json).unwrap();

        let inside = DateTimeUtc::from_ymd(2024, 6, 20);
        let before = DateTimeUtc::from_ymd(2024, 5, 1);
        let after = DateTimeUtc::from_ymd(2024, 7, 1);
        assert!(item.is_visible(inside));
        assert!(!item.is_visible(before));
        assert!(!item.is_visible(after)); // stop boundary is exclusive
    }

    #[test]
    fn test_feed_name() {
        let json = r#"{"id": 3, "title": "Press", "archives": [1]}"#;
        let feed: FeedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(feed.feed_name(), "news3");
        assert_eq!(feed.format, FeedFormat::Rss);
        assert_eq!(feed.source, FeedSource::Teaser);
        assert_eq!(feed.language, "en");
    }

    #[test]
    fn test_source_deserialize() {
        let source: Source = serde_json::from_str(r#""external""#).unwrap();
        assert_eq!(source, Source::External);
        let source: Source = serde_json::from_str(r#""article""#).unwrap();
        assert_eq!(source, Source::Article);
    }

    #[test]
    fn test_page_path() {
        let json = r#"{"id": 1, "title": "News", "alias": "news", "published": true}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.path(), "/news/");
    }

    #[test]
    fn test_order_deserialize() {
        let order: Order = serde_json::from_str(r#""headline_asc""#).unwrap();
        assert_eq!(order, Order::HeadlineAsc);
    }
}
