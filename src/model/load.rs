//! Content database loading.
//!
//! The admin side persists records as one JSON document; this loader
//! deserializes it, derives missing aliases and indexes everything into
//! a [`ContentStore`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::{
    Article, ContentElement, ContentStore, FeedConfig, FileRef, NewsArchive, NewsItem, Page, User,
};
use crate::utils::slug::slugify;

/// Raw shape of the content database document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDb {
    archives: Vec<NewsArchive>,
    items: Vec<NewsItem>,
    feeds: Vec<FeedConfig>,
    pages: Vec<Page>,
    articles: Vec<Article>,
    users: Vec<User>,
    files: Vec<FileRef>,
    elements: Vec<ContentElement>,
}

/// Load the content database from a JSON file.
pub fn load_content(path: &Path) -> Result<ContentStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read content database {}", path.display()))?;
    let db: ContentDb = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse content database {}", path.display()))?;
    build_store(db)
}

fn build_store(db: ContentDb) -> Result<ContentStore> {
    let mut store = ContentStore::new();

    for archive in db.archives {
        store.insert_archive(archive)?;
    }
    for page in db.pages {
        store.insert_page(page)?;
    }
    for article in db.articles {
        store.insert_article(article)?;
    }
    for user in db.users {
        store.insert_user(user)?;
    }
    for file in db.files {
        store.insert_file(file)?;
    }
    for element in db.elements {
        store.insert_element(element)?;
    }

    for mut item in db.items {
        item.alias = normalize_alias(item.alias.take(), &item.headline)?;
        store.insert_item(item)?;
    }
    for mut feed in db.feeds {
        feed.alias = normalize_alias(feed.alias.take(), &feed.title)?;
        store.insert_feed(feed)?;
    }

    Ok(store)
}

/// Validate an explicit alias or derive one from the fallback text.
///
/// Numeric-only aliases are rejected: they would shadow id lookup.
/// Returns `None` when no usable alias can be derived (id is used then).
fn normalize_alias(alias: Option<String>, fallback: &str) -> Result<Option<String>> {
    if let Some(alias) = alias {
        if alias.bytes().all(|b| b.is_ascii_digit()) {
            bail!("numeric alias {alias:?} would shadow id lookup");
        }
        return Ok(Some(alias));
    }

    let derived = slugify(fallback);
    if derived.is_empty() || derived.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    Ok(Some(derived))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "archives": [{"id": 1, "title": "Company News", "jump_to": 10}],
        "pages": [{"id": 10, "title": "News", "alias": "news", "published": true}],
        "items": [
            {"id": 1, "archive": 1, "headline": "Hello World", "date": "2024-06-15", "published": true},
            {"id": 2, "archive": 1, "headline": "Über uns", "alias": "about", "date": "2024-06-16", "published": true}
        ],
        "feeds": [{"id": 1, "title": "Company Feed", "archives": [1]}]
    }"#;

    #[test]
    fn test_build_store_derives_aliases() {
        let db: ContentDb = serde_json::from_str(MINIMAL).unwrap();
        let store = build_store(db).unwrap();

        assert_eq!(store.item(1).unwrap().alias.as_deref(), Some("hello-world"));
        assert_eq!(store.item(2).unwrap().alias.as_deref(), Some("about"));
        assert_eq!(store.feed(1).unwrap().feed_name(), "company-feed");
    }

    #[test]
    fn test_numeric_alias_rejected() {
        let json = r#"{
            "items": [{"id": 1, "archive": 1, "headline": "X", "alias": "42", "date": "2024-06-15"}]
        }"#;
        let db: ContentDb = serde_json::from_str(json).unwrap();
        assert!(build_store(db).is_err());
    }

    #[test]
    fn test_unsluggable_headline_keeps_no_alias() {
        let json = r#"{
            "items": [{"id": 1, "archive": 1, "headline": "!!!", "date": "2024-06-15"}]
        }"#;
        let db: ContentDb = serde_json::from_str(json).unwrap();
        let store = build_store(db).unwrap();
        assert_eq!(store.item(1).unwrap().alias, None);
        assert_eq!(store.item(1).unwrap().slug(), "1");
    }

    #[test]
    fn test_load_content_missing_file() {
        let err = load_content(Path::new("/nonexistent/content.json")).unwrap_err();
        assert!(err.to_string().contains("content database"));
    }

    #[test]
    fn test_load_content_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        fs::write(&path, MINIMAL).unwrap();

        let store = load_content(&path).unwrap();
        assert!(store.archive(1).is_some());
        assert!(store.page(10).is_some());
    }
}
