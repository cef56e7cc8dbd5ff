//! In-memory content store with the finder methods the front end needs.
//!
//! Loaded once per process from the content database. Finders never
//! fail: unknown ids yield `None` or empty collections, matching the
//! best-effort policy of the publishing front end.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use anyhow::{Result, bail};
use rustc_hash::{FxHashMap, FxHasher};

use super::{
    Article, ContentElement, FeedConfig, FileRef, Id, NewsArchive, NewsItem, Order, Page, User,
};
use crate::utils::date::{DateTimeUtc, Period};

/// All content records, keyed for lookup.
///
/// `BTreeMap` keeps iteration ordered by id so batch output (feeds,
/// sitemap) is deterministic.
#[derive(Debug, Default)]
pub struct ContentStore {
    archives: BTreeMap<Id, NewsArchive>,
    items: BTreeMap<Id, NewsItem>,
    feeds: BTreeMap<Id, FeedConfig>,
    pages: BTreeMap<Id, Page>,
    articles: BTreeMap<Id, Article>,
    users: BTreeMap<Id, User>,
    files: FxHashMap<String, FileRef>,
    elements: BTreeMap<Id, ContentElement>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // insertion (used by the loader and test fixtures)
    // ------------------------------------------------------------------

    pub fn insert_archive(&mut self, archive: NewsArchive) -> Result<()> {
        if self.archives.insert(archive.id, archive).is_some() {
            bail!("duplicate archive id");
        }
        Ok(())
    }

    pub fn insert_item(&mut self, item: NewsItem) -> Result<()> {
        if self.items.insert(item.id, item).is_some() {
            bail!("duplicate news item id");
        }
        Ok(())
    }

    pub fn insert_feed(&mut self, feed: FeedConfig) -> Result<()> {
        if self.feeds.insert(feed.id, feed).is_some() {
            bail!("duplicate feed id");
        }
        Ok(())
    }

    pub fn insert_page(&mut self, page: Page) -> Result<()> {
        if self.pages.insert(page.id, page).is_some() {
            bail!("duplicate page id");
        }
        Ok(())
    }

    pub fn insert_article(&mut self, article: Article) -> Result<()> {
        if self.articles.insert(article.id, article).is_some() {
            bail!("duplicate article id");
        }
        Ok(())
    }

    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.users.insert(user.id, user).is_some() {
            bail!("duplicate user id");
        }
        Ok(())
    }

    pub fn insert_file(&mut self, file: FileRef) -> Result<()> {
        if self.files.insert(file.uuid.clone(), file).is_some() {
            bail!("duplicate file uuid");
        }
        Ok(())
    }

    pub fn insert_element(&mut self, element: ContentElement) -> Result<()> {
        if self.elements.insert(element.id, element).is_some() {
            bail!("duplicate content element id");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // single-record lookup
    // ------------------------------------------------------------------

    pub fn archive(&self, id: Id) -> Option<&NewsArchive> {
        self.archives.get(&id)
    }

    pub fn item(&self, id: Id) -> Option<&NewsItem> {
        self.items.get(&id)
    }

    pub fn feed(&self, id: Id) -> Option<&FeedConfig> {
        self.feeds.get(&id)
    }

    pub fn page(&self, id: Id) -> Option<&Page> {
        self.pages.get(&id)
    }

    pub fn article(&self, id: Id) -> Option<&Article> {
        self.articles.get(&id)
    }

    pub fn user(&self, id: Id) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn file(&self, uuid: &str) -> Option<&FileRef> {
        self.files.get(uuid)
    }

    /// Find a news item by numeric id or alias.
    pub fn item_by_id_or_alias(&self, key: &str) -> Option<&NewsItem> {
        if let Ok(id) = key.parse::<Id>() {
            return self.item(id);
        }
        self.items.values().find(|i| i.alias.as_deref() == Some(key))
    }

    /// Find a feed by numeric id or alias.
    pub fn feed_by_id_or_alias(&self, key: &str) -> Option<&FeedConfig> {
        if let Ok(id) = key.parse::<Id>() {
            return self.feed(id);
        }
        self.feeds.values().find(|f| f.alias.as_deref() == Some(key))
    }

    // ------------------------------------------------------------------
    // collection finders
    // ------------------------------------------------------------------

    pub fn feeds(&self) -> impl Iterator<Item = &FeedConfig> {
        self.feeds.values()
    }

    pub fn archives(&self) -> impl Iterator<Item = &NewsArchive> {
        self.archives.values()
    }

    /// Feeds that include the given archive.
    pub fn feeds_by_archive(&self, archive_id: Id) -> Vec<&FeedConfig> {
        self.feeds
            .values()
            .filter(|f| f.archives.contains(&archive_id))
            .collect()
    }

    /// Published items of the given archives, sorted and windowed.
    ///
    /// `featured`: `Some(true)` = featured only, `Some(false)` = unfeatured
    /// only, `None` = both. `limit = 0` means unlimited.
    pub fn published_by_archives(
        &self,
        archives: &[Id],
        featured: Option<bool>,
        limit: usize,
        offset: usize,
        order: Order,
        now: DateTimeUtc,
    ) -> Vec<&NewsItem> {
        let mut matches: Vec<&NewsItem> = self
            .items
            .values()
            .filter(|i| archives.contains(&i.archive) && i.is_visible(now))
            .filter(|i| featured.is_none_or(|want| i.featured == want))
            .collect();

        sort_items(&mut matches, order);

        let end = if limit > 0 {
            (offset + limit).min(matches.len())
        } else {
            matches.len()
        };
        if offset >= matches.len() {
            return Vec::new();
        }
        matches[offset..end].to_vec()
    }

    /// Count the published items of the given archives.
    pub fn count_published_by_archives(
        &self,
        archives: &[Id],
        featured: Option<bool>,
        now: DateTimeUtc,
    ) -> usize {
        self.items
            .values()
            .filter(|i| archives.contains(&i.archive) && i.is_visible(now))
            .filter(|i| featured.is_none_or(|want| i.featured == want))
            .count()
    }

    /// Published items of the given archives inside a calendar period.
    pub fn published_in_period(
        &self,
        period: Period,
        archives: &[Id],
        order: Order,
        now: DateTimeUtc,
    ) -> Vec<&NewsItem> {
        let mut matches: Vec<&NewsItem> = self
            .items
            .values()
            .filter(|i| archives.contains(&i.archive) && i.is_visible(now))
            .filter(|i| period.contains(i.date))
            .collect();

        sort_items(&mut matches, order);
        matches
    }

    /// Published default-source items of one archive (search/sitemap).
    pub fn published_default_by_archive(&self, archive_id: Id, now: DateTimeUtc) -> Vec<&NewsItem> {
        self.items
            .values()
            .filter(|i| {
                i.archive == archive_id && i.is_visible(now) && i.source == super::Source::Default
            })
            .collect()
    }

    /// Published content elements of an item, in sorting order.
    pub fn content_elements(&self, item_id: Id) -> Vec<&ContentElement> {
        let mut elements: Vec<&ContentElement> = self
            .elements
            .values()
            .filter(|e| e.item == item_id && e.published)
            .collect();
        elements.sort_by_key(|e| (e.sorting, e.id));
        elements
    }
}

/// Sort a result set in place.
fn sort_items(items: &mut [&NewsItem], order: Order) {
    match order {
        Order::DateDesc => items.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id))),
        Order::DateAsc => items.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id))),
        Order::HeadlineAsc => items.sort_by(|a, b| a.headline.cmp(&b.headline)),
        Order::HeadlineDesc => items.sort_by(|a, b| b.headline.cmp(&a.headline)),
        Order::Random => {
            let seed = random_seed();
            items.sort_by_key(|i| {
                let mut hasher = FxHasher::default();
                (i.id ^ seed).hash(&mut hasher);
                hasher.finish()
            });
        }
    }
}

/// Per-call shuffle seed from the system clock.
fn random_seed() -> i64 {
    use std::time::SystemTime;
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as i64 ^ d.as_secs() as i64)
        .unwrap_or(0)
}
