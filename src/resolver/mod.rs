//! Canonical news item URL resolution.
//!
//! A news item's effective URL is a pure function of its source variant
//! and associated target; only the default variant additionally depends
//! on the requesting month selector (archive pagination continuity).
//! Results are memoized for the process lifetime, keyed by the full
//! input tuple `(item, absolute, month)` so month variants never poison
//! each other.
//!
//! Resolution never fails: every missing target degrades to a
//! best-effort URL, down to the raw request URI.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::SiteConfig;
use crate::core::{LinkKind, Request, UrlPath};
use crate::debug;
use crate::model::{ContentStore, Id, NewsItem, Page, Source};
use crate::utils::html::{ampersand, encode_email};

/// Process-lifetime URL resolver over one content store.
pub struct UrlResolver<'a> {
    store: &'a ContentStore,
    config: &'a SiteConfig,
    cache: RwLock<FxHashMap<CacheKey, String>>,
}

/// Full memoization key: the month context participates, unlike the
/// item id alone, so archive-scoped variants stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    item: Id,
    absolute: bool,
    month: Option<String>,
}

impl<'a> UrlResolver<'a> {
    pub fn new(store: &'a ContentStore, config: &'a SiteConfig) -> Self {
        Self {
            store,
            config,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Resolve the front-end URL of a news item.
    ///
    /// `add_archive` appends the current month selector as a query
    /// parameter (default-source items only), keeping archive pagination
    /// context across detail links.
    pub fn resolve(
        &self,
        item: &NewsItem,
        absolute: bool,
        add_archive: bool,
        request: &Request,
    ) -> String {
        let month = if add_archive {
            request.month().map(str::to_string)
        } else {
            None
        };

        let key = CacheKey {
            item: item.id,
            absolute,
            month,
        };

        if let Some(cached) = self.cache.read().get(&key) {
            return cached.clone();
        }

        debug!("resolve"; "cache miss for item {} (absolute: {})", item.id, absolute);
        let url = self.compute(item, absolute, key.month.as_deref(), request);
        self.cache
            .write()
            .insert(key, url.clone());
        url
    }

    fn compute(
        &self,
        item: &NewsItem,
        absolute: bool,
        month: Option<&str>,
        request: &Request,
    ) -> String {
        match item.source {
            // Link to an external page
            Source::External => {
                let target = item.url.as_deref().unwrap_or_default();
                if LinkKind::is_mailto(target) {
                    encode_email(target)
                } else {
                    ampersand(target)
                }
            }

            // Link to an internal page
            Source::Internal => match item.jump_to.and_then(|id| self.store.page(id)) {
                Some(page) => ampersand(&self.page_url(page, absolute)),
                None => self.default_url(item, absolute, month, request),
            },

            // Link to an article
            Source::Article => {
                let target = item
                    .article
                    .and_then(|id| self.store.article(id))
                    .and_then(|article| {
                        let page = self.store.page(article.page)?;
                        Some(page.path().join_segment("articles").join_segment(&article.slug()))
                    });

                match target {
                    Some(path) => ampersand(&self.render(path, absolute)),
                    None => self.default_url(item, absolute, month, request),
                }
            }

            Source::Default => self.default_url(item, absolute, month, request),
        }
    }

    /// Link to the default page (item detail under the archive target).
    fn default_url(
        &self,
        item: &NewsItem,
        absolute: bool,
        month: Option<&str>,
        request: &Request,
    ) -> String {
        let page = self
            .store
            .archive(item.archive)
            .and_then(|archive| archive.jump_to)
            .and_then(|id| self.store.page(id));

        let mut url = match page {
            // No target page anywhere: degrade to the raw request URI
            None => ampersand(&request.uri),
            Some(page) => {
                let path = self.item_path(page, &item.slug());
                ampersand(&self.render(path, absolute))
            }
        };

        // Keep the archive month context across the detail link
        if let Some(month) = month {
            url.push_str("?month=");
            url.push_str(month);
        }

        url
    }

    /// Detail path of an item slug under a target page.
    fn item_path(&self, page: &Page, slug: &str) -> UrlPath {
        if self.config.news.auto_item {
            page.path().join_segment(slug)
        } else {
            page.path().join_segment("items").join_segment(slug)
        }
    }

    /// A page's own front-end URL.
    fn page_url(&self, page: &Page, absolute: bool) -> String {
        self.render(page.path(), absolute)
    }

    fn render(&self, path: UrlPath, absolute: bool) -> String {
        if absolute {
            format!("{}{}", self.config.site.base_url(), path.to_encoded())
        } else {
            path.to_encoded()
        }
    }

    // ------------------------------------------------------------------
    // feed links (always absolute, unescaped except where noted)
    // ------------------------------------------------------------------

    /// Absolute item-URL base under a target page, memoizable per page.
    ///
    /// Ends with a slash; appending a slug yields a full detail URL.
    pub fn item_base(&self, page: &Page) -> String {
        let path = if self.config.news.auto_item {
            page.path()
        } else {
            page.path().join_segment("items")
        };
        path.to_absolute(self.config.site.base_url())
    }

    /// Direct entry link used by feed generation.
    ///
    /// `item_base` is the pre-resolved base of the item's archive target
    /// page (see [`Self::item_base`]); passing it explicitly replaces the
    /// original's global page-context swap.
    pub fn feed_link(&self, item: &NewsItem, item_base: &str) -> String {
        match item.source {
            Source::External => {
                return item.url.clone().unwrap_or_default();
            }

            Source::Internal => {
                if let Some(page) = item.jump_to.and_then(|id| self.store.page(id)) {
                    return page.path().to_absolute(self.config.site.base_url());
                }
            }

            Source::Article => {
                if let Some(article) = item.article.and_then(|id| self.store.article(id))
                    && let Some(page) = self.store.page(article.page)
                {
                    let path = page.path().join_segment("articles").join_segment(&article.slug());
                    return ampersand(&path.to_absolute(self.config.site.base_url()));
                }
            }

            Source::Default => {}
        }

        // Default page link (also the fallback for broken internal/article refs)
        format!("{}{}/", item_base, item.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Article, NewsArchive};
    use crate::utils::date::DateTimeUtc;

    fn make_config(auto_item: bool) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.title = "Test".to_string();
        config.site.url = Some("https://example.org".to_string());
        config.news.auto_item = auto_item;
        config
    }

    fn make_item(id: Id, source: Source) -> NewsItem {
        NewsItem {
            id,
            archive: 1,
            headline: format!("Item {id}"),
            alias: Some(format!("item-{id}")),
            teaser: String::new(),
            date: DateTimeUtc::from_ymd(2024, 6, 15),
            author: None,
            source,
            url: None,
            jump_to: None,
            article: None,
            featured: false,
            published: true,
            start: None,
            stop: None,
            image: None,
            enclosures: Vec::new(),
            sub_headline: None,
            css_class: None,
            new_window: false,
            robots: None,
        }
    }

    fn make_page(id: Id, alias: &str) -> Page {
        Page {
            id,
            title: alias.to_string(),
            alias: alias.to_string(),
            published: true,
            start: None,
            stop: None,
            protected: false,
            robots: None,
        }
    }

    fn make_store() -> ContentStore {
        let mut store = ContentStore::new();
        store
            .insert_archive(NewsArchive {
                id: 1,
                title: "News".to_string(),
                jump_to: Some(10),
                protected: false,
                groups: Vec::new(),
            })
            .unwrap();
        store.insert_page(make_page(10, "news")).unwrap();
        store
    }

    fn request() -> Request {
        Request::new("/news/")
    }

    #[test]
    fn test_external_mailto_is_obfuscated() {
        let store = make_store();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let mut item = make_item(1, Source::External);
        item.url = Some("mailto:press@example.org".to_string());

        let url = resolver.resolve(&item, false, false, &request());
        assert!(url.starts_with("mailto:"));
        assert!(!url.contains("press@example.org"));
        assert!(url.contains("&#x40;"));
    }

    #[test]
    fn test_external_url_gets_entity_escaping() {
        let store = make_store();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let mut item = make_item(1, Source::External);
        item.url = Some("https://other.org/?a=1&b=2".to_string());

        let url = resolver.resolve(&item, false, false, &request());
        assert_eq!(url, "https://other.org/?a=1&amp;b=2");
    }

    #[test]
    fn test_internal_resolves_page_url() {
        let mut store = make_store();
        store.insert_page(make_page(20, "about")).unwrap();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let mut item = make_item(1, Source::Internal);
        item.jump_to = Some(20);

        assert_eq!(resolver.resolve(&item, false, false, &request()), "/about/");
        assert_eq!(
            resolver.resolve(&item, true, false, &request()),
            "https://example.org/about/"
        );
    }

    #[test]
    fn test_internal_with_deleted_page_falls_back_to_default() {
        let store = make_store();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let mut item = make_item(1, Source::Internal);
        item.jump_to = Some(999); // deleted

        assert_eq!(resolver.resolve(&item, false, false, &request()), "/news/item-1/");
    }

    #[test]
    fn test_article_appends_articles_segment() {
        let mut store = make_store();
        store.insert_page(make_page(30, "press")).unwrap();
        store
            .insert_article(Article {
                id: 5,
                alias: Some("annual-report".to_string()),
                page: 30,
                published: true,
            })
            .unwrap();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let mut item = make_item(1, Source::Article);
        item.article = Some(5);

        assert_eq!(
            resolver.resolve(&item, false, false, &request()),
            "/press/articles/annual-report/"
        );
    }

    #[test]
    fn test_default_url_forms() {
        let store = make_store();

        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);
        let item = make_item(1, Source::Default);
        assert_eq!(resolver.resolve(&item, false, false, &request()), "/news/item-1/");

        let config = make_config(false);
        let resolver = UrlResolver::new(&store, &config);
        assert_eq!(
            resolver.resolve(&item, false, false, &request()),
            "/news/items/item-1/"
        );
    }

    #[test]
    fn test_default_without_target_page_degrades_to_request_uri() {
        let mut store = ContentStore::new();
        store
            .insert_archive(NewsArchive {
                id: 1,
                title: "Orphan".to_string(),
                jump_to: None,
                protected: false,
                groups: Vec::new(),
            })
            .unwrap();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let item = make_item(1, Source::Default);
        let request = Request::new("/news/?page_n1=2&x=1");
        assert_eq!(
            resolver.resolve(&item, false, false, &request),
            "/news/?page_n1=2&amp;x=1"
        );
    }

    #[test]
    fn test_month_param_appended_only_with_archive_context() {
        let store = make_store();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);
        let item = make_item(1, Source::Default);

        let request = Request::new("/news/").with_param("month", "202406");
        assert_eq!(
            resolver.resolve(&item, false, true, &request),
            "/news/item-1/?month=202406"
        );
        assert_eq!(resolver.resolve(&item, false, false, &request), "/news/item-1/");
    }

    #[test]
    fn test_cache_keyed_by_full_tuple() {
        let store = make_store();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);
        let item = make_item(1, Source::Default);

        // Warm the cache with a month variant, then resolve other variants:
        // each must get its own entry, not the stale month-flavored one.
        let june = Request::new("/news/").with_param("month", "202406");
        let july = Request::new("/news/").with_param("month", "202407");

        assert_eq!(
            resolver.resolve(&item, false, true, &june),
            "/news/item-1/?month=202406"
        );
        assert_eq!(
            resolver.resolve(&item, false, true, &july),
            "/news/item-1/?month=202407"
        );
        assert_eq!(resolver.resolve(&item, false, false, &june), "/news/item-1/");
        assert_eq!(
            resolver.resolve(&item, true, false, &june),
            "https://example.org/news/item-1/"
        );
    }

    #[test]
    fn test_month_not_appended_to_external() {
        let store = make_store();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let mut item = make_item(1, Source::External);
        item.url = Some("https://other.org/".to_string());

        let request = Request::new("/news/").with_param("month", "202406");
        assert_eq!(
            resolver.resolve(&item, false, true, &request),
            "https://other.org/"
        );
    }

    #[test]
    fn test_feed_link_variants() {
        let mut store = make_store();
        store.insert_page(make_page(20, "about")).unwrap();
        store
            .insert_article(Article {
                id: 5,
                alias: None,
                page: 20,
                published: true,
            })
            .unwrap();
        let config = make_config(true);
        let resolver = UrlResolver::new(&store, &config);

        let page = store.page(10).unwrap();
        let base = resolver.item_base(page);
        assert_eq!(base, "https://example.org/news/");

        let item = make_item(1, Source::Default);
        assert_eq!(
            resolver.feed_link(&item, &base),
            "https://example.org/news/item-1/"
        );

        let mut external = make_item(2, Source::External);
        external.url = Some("https://other.org/x".to_string());
        assert_eq!(resolver.feed_link(&external, &base), "https://other.org/x");

        let mut internal = make_item(3, Source::Internal);
        internal.jump_to = Some(20);
        assert_eq!(
            resolver.feed_link(&internal, &base),
            "https://example.org/about/"
        );

        let mut article = make_item(4, Source::Article);
        article.article = Some(5);
        assert_eq!(
            resolver.feed_link(&article, &base),
            "https://example.org/about/articles/5/"
        );
    }

    #[test]
    fn test_item_base_without_auto_item() {
        let store = make_store();
        let config = make_config(false);
        let resolver = UrlResolver::new(&store, &config);

        let page = store.page(10).unwrap();
        assert_eq!(resolver.item_base(page), "https://example.org/news/items/");
    }
}
