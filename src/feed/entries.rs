//! Feed entry assembly.
//!
//! Collects the published items of a feed's archives and turns each into
//! a format-independent [`FeedEntry`]. Items whose archive has no target
//! page (or whose target page was deleted) are skipped without aborting
//! the batch; unresolvable enclosure references are dropped entry-local.

use rustc_hash::FxHashMap;

use crate::config::SiteConfig;
use crate::core::Request;
use crate::debug;
use crate::model::{ContentStore, FeedConfig, FeedSource, Id, Order};
use crate::resolver::UrlResolver;
use crate::tags::expand_insert_tags;
use crate::utils::date::DateTimeUtc;
use crate::utils::html::convert_relative_urls;
use crate::utils::mime;

/// One assembled feed entry, independent of the output format.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: DateTimeUtc,
    pub author: Option<String>,
    /// Description HTML, insert tags expanded and URLs absolutized.
    pub description: String,
    pub enclosures: Vec<FeedEnclosure>,
}

/// A media attachment of an entry.
#[derive(Debug, Clone)]
pub struct FeedEnclosure {
    pub url: String,
    pub mime: &'static str,
}

/// Base URL for entry descriptions and enclosures.
pub fn feed_base<'a>(feed: &'a FeedConfig, config: &'a SiteConfig) -> &'a str {
    feed.feed_base
        .as_deref()
        .map(|base| base.trim_end_matches('/'))
        .unwrap_or_else(|| config.site.base_url())
}

/// Collect the entries of one feed, newest first.
pub fn collect_entries(
    feed: &FeedConfig,
    store: &ContentStore,
    resolver: &UrlResolver<'_>,
    config: &SiteConfig,
    request: &Request,
    now: DateTimeUtc,
) -> Vec<FeedEntry> {
    let items = store.published_by_archives(
        &feed.archives,
        None,
        feed.max_items,
        0,
        Order::DateDesc,
        now,
    );

    let base = feed_base(feed, config);

    // Item-URL base per target page, resolved once per page
    let mut item_bases: FxHashMap<Id, String> = FxHashMap::default();

    let mut entries = Vec::with_capacity(items.len());

    for item in items {
        // No target page set for the parent archive
        let Some(jump_to) = store.archive(item.archive).and_then(|a| a.jump_to) else {
            debug!("feed"; "skipping item {}: archive has no target page", item.id);
            continue;
        };

        // A target page is set but does no longer exist
        let Some(page) = store.page(jump_to) else {
            debug!("feed"; "skipping item {}: target page {} is gone", item.id, jump_to);
            continue;
        };

        let item_base = item_bases
            .entry(jump_to)
            .or_insert_with(|| resolver.item_base(page))
            .clone();
        let link = resolver.feed_link(item, &item_base);

        let description = match feed.source {
            FeedSource::Full => store
                .content_elements(item.id)
                .iter()
                .map(|e| e.html.as_str())
                .collect::<String>(),
            FeedSource::Teaser => item.teaser.clone(),
        };
        let description = expand_insert_tags(&description, store, resolver, config, request);
        let description = convert_relative_urls(&description, base);

        let author = item
            .author
            .and_then(|id| store.user(id))
            .map(|user| user.name.clone());

        let mut enclosures = Vec::new();
        let image_ref = item.image.iter();
        for uuid in image_ref.chain(item.enclosures.iter()) {
            match store.file(uuid) {
                Some(file) => enclosures.push(FeedEnclosure {
                    url: format!("{}/{}", base, file.path.trim_start_matches('/')),
                    mime: mime::from_path(&file.path),
                }),
                None => {
                    debug!("feed"; "skipping enclosure {uuid}: no such file reference");
                }
            }
        }

        entries.push(FeedEntry {
            title: item.headline.clone(),
            link,
            published: item.date,
            author,
            description,
            enclosures,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::tests::{make_config, make_feed, make_item, make_store};

    fn collect(store: &ContentStore, feed: &FeedConfig) -> Vec<FeedEntry> {
        let config = make_config();
        let resolver = UrlResolver::new(store, &config);
        let request = Request::new("/news/");
        collect_entries(
            feed,
            store,
            &resolver,
            &config,
            &request,
            DateTimeUtc::from_ymd(2024, 7, 1),
        )
    }

    #[test]
    fn test_entries_newest_first_capped_by_max_items() {
        let store = make_store(5);
        let mut feed = make_feed(vec![1]);
        feed.max_items = 2;

        let entries = collect(&store, &feed);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].published > entries[1].published);
    }

    #[test]
    fn test_max_items_zero_is_unlimited() {
        let store = make_store(5);
        let feed = make_feed(vec![1]);
        assert_eq!(collect(&store, &feed).len(), 5);
    }

    #[test]
    fn test_items_under_deleted_page_are_skipped() {
        // Archive 2's target page does not exist; archive 1's does.
        let mut store = make_store(2);
        store
            .insert_archive(crate::model::NewsArchive {
                id: 2,
                title: "Broken".to_string(),
                jump_to: Some(999),
                protected: false,
                groups: Vec::new(),
            })
            .unwrap();
        let mut orphan = make_item(90, "orphan", "2024-06-25");
        orphan.archive = 2;
        store.insert_item(orphan).unwrap();

        let feed = make_feed(vec![1, 2]);
        let entries = collect(&store, &feed);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.link.contains("orphan")));
    }

    #[test]
    fn test_archive_without_target_page_is_skipped() {
        let mut store = make_store(1);
        store
            .insert_archive(crate::model::NewsArchive {
                id: 3,
                title: "No target".to_string(),
                jump_to: None,
                protected: false,
                groups: Vec::new(),
            })
            .unwrap();
        let mut orphan = make_item(91, "no-target", "2024-06-26");
        orphan.archive = 3;
        store.insert_item(orphan).unwrap();

        let entries = collect(&store, &make_feed(vec![1, 3]));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_entry_links_and_author() {
        let mut store = make_store(1);
        store
            .insert_user(crate::model::User {
                id: 7,
                name: "Jane Doe".to_string(),
                email: None,
            })
            .unwrap();
        let mut item = make_item(50, "with-author", "2024-06-20");
        item.author = Some(7);
        store.insert_item(item).unwrap();

        let entries = collect(&store, &make_feed(vec![1]));
        let entry = entries
            .iter()
            .find(|e| e.link.contains("with-author"))
            .unwrap();
        assert_eq!(entry.link, "https://example.org/news/with-author/");
        assert_eq!(entry.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_description_teaser_vs_full_text() {
        let mut store = make_store(1);
        for (id, sorting, html) in [(1, 2, "<p>second</p>"), (2, 1, "<p>first</p>")] {
            store
                .insert_element(crate::model::ContentElement {
                    id,
                    item: 1,
                    sorting,
                    published: true,
                    html: html.to_string(),
                })
                .unwrap();
        }

        let teaser_feed = make_feed(vec![1]);
        let entries = collect(&store, &teaser_feed);
        assert_eq!(entries[0].description, "<p>teaser 1</p>");

        let mut full_feed = make_feed(vec![1]);
        full_feed.source = FeedSource::Full;
        let entries = collect(&store, &full_feed);
        assert_eq!(entries[0].description, "<p>first</p><p>second</p>");
    }

    #[test]
    fn test_description_relative_urls_rewritten() {
        let mut store = make_store(0);
        let mut item = make_item(1, "rel", "2024-06-01");
        item.teaser = r#"<a href="/files/a.pdf">a</a>"#.to_string();
        store.insert_item(item).unwrap();

        let entries = collect(&store, &make_feed(vec![1]));
        assert_eq!(
            entries[0].description,
            r#"<a href="https://example.org/files/a.pdf">a</a>"#
        );
    }

    #[test]
    fn test_enclosures_resolved_and_missing_skipped() {
        let mut store = make_store(0);
        store
            .insert_file(crate::model::FileRef {
                uuid: "uuid-img".to_string(),
                path: "files/cover.jpg".to_string(),
            })
            .unwrap();
        let mut item = make_item(1, "with-media", "2024-06-01");
        item.image = Some("uuid-img".to_string());
        item.enclosures = vec!["uuid-missing".to_string()];
        store.insert_item(item).unwrap();

        let entries = collect(&store, &make_feed(vec![1]));
        assert_eq!(entries[0].enclosures.len(), 1);
        assert_eq!(
            entries[0].enclosures[0].url,
            "https://example.org/files/cover.jpg"
        );
        assert_eq!(entries[0].enclosures[0].mime, "image/jpeg");
    }

    #[test]
    fn test_feed_base_override_applies_to_media() {
        let mut store = make_store(0);
        store
            .insert_file(crate::model::FileRef {
                uuid: "uuid-img".to_string(),
                path: "files/cover.png".to_string(),
            })
            .unwrap();
        let mut item = make_item(1, "media", "2024-06-01");
        item.image = Some("uuid-img".to_string());
        store.insert_item(item).unwrap();

        let mut feed = make_feed(vec![1]);
        feed.feed_base = Some("https://cdn.example.org/".to_string());

        let entries = collect(&store, &feed);
        assert_eq!(
            entries[0].enclosures[0].url,
            "https://cdn.example.org/files/cover.png"
        );
    }

    #[test]
    fn test_regeneration_is_stable() {
        let store = make_store(4);
        let feed = make_feed(vec![1]);

        let first = collect(&store, &feed);
        let second = collect(&store, &feed);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.link, b.link);
            assert_eq!(a.title, b.title);
            assert_eq!(a.description, b.description);
        }
    }
}
