//! Feed generation commands (`generate`, `remove`, `sitemap`).

use anyhow::Result;

use crate::config::SiteConfig;
use crate::core::Request;
use crate::feed::{FeedGenerator, remove_feed, sitemap::write_sitemap};
use crate::log;
use crate::model::{ContentStore, Id};
use crate::resolver::UrlResolver;
use crate::utils::date::DateTimeUtc;

/// `generate`: all feeds, one archive's feeds, or a single feed.
pub fn run_generate(
    store: &ContentStore,
    config: &SiteConfig,
    archive: Option<Id>,
    feed: Option<&str>,
) -> Result<()> {
    let resolver = UrlResolver::new(store, config);
    let request = Request::new("/");
    let generator = FeedGenerator::new(store, &resolver, config, &request, DateTimeUtc::now());

    match (feed, archive) {
        (Some(key), _) => match store.feed_by_id_or_alias(key) {
            Some(feed) => generator.generate(feed),
            // Unknown feed config: silent no-op
            None => {
                log!("warning"; "no feed named {key:?}");
                Ok(())
            }
        },
        (None, Some(archive_id)) => generator.generate_for_archive(archive_id),
        (None, None) => generator.generate_all(),
    }
}

/// `remove`: delete a feed's output file.
pub fn run_remove(store: &ContentStore, config: &SiteConfig, key: &str) -> Result<()> {
    match store.feed_by_id_or_alias(key) {
        Some(feed) => remove_feed(feed, config),
        None => {
            log!("warning"; "no feed named {key:?}");
            Ok(())
        }
    }
}

/// `sitemap`: write the news sitemap into the web root.
pub fn run_sitemap(store: &ContentStore, config: &SiteConfig) -> Result<()> {
    let resolver = UrlResolver::new(store, config);
    write_sitemap(store, &resolver, config, DateTimeUtc::now())?;
    Ok(())
}
