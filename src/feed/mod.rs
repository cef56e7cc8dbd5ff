//! Feed generation (RSS, Atom) and the news sitemap.
//!
//! One XML file per configured feed lands in `<web_dir>/<share_dir>/`,
//! named after the feed alias (`news<id>` without one). Generation is
//! triggered by the daily cron run (`generate`) or by admin-side save
//! hooks (`generate_for_archive`); both overwrite in place, so a
//! regeneration with unchanged content is byte-identical.

pub mod atom;
pub mod entries;
pub mod rss;
pub mod sitemap;

use std::fs;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use crate::config::SiteConfig;
use crate::core::Request;
use crate::model::{ContentStore, FeedConfig, FeedFormat, Id};
use crate::resolver::UrlResolver;
use crate::utils::date::DateTimeUtc;
use crate::{debug, log};

use entries::{collect_entries, feed_base};

/// Batch feed generation over one content store.
pub struct FeedGenerator<'a> {
    store: &'a ContentStore,
    resolver: &'a UrlResolver<'a>,
    config: &'a SiteConfig,
    request: &'a Request,
    now: DateTimeUtc,
}

impl<'a> FeedGenerator<'a> {
    pub fn new(
        store: &'a ContentStore,
        resolver: &'a UrlResolver<'a>,
        config: &'a SiteConfig,
        request: &'a Request,
        now: DateTimeUtc,
    ) -> Self {
        Self {
            store,
            resolver,
            config,
            request,
            now,
        }
    }

    /// Regenerate every configured feed, pruning stale files first.
    ///
    /// One broken feed never aborts the batch: its write is skipped with
    /// an error log and the remaining feeds proceed.
    pub fn generate_all(&self) -> Result<()> {
        self.prune_stale_files()?;

        for feed in self.store.feeds() {
            if let Err(err) = self.generate(feed) {
                log!("error"; "feed {}: {err:#}", feed.feed_name());
            }
        }
        Ok(())
    }

    /// Regenerate all feeds that include the given archive.
    pub fn generate_for_archive(&self, archive_id: Id) -> Result<()> {
        for feed in self.store.feeds_by_archive(archive_id) {
            self.generate(feed)?;
        }
        Ok(())
    }

    /// Generate one feed file.
    ///
    /// A feed without archives is a silent no-op.
    pub fn generate(&self, feed: &FeedConfig) -> Result<()> {
        if feed.archives.is_empty() {
            debug!("feed"; "{} has no archives, skipping", feed.feed_name());
            return Ok(());
        }

        let entries = collect_entries(
            feed,
            self.store,
            self.resolver,
            self.config,
            self.request,
            self.now,
        );

        let base = feed_base(feed, self.config);
        let xml = match feed.format {
            FeedFormat::Rss => rss::to_xml(feed, &entries, base)?,
            FeedFormat::Atom => {
                let feed_url = format!("{}{}.xml", self.config.share_url(base), feed.feed_name());
                atom::to_xml(feed, &entries, base, &feed_url)?
            }
        };

        let path = self.config.feed_path(&feed.feed_name());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, xml)
            .with_context(|| format!("failed to write feed to {}", path.display()))?;

        log!("feed"; "{} ({} entries)", path.file_name().unwrap_or_default().to_string_lossy(), entries.len());
        Ok(())
    }

    /// Remove `.xml` files in the share directory that no longer belong
    /// to a configured feed.
    fn prune_stale_files(&self) -> Result<()> {
        let share_dir = self.config.share_dir();
        if !share_dir.is_dir() {
            return Ok(());
        }

        let keep: FxHashSet<String> = self
            .store
            .feeds()
            .map(|feed| format!("{}.xml", feed.feed_name()))
            .collect();

        for entry in fs::read_dir(&share_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".xml") && !keep.contains(&name) {
                fs::remove_file(entry.path())?;
                log!("feed"; "pruned stale {}", name);
            }
        }
        Ok(())
    }
}

/// Delete a feed's output file; a missing file is not an error.
pub fn remove_feed(feed: &FeedConfig, config: &SiteConfig) -> Result<()> {
    let path = config.feed_path(&feed.feed_name());
    match fs::remove_file(&path) {
        Ok(()) => {
            log!("feed"; "removed {}", path.file_name().unwrap_or_default().to_string_lossy());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
    }
}

// ============================================================================
// Shared test fixtures
// ============================================================================
