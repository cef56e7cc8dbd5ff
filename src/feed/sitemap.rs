//! News sitemap generation.
//!
//! Walks every unprotected archive with an existing, published target
//! page and emits one `<url>` per searchable item detail link. Pages or
//! items flagged `noindex,nofollow` are skipped.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.org/news/hello/</loc>
//!     <lastmod>2024-06-15</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

use crate::config::SiteConfig;
use crate::log;
use crate::model::{ContentStore, Id};
use crate::resolver::UrlResolver;
use crate::utils::date::DateTimeUtc;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build and write `sitemap.xml` into the web root.
pub fn write_sitemap(
    store: &ContentStore,
    resolver: &UrlResolver<'_>,
    config: &SiteConfig,
    now: DateTimeUtc,
) -> Result<PathBuf> {
    let sitemap = Sitemap::build(store, resolver, now);
    let path = config.paths.web_dir.join("sitemap.xml");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, sitemap.into_xml())
        .with_context(|| format!("failed to write sitemap to {}", path.display()))?;

    log!("sitemap"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
    Ok(path)
}

struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: String,
}

impl Sitemap {
    fn build(store: &ContentStore, resolver: &UrlResolver<'_>, now: DateTimeUtc) -> Self {
        let mut urls = Vec::new();
        let mut item_bases: FxHashMap<Id, String> = FxHashMap::default();

        for archive in store.archives() {
            // Protected archives never reach the index
            if archive.protected {
                continue;
            }

            let Some(jump_to) = archive.jump_to else {
                continue;
            };
            let Some(page) = store.page(jump_to) else {
                continue;
            };

            if !page.is_published(now) || page.protected || page.is_unindexable() {
                continue;
            }

            let item_base = item_bases
                .entry(jump_to)
                .or_insert_with(|| resolver.item_base(page))
                .clone();

            for item in store.published_default_by_archive(archive.id, now) {
                if item.is_unindexable() {
                    continue;
                }

                let dt = item.date;
                urls.push(UrlEntry {
                    loc: resolver.feed_link(item, &item_base),
                    lastmod: format!("{:04}-{:02}-{:02}", dt.year, dt.month, dt.day),
                });
            }
        }

        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&entry.lastmod);
            xml.push_str("</lastmod>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
