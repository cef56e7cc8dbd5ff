//! RSS 2.0 serialization.

use anyhow::{Result, anyhow};
use rss::{ChannelBuilder, EnclosureBuilder, GuidBuilder, ItemBuilder, validation::Validate};

use super::entries::FeedEntry;
use crate::model::FeedConfig;
use crate::utils::date::DateTimeUtc;

/// Serialize a feed and its entries to RSS 2.0 XML.
pub fn to_xml(feed: &FeedConfig, entries: &[FeedEntry], base: &str) -> Result<String> {
    let items: Vec<rss::Item> = entries.iter().map(entry_to_rss_item).collect();

    let channel = ChannelBuilder::default()
        .title(&feed.title)
        .link(base)
        .description(&feed.description)
        .language(feed.language.clone())
        .generator("gazette".to_string())
        .pub_date(feed.updated.map(DateTimeUtc::to_rfc2822))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(channel.to_string())
}

fn entry_to_rss_item(entry: &FeedEntry) -> rss::Item {
    // RSS 2.0 allows a single enclosure per item; extra attachments are
    // carried by the Atom rendition only.
    let enclosure = entry.enclosures.first().map(|enc| {
        EnclosureBuilder::default()
            .url(&enc.url)
            .mime_type(enc.mime)
            .length("0".to_string())
            .build()
    });

    ItemBuilder::default()
        .title(entry.title.clone())
        .link(Some(entry.link.clone()))
        .guid(
            GuidBuilder::default()
                .permalink(true)
                .value(entry.link.clone())
                .build(),
        )
        .description(entry.description.clone())
        .pub_date(entry.published.to_rfc2822())
        .author(entry.author.clone())
        .enclosure(enclosure)
        .build()
}
