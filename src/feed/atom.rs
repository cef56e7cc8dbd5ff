//! Atom 1.0 serialization.

use anyhow::{Ok, Result};
use atom_syndication::{
    Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, GeneratorBuilder, Link, LinkBuilder,
    Person, PersonBuilder, Text,
};

use super::entries::FeedEntry;
use crate::model::FeedConfig;
use crate::utils::date::DateTimeUtc;

/// Serialize a feed and its entries to Atom 1.0 XML.
///
/// `feed_url` is the public URL of the generated file (self link).
pub fn to_xml(feed: &FeedConfig, entries: &[FeedEntry], base: &str, feed_url: &str) -> Result<String> {
    let atom_entries: Vec<Entry> = entries.iter().map(entry_to_atom_entry).collect();

    // Feed updated = most recent entry, falling back to the config change
    let updated_str = entries
        .iter()
        .map(|e| e.published)
        .max()
        .or(feed.updated)
        .map(DateTimeUtc::to_rfc3339)
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string());
    let updated: FixedDateTime = updated_str
        .parse()
        .unwrap_or_else(|_| FixedDateTime::default());

    let self_link: Link = LinkBuilder::default()
        .href(feed_url)
        .rel("self".to_string())
        .mime_type(Some("application/atom+xml".to_string()))
        .build();

    let alternate_link: Link = LinkBuilder::default()
        .href(base.to_string())
        .rel("alternate".to_string())
        .build();

    let atom_feed: Feed = FeedBuilder::default()
        .title(Text::plain(feed.title.clone()))
        .id(feed_url)
        .updated(updated)
        .links(vec![self_link, alternate_link])
        .subtitle(Some(Text::plain(feed.description.clone())))
        .generator(Some(
            GeneratorBuilder::default()
                .value("gazette")
                .uri(Some("https://github.com/gazette-rs/gazette".to_string()))
                .build(),
        ))
        .lang(Some(feed.language.clone()))
        .entries(atom_entries)
        .build();

    Ok(atom_feed.to_string())
}

fn entry_to_atom_entry(entry: &FeedEntry) -> Entry {
    let updated: FixedDateTime = entry
        .published
        .to_rfc3339()
        .parse()
        .unwrap_or_else(|_| FixedDateTime::default());

    let mut links = vec![
        LinkBuilder::default()
            .href(&entry.link)
            .rel("alternate".to_string())
            .build(),
    ];

    // Atom carries every enclosure as a rel="enclosure" link
    for enclosure in &entry.enclosures {
        links.push(
            LinkBuilder::default()
                .href(&enclosure.url)
                .rel("enclosure".to_string())
                .mime_type(Some(enclosure.mime.to_string()))
                .build(),
        );
    }

    let authors: Vec<Person> = entry
        .author
        .as_ref()
        .map(|name| vec![PersonBuilder::default().name(name.clone()).build()])
        .unwrap_or_default();

    EntryBuilder::default()
        .title(Text::plain(entry.title.clone()))
        .id(&entry.link)
        .updated(updated)
        .links(links)
        .summary(Some(Text::html(entry.description.clone())))
        .authors(authors)
        .build()
}
