//! Insert-tag mini-language.
//!
//! Placeholders of the form `{{news::<id-or-alias>}}` are expanded
//! inside rendered content and feed descriptions:
//!
//! | Tag           | Expansion                                   |
//! |---------------|---------------------------------------------|
//! | `news`        | Full `<a>` element linking the item         |
//! | `news_open`   | Opening `<a>` element only                  |
//! | `news_url`    | Item URL (`./` when unresolvable)           |
//! | `news_title`  | Escaped headline                            |
//! | `news_teaser` | Teaser HTML                                 |
//! | `news_feed`   | Public URL of a feed file (by feed id)      |
//!
//! An extra `::absolute` argument switches URL tags to absolute form.
//! Tags naming a missing item expand to the empty string; unknown tag
//! keys are left untouched for downstream processors.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::SiteConfig;
use crate::core::Request;
use crate::model::{ContentStore, NewsItem};
use crate::resolver::UrlResolver;
use crate::utils::html::escape;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z_]+)::([^{}]+)\}\}").unwrap());

/// Expand all news insert tags in a text.
pub fn expand_insert_tags(
    text: &str,
    store: &ContentStore,
    resolver: &UrlResolver<'_>,
    config: &SiteConfig,
    request: &Request,
) -> String {
    TAG_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let key = &caps[1];
            let mut params = caps[2].split("::");
            let target = params.next().unwrap_or_default();
            let absolute = params.any(|arg| arg == "absolute");

            match key {
                "news" | "news_open" | "news_url" | "news_title" | "news_teaser" => {
                    match store.item_by_id_or_alias(target) {
                        Some(item) => expand_item_tag(key, item, absolute, resolver, request),
                        None => String::new(),
                    }
                }
                "news_feed" => expand_feed_tag(target, store, config),
                // Not ours; leave for other tag processors
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn expand_item_tag(
    key: &str,
    item: &NewsItem,
    absolute: bool,
    resolver: &UrlResolver<'_>,
    request: &Request,
) -> String {
    let url = || {
        let url = resolver.resolve(item, absolute, false, request);
        if url.is_empty() { "./".to_string() } else { url }
    };

    match key {
        "news" => format!(
            r#"<a href="{}" title="{}">{}</a>"#,
            url(),
            escape(&item.headline),
            item.headline
        ),
        "news_open" => format!(r#"<a href="{}" title="{}">"#, url(), escape(&item.headline)),
        "news_url" => url(),
        "news_title" => escape(&item.headline).into_owned(),
        "news_teaser" => item.teaser.clone(),
        _ => unreachable!("caller matched the tag key"),
    }
}

fn expand_feed_tag(target: &str, store: &ContentStore, config: &SiteConfig) -> String {
    let Some(feed) = target.parse().ok().and_then(|id| store.feed(id)) else {
        return String::new();
    };

    let base = feed
        .feed_base
        .as_deref()
        .map(|base| base.trim_end_matches('/'))
        .unwrap_or_else(|| config.site.base_url());

    format!("{}{}.xml", config.share_url(base), feed.feed_name())
}
