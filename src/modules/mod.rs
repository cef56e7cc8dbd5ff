//! Front-end news modules.
//!
//! The list and archive modules query the content store and assemble
//! template variables ([`ArticleView`]) for each matching item. Shared
//! behavior lives here: protected-archive filtering, pagination and the
//! article view assembler.

pub mod archive;
pub mod hooks;
pub mod list;

pub use archive::NewsArchiveModule;
pub use hooks::{ArticleHook, HookRegistry, ListHook};
pub use list::NewsListModule;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Request, Visitor};
use crate::model::{ContentStore, Id, NewsItem, Source};
use crate::resolver::UrlResolver;
use crate::utils::html::escape;

/// Module-level failures surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Out-of-range page number or period selector (404-equivalent).
    #[error("Page not found: {0}")]
    PageNotFound(String),
}

// ============================================================================
// Protected archives
// ============================================================================

/// Drop archives the visitor may not see.
///
/// Unknown archive ids are dropped as well; protected archives survive
/// only when the visitor is a member of one of the allowed groups.
pub fn sort_out_protected(
    archive_ids: &[Id],
    store: &ContentStore,
    visitor: Option<&Visitor>,
) -> Vec<Id> {
    archive_ids
        .iter()
        .filter_map(|&id| {
            let archive = store.archive(id)?;
            if archive.protected {
                let visitor = visitor?;
                if archive.groups.is_empty() || !visitor.in_any_group(&archive.groups) {
                    return None;
                }
            }
            Some(id)
        })
        .collect()
}

// ============================================================================
// Pagination
// ============================================================================

/// Window over a result set, derived from a `page_<x><id>` query param.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub total: usize,
    pub per_page: usize,
    pub page: usize,
}

impl Pagination {
    /// Read and validate the current page from the request.
    ///
    /// A page number outside `1..=ceil(total/per_page)` is a
    /// page-not-found condition, as is a non-numeric value.
    pub fn from_request(
        total: usize,
        per_page: usize,
        param: &str,
        request: &Request,
    ) -> Result<Self, ModuleError> {
        let page = match request.param(param) {
            Some(raw) => raw.parse::<usize>().unwrap_or(0),
            None => 1,
        };

        let pages = total.div_ceil(per_page).max(1);
        if page < 1 || page > pages {
            return Err(ModuleError::PageNotFound(request.uri.clone()));
        }

        Ok(Self {
            total,
            per_page,
            page,
        })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            total: self.total,
            per_page: self.per_page,
            page: self.page,
            pages: self.total.div_ceil(self.per_page).max(1),
        }
    }
}

/// Serializable pagination summary for module output.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageInfo {
    pub total: usize,
    pub per_page: usize,
    pub page: usize,
    pub pages: usize,
}

/// Featured tri-state filter of the list module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedFilter {
    #[default]
    All,
    Featured,
    Unfeatured,
}

impl FeaturedFilter {
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Featured => Some(true),
            Self::Unfeatured => Some(false),
        }
    }
}

// ============================================================================
// Article view assembly
// ============================================================================

/// Template variables assembled for one rendered article.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    pub id: Id,
    pub headline: String,
    pub sub_headline: Option<String>,
    /// CSS class chain (css class, featured, first/last/even/odd).
    pub class: String,
    /// Canonical item URL.
    pub link: String,
    /// Headline wrapped in its anchor element.
    pub link_headline: String,
    /// "Read more" anchor element.
    pub more: String,
    pub teaser: String,
    /// Eagerly compiled body text (default-source items only).
    pub text: String,
    pub has_text: bool,
    pub date: String,
    pub author: Option<String>,
    pub featured: bool,
    /// 1-based position in the list.
    pub count: usize,
    pub image: Option<MediaView>,
    pub enclosures: Vec<MediaView>,
}

/// A referenced media file in a view.
#[derive(Debug, Clone, Serialize)]
pub struct MediaView {
    pub path: String,
    pub mime: &'static str,
}

/// Assemble the template variables of a single item.
#[allow(clippy::too_many_arguments)]
pub fn parse_article(
    item: &NewsItem,
    store: &ContentStore,
    resolver: &UrlResolver<'_>,
    request: &Request,
    add_archive: bool,
    positional_class: &str,
    count: usize,
) -> ArticleView {
    let mut class = String::new();
    if let Some(css) = &item.css_class {
        class.push_str(css);
    }
    if item.featured {
        if !class.is_empty() {
            class.push(' ');
        }
        class.push_str("featured");
    }
    if !positional_class.is_empty() {
        if !class.is_empty() {
            class.push(' ');
        }
        class.push_str(positional_class);
    }

    let link = resolver.resolve(item, false, add_archive, request);

    // External and article links show a "read more" teaser only; default
    // items compile their body eagerly from the content elements.
    let (text, has_text) = if item.source == Source::Default {
        let text: String = store
            .content_elements(item.id)
            .iter()
            .map(|e| e.html.as_str())
            .collect();
        let has_text = !text.is_empty();
        (text, has_text)
    } else {
        (String::new(), true)
    };

    let author = item
        .author
        .and_then(|id| store.user(id))
        .map(|user| user.name.clone());

    let image = item.image.as_deref().and_then(|uuid| {
        let file = store.file(uuid)?;
        Some(MediaView {
            path: file.path.clone(),
            mime: crate::utils::mime::from_path(&file.path),
        })
    });

    let enclosures = item
        .enclosures
        .iter()
        .filter_map(|uuid| {
            let file = store.file(uuid)?;
            Some(MediaView {
                path: file.path.clone(),
                mime: crate::utils::mime::from_path(&file.path),
            })
        })
        .collect();

    ArticleView {
        id: item.id,
        headline: item.headline.clone(),
        sub_headline: item.sub_headline.clone(),
        class,
        link_headline: generate_link(&item.headline, item, &link, false),
        more: generate_link("Read more", item, &link, true),
        link,
        teaser: item.teaser.clone(),
        text,
        has_text,
        date: item.date.to_rfc3339(),
        author,
        featured: item.featured,
        count,
        image,
        enclosures,
    }
}

/// Assemble views for a whole result set with positional classes.
pub fn parse_articles(
    items: &[NewsItem],
    store: &ContentStore,
    resolver: &UrlResolver<'_>,
    request: &Request,
    add_archive: bool,
    hooks: &HookRegistry,
) -> Vec<ArticleView> {
    let limit = items.len();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let count = index + 1;
            let mut positional = String::new();
            if count == 1 {
                positional.push_str("first");
            }
            if count == limit {
                if !positional.is_empty() {
                    positional.push(' ');
                }
                positional.push_str("last");
            }
            if !positional.is_empty() {
                positional.push(' ');
            }
            positional.push_str(if count % 2 == 0 { "even" } else { "odd" });

            let mut view =
                parse_article(item, store, resolver, request, add_archive, &positional, count);
            hooks.post_process(&mut view, item);
            view
        })
        .collect()
}

/// Wrap a label in the item's anchor element.
fn generate_link(label: &str, item: &NewsItem, url: &str, is_read_more: bool) -> String {
    let is_internal = item.source != Source::External;

    let title = if is_internal {
        format!("Read the article: {}", item.headline)
    } else {
        format!("Open in a new window: {url}")
    };

    let target = if !is_internal && item.new_window {
        r#" target="_blank" rel="noreferrer noopener""#
    } else {
        ""
    };

    let inner = if is_read_more {
        // Screen readers still get the headline on bare "read more" links
        if is_internal {
            format!(r#"{label}<span class="invisible"> {}</span>"#, item.headline)
        } else {
            label.to_string()
        }
    } else {
        format!(r#"<span itemprop="headline">{label}</span>"#)
    };

    format!(
        r#"<a href="{url}" title="{}"{target} itemprop="url">{inner}</a>"#,
        escape(&title)
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::feed::tests::{make_config, make_item, make_store};
    use crate::model::NewsArchive;
    use crate::utils::date::DateTimeUtc;

    pub fn now() -> DateTimeUtc {
        DateTimeUtc::from_ymd(2024, 7, 1)
    }

    #[test]
    fn test_sort_out_protected_drops_unknown_and_protected() {
        let mut store = make_store(0);
        store
            .insert_archive(NewsArchive {
                id: 2,
                title: "Members".to_string(),
                jump_to: Some(10),
                protected: true,
                groups: vec![5],
            })
            .unwrap();

        // Anonymous visitor: protected archive and unknown id dropped
        assert_eq!(sort_out_protected(&[1, 2, 99], &store, None), vec![1]);

        // Member of group 5 sees the protected archive
        let member = Visitor::new(vec![5]);
        assert_eq!(sort_out_protected(&[1, 2], &store, Some(&member)), vec![1, 2]);

        // Member of another group does not
        let outsider = Visitor::new(vec![3]);
        assert_eq!(sort_out_protected(&[1, 2], &store, Some(&outsider)), vec![1]);
    }

    #[test]
    fn test_pagination_happy_path() {
        let request = Request::new("/news/").with_param("page_n1", "2");
        let pagination = Pagination::from_request(10, 4, "page_n1", &request).unwrap();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.offset(), 4);
        assert_eq!(pagination.info().pages, 3);
    }

    #[test]
    fn test_pagination_defaults_to_first_page() {
        let request = Request::new("/news/");
        let pagination = Pagination::from_request(10, 4, "page_n1", &request).unwrap();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_out_of_range_is_not_found() {
        let request = Request::new("/news/?page_n1=4").with_param("page_n1", "4");
        let err = Pagination::from_request(10, 4, "page_n1", &request).unwrap_err();
        assert!(matches!(err, ModuleError::PageNotFound(_)));

        let request = Request::new("/news/").with_param("page_n1", "zero");
        assert!(Pagination::from_request(10, 4, "page_n1", &request).is_err());
    }

    #[test]
    fn test_parse_article_assembles_view() {
        let store = make_store(1);
        let config = make_config();
        let resolver = UrlResolver::new(&store, &config);
        let request = Request::new("/news/");

        let item = store.item(1).unwrap();
        let view = parse_article(item, &store, &resolver, &request, false, "first odd", 1);

        assert_eq!(view.link, "/news/item-1/");
        assert_eq!(view.class, "first odd");
        assert!(view.link_headline.contains(r#"href="/news/item-1/""#));
        assert!(view.link_headline.contains("itemprop=\"headline\""));
        assert!(view.more.contains("Read more"));
        assert!(!view.has_text); // no content elements in fixture
    }

    #[test]
    fn test_parse_article_featured_class() {
        let store = make_store(0);
        let config = make_config();
        let resolver = UrlResolver::new(&store, &config);
        let request = Request::new("/news/");

        let mut item = make_item(1, "feat", "2024-06-01");
        item.featured = true;
        item.css_class = Some("highlight".to_string());

        let view = parse_article(&item, &store, &resolver, &request, false, "last even", 2);
        assert_eq!(view.class, "highlight featured last even");
    }

    #[test]
    fn test_parse_article_external_link_attributes() {
        let store = make_store(0);
        let config = make_config();
        let resolver = UrlResolver::new(&store, &config);
        let request = Request::new("/news/");

        let mut item = make_item(1, "ext", "2024-06-01");
        item.source = Source::External;
        item.url = Some("https://other.org/".to_string());
        item.new_window = true;

        let view = parse_article(&item, &store, &resolver, &request, false, "", 1);
        assert!(view.more.contains(r#"target="_blank""#));
        assert!(view.has_text); // external items always render the read-more state
        assert!(view.text.is_empty());
    }

    #[test]
    fn test_parse_articles_positional_classes() {
        let store = make_store(3);
        let config = make_config();
        let resolver = UrlResolver::new(&store, &config);
        let request = Request::new("/news/");
        let hooks = HookRegistry::default();

        let items: Vec<_> = (1..=3).map(|id| store.item(id).unwrap().clone()).collect();
        let views = parse_articles(&items, &store, &resolver, &request, false, &hooks);

        assert_eq!(views[0].class, "first odd");
        assert_eq!(views[1].class, "even");
        assert_eq!(views[2].class, "last odd");
        assert_eq!(views[2].count, 3);
    }
}
