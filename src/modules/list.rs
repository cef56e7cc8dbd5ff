//! News list module.
//!
//! Renders the published items of a set of archives with featured
//! filtering, configurable ordering, a skip-first offset, an overall
//! item cap and per-page pagination.

use serde::{Deserialize, Serialize};

use super::{
    ArticleView, FeaturedFilter, HookRegistry, ModuleError, PageInfo, Pagination, parse_articles,
    sort_out_protected,
};
use crate::core::Request;
use crate::model::{ContentStore, Id, NewsItem, Order};
use crate::resolver::UrlResolver;
use crate::utils::date::DateTimeUtc;

/// Configuration of one news list module instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsListModule {
    /// Module instance id (pagination query param suffix).
    pub id: Id,
    pub archives: Vec<Id>,
    pub featured: FeaturedFilter,
    pub order: Order,
    /// Overall item cap; 0 = unlimited.
    pub max_items: usize,
    /// Items skipped from the top of the result.
    pub skip_first: usize,
    /// Page size; 0 disables pagination.
    pub per_page: usize,
    /// Carry the archive month context on detail links.
    pub add_archive: bool,
}

impl Default for NewsListModule {
    fn default() -> Self {
        Self {
            id: 1,
            archives: Vec::new(),
            featured: FeaturedFilter::All,
            order: Order::DateDesc,
            max_items: 0,
            skip_first: 0,
            per_page: 0,
            add_archive: false,
        }
    }
}

/// Assembled output of a list module run.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub articles: Vec<ArticleView>,
    pub pagination: Option<PageInfo>,
    /// Total matching items (after skip-first).
    pub total: usize,
}

impl ListOutput {
    fn empty() -> Self {
        Self {
            articles: Vec::new(),
            pagination: None,
            total: 0,
        }
    }
}

impl NewsListModule {
    /// Run the module against the store.
    pub fn compile(
        &self,
        store: &ContentStore,
        resolver: &UrlResolver<'_>,
        hooks: &HookRegistry,
        request: &Request,
        now: DateTimeUtc,
    ) -> Result<ListOutput, ModuleError> {
        let archives = sort_out_protected(&self.archives, store, request.visitor.as_ref());
        if archives.is_empty() {
            return Ok(ListOutput::empty());
        }

        let featured = self.featured.as_option();

        let total = hooks
            .count_items(&archives, featured)
            .unwrap_or_else(|| store.count_published_by_archives(&archives, featured, now));
        if total <= self.skip_first {
            return Ok(ListOutput::empty());
        }
        let total = total - self.skip_first;

        let mut limit = self.max_items;
        let mut offset = self.skip_first;
        let mut pagination = None;

        // Split the result
        if self.per_page > 0 && (self.max_items == 0 || self.max_items > self.per_page) {
            // The overall cap also caps the paginated range
            let effective_total = if self.max_items > 0 {
                self.max_items.min(total)
            } else {
                total
            };

            let window = Pagination::from_request(
                effective_total,
                self.per_page,
                &format!("page_n{}", self.id),
                request,
            )?;

            limit = self.per_page;
            offset = self.skip_first + window.offset();

            // Trim the last page to the overall cap
            if offset + limit > effective_total + self.skip_first {
                limit = effective_total + self.skip_first - offset;
            }

            pagination = Some(window.info());
        }

        let items: Vec<NewsItem> = hooks
            .fetch_items(&archives, featured, limit, offset)
            .unwrap_or_else(|| {
                store
                    .published_by_archives(&archives, featured, limit, offset, self.order, now)
                    .into_iter()
                    .cloned()
                    .collect()
            });

        let articles = parse_articles(&items, store, resolver, request, self.add_archive, hooks);

        Ok(ListOutput {
            articles,
            pagination,
            total,
        })
    }
}
