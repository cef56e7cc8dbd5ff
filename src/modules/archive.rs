//! News archive module.
//!
//! Renders the items of a calendar period (year, month or day) selected
//! via query parameters, defaulting to the current period. An invalid
//! or out-of-range selector is a page-not-found condition.

use serde::{Deserialize, Serialize};

use super::{
    ArticleView, HookRegistry, ModuleError, PageInfo, Pagination, parse_articles,
    sort_out_protected,
};
use crate::core::Request;
use crate::model::{ContentStore, Id, NewsItem, Order};
use crate::resolver::UrlResolver;
use crate::utils::date::{DateTimeUtc, Period, PeriodFormat};

/// Behavior when the request carries no period selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodDefault {
    /// Jump to the current period (default).
    #[default]
    CurrentPeriod,
    /// Show everything published so far.
    AllItems,
    /// Render nothing until a period is selected.
    HideModule,
}

/// Configuration of one news archive module instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsArchiveModule {
    /// Module instance id (pagination query param suffix).
    pub id: Id,
    pub archives: Vec<Id>,
    pub headline: String,
    /// Granularity of the jump-to-current default.
    pub format: PeriodFormat,
    pub period_default: PeriodDefault,
    pub order: Order,
    /// Page size; 0 disables pagination.
    pub per_page: usize,
}

impl Default for NewsArchiveModule {
    fn default() -> Self {
        Self {
            id: 1,
            archives: Vec::new(),
            headline: "News archive".to_string(),
            format: PeriodFormat::Month,
            period_default: PeriodDefault::CurrentPeriod,
            order: Order::DateDesc,
            per_page: 0,
        }
    }
}

/// Assembled output of an archive module run.
#[derive(Debug, Serialize)]
pub struct ArchiveOutput {
    /// Module headline, suffixed with the period label.
    pub headline: String,
    pub articles: Vec<ArticleView>,
    pub pagination: Option<PageInfo>,
    pub total: usize,
}

impl NewsArchiveModule {
    /// Run the module against the store.
    ///
    /// `Ok(None)` means the module stays hidden (no period selected and
    /// `period_default = hide_module`).
    pub fn compile(
        &self,
        store: &ContentStore,
        resolver: &UrlResolver<'_>,
        hooks: &HookRegistry,
        request: &Request,
        now: DateTimeUtc,
    ) -> Result<Option<ArchiveOutput>, ModuleError> {
        let archives = sort_out_protected(&self.archives, store, request.visitor.as_ref());
        if archives.is_empty() {
            return Ok(None);
        }

        let period = match self.selected_period(request)? {
            Some(period) => Some(period),
            None => match self.period_default {
                PeriodDefault::HideModule => return Ok(None),
                PeriodDefault::AllItems => None,
                PeriodDefault::CurrentPeriod => Some(Period::of(now, self.format)),
            },
        };

        let items: Vec<NewsItem> = match period {
            Some(period) => store
                .published_in_period(period, &archives, self.order, now)
                .into_iter()
                .cloned()
                .collect(),
            // All items published so far
            None => store
                .published_by_archives(&archives, None, 0, 0, self.order, now)
                .into_iter()
                .filter(|item| item.date <= now)
                .cloned()
                .collect(),
        };

        let total = items.len();
        let mut pagination = None;
        let visible = if self.per_page > 0 && total > 0 {
            let window = Pagination::from_request(
                total,
                self.per_page,
                &format!("page_a{}", self.id),
                request,
            )?;
            pagination = Some(window.info());
            let start = window.offset();
            let end = (start + self.per_page).min(total);
            &items[start..end]
        } else {
            &items[..]
        };

        let mut headline = self.headline.clone();
        if let Some(period) = period {
            headline.push(' ');
            headline.push_str(&period.label());
        }

        let articles = parse_articles(visible, store, resolver, request, true, hooks);

        Ok(Some(ArchiveOutput {
            headline,
            articles,
            pagination,
            total,
        }))
    }

    /// Parse the period selector from the request, most specific first.
    ///
    /// An unparsable selector raises page-not-found.
    fn selected_period(&self, request: &Request) -> Result<Option<Period>, ModuleError> {
        for param in ["day", "month", "year"] {
            if let Some(raw) = request.param(param) {
                return Period::parse(raw)
                    .filter(|period| period_matches_param(*period, param))
                    .map(Some)
                    .ok_or_else(|| ModuleError::PageNotFound(request.uri.clone()));
            }
        }
        Ok(None)
    }

    /// Distinct periods with published items, newest first (period menu).
    pub fn active_periods(
        &self,
        store: &ContentStore,
        request: &Request,
        now: DateTimeUtc,
    ) -> Vec<String> {
        let archives = sort_out_protected(&self.archives, store, request.visitor.as_ref());
        let mut periods: Vec<Period> = store
            .published_by_archives(&archives, None, 0, 0, Order::DateDesc, now)
            .iter()
            .map(|item| Period::of(item.date, self.format))
            .collect();
        periods.dedup();
        periods.into_iter().map(Period::selector).collect()
    }
}

/// Guard against a selector parsed at the wrong granularity
/// (e.g. `?day=2024`).
fn period_matches_param(period: Period, param: &str) -> bool {
    matches!(
        (period, param),
        (Period::Year(_), "year") | (Period::Month(..), "month") | (Period::Day(..), "day")
    )
}
