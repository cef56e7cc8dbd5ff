//! Module extension points.
//!
//! Third parties can intercept list counting/fetching and post-process
//! assembled article views. Hooks are registered at startup and invoked
//! in registration order; for the list hooks the first non-`None` result
//! wins and the built-in store query is the fallback.

use super::ArticleView;
use crate::model::{Id, NewsItem};

/// Intercept list module counting and fetching.
///
/// Return `None` to pass on to the next hook (or the built-in query).
pub trait ListHook: Send + Sync {
    fn count_items(&self, archives: &[Id], featured: Option<bool>) -> Option<usize> {
        let _ = (archives, featured);
        None
    }

    fn fetch_items(
        &self,
        archives: &[Id],
        featured: Option<bool>,
        limit: usize,
        offset: usize,
    ) -> Option<Vec<NewsItem>> {
        let _ = (archives, featured, limit, offset);
        None
    }
}

/// Post-process an assembled article view.
pub trait ArticleHook: Send + Sync {
    fn post_process(&self, view: &mut ArticleView, item: &NewsItem);
}

/// Registered extension points, resolved at startup.
#[derive(Default)]
pub struct HookRegistry {
    list_hooks: Vec<Box<dyn ListHook>>,
    article_hooks: Vec<Box<dyn ArticleHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_list_hook(&mut self, hook: Box<dyn ListHook>) {
        self.list_hooks.push(hook);
    }

    pub fn register_article_hook(&mut self, hook: Box<dyn ArticleHook>) {
        self.article_hooks.push(hook);
    }

    /// First hook-provided count, if any.
    pub fn count_items(&self, archives: &[Id], featured: Option<bool>) -> Option<usize> {
        self.list_hooks
            .iter()
            .find_map(|hook| hook.count_items(archives, featured))
    }

    /// First hook-provided result set, if any.
    pub fn fetch_items(
        &self,
        archives: &[Id],
        featured: Option<bool>,
        limit: usize,
        offset: usize,
    ) -> Option<Vec<NewsItem>> {
        self.list_hooks
            .iter()
            .find_map(|hook| hook.fetch_items(archives, featured, limit, offset))
    }

    /// Run every article hook over a view.
    pub fn post_process(&self, view: &mut ArticleView, item: &NewsItem) {
        for hook in &self.article_hooks {
            hook.post_process(view, item);
        }
    }
}
