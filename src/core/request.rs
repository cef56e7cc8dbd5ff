//! Front-end request context.
//!
//! The original runtime read query parameters and the current URI from
//! ambient globals; here the request travels as an explicit value through
//! the resolver and the modules.

use rustc_hash::FxHashMap;

use crate::model::Id;

/// One front-end request: current URI, query parameters and the visitor.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Raw request URI (path + query), used as degraded URL fallback.
    pub uri: String,
    query: FxHashMap<String, String>,
    /// Authenticated front-end visitor, if any.
    pub visitor: Option<Visitor>,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            query: FxHashMap::default(),
            visitor: None,
        }
    }

    /// Add a query parameter (builder style).
    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_visitor(mut self, visitor: Visitor) -> Self {
        self.visitor = Some(visitor);
        self
    }

    /// Get a query parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// The archive month selector (`?month=YYYYMM`), if present.
    pub fn month(&self) -> Option<&str> {
        self.param("month")
    }

    /// Whether an item detail selector is present (`items` or `auto_item`).
    pub fn has_item_selector(&self, auto_item: bool) -> bool {
        self.param("items").is_some() || (auto_item && self.param("auto_item").is_some())
    }
}

/// A logged-in front-end user, reduced to what access checks need.
#[derive(Debug, Clone, Default)]
pub struct Visitor {
    pub groups: Vec<Id>,
}

impl Visitor {
    pub fn new(groups: Vec<Id>) -> Self {
        Self { groups }
    }

    /// Check membership in any of the given groups.
    pub fn in_any_group(&self, groups: &[Id]) -> bool {
        self.groups.iter().any(|g| groups.contains(g))
    }
}
