//! Core types shared across the crate.

mod link;
mod request;
mod url;

pub use link::{LinkKind, is_external_link};
pub use request::{Request, Visitor};
pub use url::UrlPath;
