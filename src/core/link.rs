//! Link classification utilities.

/// Syntactic classification of links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, tel:, data:, etc.)
    External(&'a str),
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Site-root-relative path (/about, /news/hello).
    SiteRoot(&'a str),
    /// File-relative path (./image.png, ../other).
    FileRelative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) {
            Self::External(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::FileRelative(link)
        }
    }

    /// Check if link is HTTP/HTTPS.
    #[inline]
    pub fn is_http(link: &str) -> bool {
        link.starts_with("http://") || link.starts_with("https://")
    }

    /// Check if link is a `mailto:` address.
    #[inline]
    pub fn is_mailto(link: &str) -> bool {
        link.len() >= 7 && link[..7].eq_ignore_ascii_case("mailto:")
    }
}

/// Check whether a link carries a URL scheme (`scheme:`...).
///
/// Schemes are `[a-zA-Z][a-zA-Z0-9+.-]*` per RFC 3986. Windows-style
/// single letters before `:` never occur in content here, so any valid
/// scheme prefix counts as external.
pub fn is_external_link(link: &str) -> bool {
    let Some((scheme, _)) = link.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}
