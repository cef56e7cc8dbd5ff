//! HTML utility functions.
//!
//! Provides common HTML processing functions:
//! - `escape()` - HTML entity escaping for attribute/text content
//! - `ampersand()` - normalize bare ampersands in URLs to `&amp;`
//! - `encode_email()` - obfuscate mailto targets as hex entities
//! - `convert_relative_urls()` - rewrite relative links against a base URL

use crate::core::LinkKind;
use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Normalize ampersands for embedding a URL in HTML output.
///
/// Bare `&` and already-encoded `&amp;` both become `&amp;`, so the
/// result is stable under repeated application.
pub fn ampersand(s: &str) -> String {
    static RE_AMP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)&(amp;)?").unwrap());
    RE_AMP.replace_all(s, "&amp;").into_owned()
}

/// Obfuscate a `mailto:` target by encoding the address as hex entities.
///
/// The scheme stays readable so the link still works; only the address
/// characters are hidden from naive harvesters.
pub fn encode_email(url: &str) -> String {
    match url.split_once(':') {
        Some((scheme, address)) if scheme.eq_ignore_ascii_case("mailto") => {
            let mut encoded = String::with_capacity(url.len() * 4);
            encoded.push_str("mailto:");
            for c in address.chars() {
                encoded.push_str(&format!("&#x{:X};", c as u32));
            }
            encoded
        }
        _ => url.to_string(),
    }
}

/// Rewrite relative `href`/`src` attribute values to absolute URLs.
///
/// External links, `data:`/`mailto:` schemes and pure fragments are left
/// untouched. Site-root paths (`/foo`) and file-relative paths (`foo`,
/// `./foo`) are joined onto `base`.
pub fn convert_relative_urls(html: &str, base: &str) -> String {
    static RE_URL_ATTR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(?i)\b(href|src)="([^"]*)""#).unwrap());

    let base = base.trim_end_matches('/');

    RE_URL_ATTR
        .replace_all(html, |caps: &Captures<'_>| {
            let attr = &caps[1];
            let value = &caps[2];
            match LinkKind::parse(value) {
                LinkKind::External(_) | LinkKind::Fragment(_) => caps[0].to_string(),
                LinkKind::SiteRoot(path) => format!(r#"{attr}="{base}{path}""#),
                LinkKind::FileRelative(path) => {
                    let path = path.trim_start_matches("./");
                    format!(r#"{attr}="{base}/{path}""#)
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_no_allocation_for_plain_text() {
        assert!(matches!(escape("hello world"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_ampersand_encodes_bare() {
        assert_eq!(ampersand("/news?a=1&b=2"), "/news?a=1&amp;b=2");
    }

    #[test]
    fn test_ampersand_idempotent() {
        let once = ampersand("/news?a=1&b=2");
        assert_eq!(ampersand(&once), once);
    }

    #[test]
    fn test_encode_email_mailto() {
        let encoded = encode_email("mailto:ab@c.de");
        assert!(encoded.starts_with("mailto:"));
        assert!(!encoded.contains("ab@c.de"));
        assert!(encoded.contains("&#x61;")); // 'a'
        assert!(encoded.contains("&#x40;")); // '@'
    }

    #[test]
    fn test_encode_email_passthrough_for_other_schemes() {
        assert_eq!(encode_email("https://example.com"), "https://example.com");
        assert_eq!(encode_email("no-scheme"), "no-scheme");
    }

    #[test]
    fn test_convert_relative_urls_site_root() {
        let html = r#"<a href="/files/report.pdf">report</a>"#;
        assert_eq!(
            convert_relative_urls(html, "https://example.org/"),
            r#"<a href="https://example.org/files/report.pdf">report</a>"#
        );
    }

    #[test]
    fn test_convert_relative_urls_file_relative() {
        let html = r#"<img src="images/a.png">"#;
        assert_eq!(
            convert_relative_urls(html, "https://example.org"),
            r#"<img src="https://example.org/images/a.png">"#
        );
    }

    #[test]
    fn test_convert_relative_urls_keeps_external_and_fragments() {
        let html = r##"<a href="https://other.org/x">x</a> <a href="#top">top</a> <a href="mailto:a@b.c">m</a>"##;
        assert_eq!(convert_relative_urls(html, "https://example.org"), html);
    }

    #[test]
    fn test_convert_relative_urls_mixed() {
        let html = r#"<p><a href="/a">a</a><img src="https://cdn.example/x.png"></p>"#;
        let out = convert_relative_urls(html, "https://example.org");
        assert!(out.contains(r#"href="https://example.org/a""#));
        assert!(out.contains(r#"src="https://cdn.example/x.png""#));
    }
}
