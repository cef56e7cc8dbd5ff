//! Alias slug generation.
//!
//! Items and feeds without an explicit alias get one derived from their
//! headline/title: Unicode transliterated to ASCII, lowercased, runs of
//! non-alphanumeric characters collapsed to a single dash.

use deunicode::deunicode;

/// Slugify a headline into a URL-safe alias.
pub fn slugify(s: &str) -> String {
    let ascii = deunicode(s);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Breaking: News!  "), "breaking-news");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Über uns"), "uber-uns");
        assert_eq!(slugify("Çà et là"), "ca-et-la");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("--a--"), "a");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
