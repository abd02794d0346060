//! Text canonicalization and URL/filename resolution used for every comparison.
//!
//! All functions here are pure. Two raw strings are "the same content" iff their
//! [`normalize_text`] outputs are equal; two references point at the same resource
//! iff their [`resolve_absolute_url`] serializations are equal.

use crate::error::UrlError;
use url::Url;

/// Trims, collapses whitespace runs to a single space and lower-cases `raw`.
///
/// Whitespace-only input yields an empty string, which callers treat as
/// "no comparable text".
///
/// ```
/// use pagediff::normalize::normalize_text;
///
/// assert_eq!(normalize_text("  Buy \n\t NOW "), "buy now");
/// assert_eq!(normalize_text(" \n "), "");
/// ```
pub fn normalize_text(raw: &str) -> String {
    // Whole-string lowering so context-sensitive mappings (final sigma) apply.
    collapse_whitespace(raw).to_lowercase()
}

/// Trims and collapses whitespace but keeps casing, for display.
pub fn collapse_whitespace(raw: &str) -> String {
    let mut buf = String::with_capacity(raw.len());
    let mut last_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !last_space && !buf.is_empty() {
                buf.push(' ');
            }
            last_space = true;
        } else {
            buf.push(ch);
            last_space = false;
        }
    }
    if buf.ends_with(' ') {
        buf.pop();
    }
    buf
}

/// Resolves `reference` against the document's `base` URI.
pub fn resolve_absolute_url(base: &Url, reference: &str) -> Result<Url, UrlError> {
    base.join(reference).map_err(|source| UrlError::Invalid {
        reference: reference.to_string(),
        source,
    })
}

/// Returns the last `/`-delimited path segment of `reference` once resolved.
///
/// `None` when resolution fails or the path ends in `/`.
pub fn final_path_segment(base: &Url, reference: &str) -> Option<String> {
    let resolved = match resolve_absolute_url(base, reference) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(error = %err, "skipping unresolvable image reference");
            return None;
        }
    };
    resolved
        .path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Yields the final path segment of every candidate URL in a `srcset` attribute.
///
/// Candidates are comma separated; only the first whitespace-delimited token of
/// each (the URL, not the width/density descriptor) is resolved. Candidates that
/// are blank or fail to resolve are dropped. The iterator is `Clone`, so it can be
/// walked more than once.
pub fn srcset_candidate_names<'a>(
    base: &'a Url,
    srcset: &'a str,
) -> impl Iterator<Item = String> + Clone + 'a {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .filter_map(move |token| final_path_segment(base, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn base() -> Url {
        Url::parse("https://example.com/shop/index.html").unwrap()
    }

    #[test]
    fn collapses_and_lowercases() {
        assert_eq!(normalize_text("Welcome   Home"), "welcome home");
        assert_eq!(normalize_text("\tContact\nUs  "), "contact us");
        assert_eq!(normalize_text("ÉCOLE"), "école");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn lowercases_word_final_sigma() {
        assert_eq!(normalize_text("ΟΔΟΣ"), "οδος");
        assert_eq!(normalize_text("  ΟΔΟΣ   ΣΟΦΙΑΣ "), "οδος σοφιας");
    }

    #[test]
    fn collapse_keeps_case() {
        assert_eq!(collapse_whitespace("  Buy\n  Now "), "Buy Now");
    }

    #[test]
    fn resolves_relative_references() {
        let url = resolve_absolute_url(&base(), "../cart?x=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/cart?x=1");

        let url = resolve_absolute_url(&base(), "https://other.org/a").unwrap();
        assert_eq!(url.as_str(), "https://other.org/a");
    }

    #[test]
    fn rejects_unparseable_references() {
        let err = resolve_absolute_url(&base(), "http://[::1").unwrap_err();
        assert!(matches!(err, UrlError::Invalid { ref reference, .. } if reference == "http://[::1"));
    }

    #[test]
    fn final_segment_of_resolved_path() {
        assert_eq!(
            final_path_segment(&base(), "/img/logo-v1.png?w=20"),
            Some("logo-v1.png".to_string())
        );
        assert_eq!(final_path_segment(&base(), "/img/"), None);
        assert_eq!(final_path_segment(&base(), "http://[::1"), None);
    }

    #[test]
    fn srcset_names_skip_descriptors_and_bad_entries() {
        let base = base();
        let srcset = "/img/hero-480.jpg 480w, http://[::1 2x, , /img/hero-960.jpg 960w";
        let names: Vec<String> = srcset_candidate_names(&base, srcset).collect();
        assert_eq!(names, vec!["hero-480.jpg", "hero-960.jpg"]);
    }

    #[test]
    fn srcset_names_can_be_walked_twice() {
        let base = base();
        let names = srcset_candidate_names(&base, "a.png 1x, b.png 2x");
        assert_eq!(names.clone().count(), 2);
        assert_eq!(names.collect::<Vec<_>>(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn empty_srcset_yields_nothing() {
        let base = base();
        assert_eq!(srcset_candidate_names(&base, "").count(), 0);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "[ \t\r\nA-Za-z0-9ÀÉéßΣσ.,!?-]{0,64}") {
            let once = normalize_text(&raw);
            prop_assert_eq!(normalize_text(&once), once.clone());
        }

        #[test]
        fn normalized_text_has_no_edge_or_double_spaces(raw in "\\PC{0,64}") {
            let out = normalize_text(&raw);
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
