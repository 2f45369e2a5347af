//! HTML parser for extracting profile links and text values
//!
//! This module handles parsing HTML content to extract:
//! - Profile links matching a category pattern
//! - Trimmed text of elements matching a CSS selector

use crate::model::ProfileLink;
use crate::url::ProfilePattern;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Parses a raw document into a queryable tree
///
/// Parsing is lenient: malformed markup still yields a tree, so there is
/// no error case. `Html` is not `Send`; keep it out of `.await` spans.
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extracts every profile link for `category` from a listing page
///
/// # Link Extraction Rules
///
/// - any element carrying an `href` attribute is considered
/// - hrefs are resolved against `base_url`
/// - the resolved URL must stay on the listing host
/// - its path must match `<profile-path>/<digits>/<category>` exactly
///
/// Query strings and fragments are dropped so the same profile linked
/// twice collapses to one entry.
pub fn extract_profile_links(
    document: &Html,
    base_url: &Url,
    pattern: &ProfilePattern,
    category: &str,
) -> BTreeSet<ProfileLink> {
    let mut links = BTreeSet::new();

    let Ok(href_selector) = Selector::parse("[href]") else {
        return links;
    };

    for element in document.select(&href_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(mut absolute) = resolve_link(href, base_url) else {
            continue;
        };

        if absolute.host_str() != base_url.host_str() || !pattern.matches_path(absolute.path()) {
            continue;
        }

        absolute.set_query(None);
        absolute.set_fragment(None);
        links.insert(ProfileLink::new(absolute, category));
    }

    links
}

/// Returns the trimmed text of every element matching `selector`, in document order
pub fn select_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// Returns the trimmed text of the first element matching `selector`
pub fn select_first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}
