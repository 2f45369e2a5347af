//! Entity identity and canonical links derived from profile URLs
use url::Url;

/// Extracts the entity id from the first all-digit path segment
///
/// # Examples
///
/// ```
/// use profile_harvest::url::entity_id;
/// use url::Url;
///
/// let url = Url::parse("https://www.italki.com/en/teacher/7525061/spanish").unwrap();
/// assert_eq!(entity_id(&url), Some(7525061));
/// ```
pub fn entity_id(url: &Url) -> Option<u64> {
    url.path_segments()?
        .find(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))?
        .parse()
        .ok()
}

/// Strips the trailing category segment from a profile URL
///
/// `https://www.italki.com/en/teacher/7525061/spanish` becomes
/// `https://www.italki.com/en/teacher/7525061`.
pub fn canonical_url(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_query(None);
    canonical.set_fragment(None);
    if let Ok(mut segments) = canonical.path_segments_mut() {
        segments.pop_if_empty().pop();
    }
    canonical
}
