//! Listing URL templates and the profile link pattern
use regex::Regex;
use url::Url;

/// Placeholder replaced by the category name in a listing URL template
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Placeholder replaced by the 1-based page number in a listing URL template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Builds the listing URL for one category page
///
/// # Examples
///
/// ```
/// use profile_harvest::url::listing_url;
///
/// let url = listing_url("https://www.italki.com/en/teachers/{category}?page={page}", "english", 3)
///     .unwrap();
/// assert_eq!(url.as_str(), "https://www.italki.com/en/teachers/english?page=3");
/// ```
pub fn listing_url(template: &str, category: &str, page: u32) -> Result<Url, url::ParseError> {
    let raw = template
        .replace(CATEGORY_PLACEHOLDER, category)
        .replace(PAGE_PLACEHOLDER, &page.to_string());
    Url::parse(&raw)
}

/// Matches profile link paths of the form `<profile-path>/<digits>/<category>`
#[derive(Debug, Clone)]
pub struct ProfilePattern {
    regex: Regex,
}

impl ProfilePattern {
    /// Compiles the pattern for one category
    ///
    /// Both inputs are escaped, so only the regex size limit can make this fail.
    pub fn new(profile_path: &str, category: &str) -> Result<Self, regex::Error> {
        let prefix = profile_path.trim_end_matches('/');
        let regex = Regex::new(&format!(
            r"^{}/\d+/{}$",
            regex::escape(prefix),
            regex::escape(category)
        ))?;
        Ok(Self { regex })
    }

    /// Returns true if the URL path is a profile link for this category
    pub fn matches_path(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}
