//! Link discovery on a single listing page

use crate::config::SiteConfig;
use crate::crawler::fetcher::{fetch_url, FetchFailure};
use crate::crawler::parser::{extract_profile_links, parse_document};
use crate::model::ProfileLink;
use crate::url::{listing_url, ProfilePattern};
use reqwest::Client;
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// What one listing page contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Profile links found on the page (possibly none)
    Links(BTreeSet<ProfileLink>),

    /// The page carries the end-of-results marker; pagination is over
    End,

    /// The page could not be fetched; it contributes nothing but is not terminal
    Failed(FetchFailure),
}

/// A page number together with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub page: u32,
    pub outcome: PageOutcome,
}

/// Discovers the profile links of one category, one listing page at a time
///
/// Cheap to clone: the HTTP client and site configuration are shared.
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    client: Client,
    site: Arc<SiteConfig>,
    category: String,
    pattern: ProfilePattern,
}

impl LinkDiscoverer {
    pub fn new(
        client: Client,
        site: Arc<SiteConfig>,
        category: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let category = category.into();
        let pattern = ProfilePattern::new(&site.profile_path, &category)?;
        Ok(Self {
            client,
            site,
            category,
            pattern,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Fetches listing page `page` and classifies it
    pub async fn discover(&self, page: u32) -> PageResult {
        let url = match listing_url(&self.site.listing_url, &self.category, page) {
            Ok(url) => url,
            Err(e) => {
                return PageResult {
                    page,
                    outcome: PageOutcome::Failed(FetchFailure::InvalidUrl(e.to_string())),
                }
            }
        };

        let outcome = match fetch_url(&self.client, url.as_str()).await.into_page() {
            Ok((final_url, body)) => {
                // Relative links resolve against the page actually served
                let base = Url::parse(&final_url).unwrap_or_else(|_| url.clone());
                classify_listing(
                    &body,
                    &base,
                    &self.site.end_marker,
                    &self.pattern,
                    &self.category,
                )
            }
            Err(failure) => {
                tracing::warn!(
                    "Listing page {} for '{}' did not load ({}): counting it as empty",
                    page,
                    self.category,
                    failure
                );
                PageOutcome::Failed(failure)
            }
        };

        PageResult { page, outcome }
    }
}

/// Classifies a fetched listing body
///
/// The end marker wins over any links on the same page: a page saying
/// "no results" contributes nothing.
pub fn classify_listing(
    body: &str,
    base_url: &Url,
    end_marker: &str,
    pattern: &ProfilePattern,
    category: &str,
) -> PageOutcome {
    if body.contains(end_marker) {
        return PageOutcome::End;
    }

    let document = parse_document(body);
    PageOutcome::Links(extract_profile_links(&document, base_url, pattern, category))
}
