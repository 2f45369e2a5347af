//! Turning one profile page into one `EntityRecord`

use crate::config::SelectorConfig;
use crate::crawler::{fetch_url, parse_document, select_first_text, select_texts, FetchFailure};
use crate::extract::normalize::{first_decimal, first_integer, parse_count, parse_rating};
use crate::model::{EntityRecord, HeadlineMetrics, ProfileData, ProfileLink};
use crate::ConfigError;
use reqwest::Client;
use scraper::Selector;
use std::sync::Arc;
use thiserror::Error;

/// Headline fields after the name, in page order
const METRIC_FIELDS: [&str; 5] = ["rating", "students", "lessons", "attendance", "response"];

/// Why a profile produced no record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionFailure {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: FetchFailure },

    #[error("no entity id in {url}")]
    MalformedLink { url: String },

    #[error("{field} missing on {url}")]
    MissingField { url: String, field: &'static str },

    #[error("{field} on {url} is not a number: '{value}'")]
    MalformedValue {
        url: String,
        field: &'static str,
        value: String,
    },

    #[error("extraction of {url} was interrupted: {reason}")]
    Interrupted { url: String, reason: String },
}

impl ExtractionFailure {
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. }
            | Self::MalformedLink { url }
            | Self::MissingField { url, .. }
            | Self::MalformedValue { url, .. }
            | Self::Interrupted { url, .. } => url,
        }
    }
}

/// Compiled profile page selectors
#[derive(Debug, Clone)]
pub struct ProfileSelectors {
    headline: Selector,
    reviews: Selector,
    price: Selector,
}

impl ProfileSelectors {
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let compile = |field: &'static str, selector: &str| {
            Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
                field,
                selector: selector.to_string(),
            })
        };

        Ok(Self {
            headline: compile("headline", &config.headline)?,
            reviews: compile("reviews", &config.reviews)?,
            price: compile("price", &config.price)?,
        })
    }
}

/// Fetches and parses profile pages
///
/// Cheap to clone: the client and selectors are shared.
#[derive(Debug, Clone)]
pub struct ProfileExtractor {
    client: Client,
    selectors: Arc<ProfileSelectors>,
}

impl ProfileExtractor {
    pub fn new(client: Client, selectors: ProfileSelectors) -> Self {
        Self {
            client,
            selectors: Arc::new(selectors),
        }
    }

    /// Extracts one record
    ///
    /// The entity id is checked before any request: a link without one is
    /// `MalformedLink` and never fetched.
    pub async fn extract(&self, link: &ProfileLink) -> Result<EntityRecord, ExtractionFailure> {
        let id = link.entity_id().ok_or_else(|| ExtractionFailure::MalformedLink {
            url: link.url.to_string(),
        })?;

        let body = fetch_url(&self.client, link.url.as_str())
            .await
            .into_body()
            .map_err(|reason| ExtractionFailure::Fetch {
                url: link.url.to_string(),
                reason,
            })?;

        parse_profile(&body, id, link, &self.selectors)
    }
}

/// Parses a fetched profile document
pub fn parse_profile(
    body: &str,
    id: u64,
    link: &ProfileLink,
    selectors: &ProfileSelectors,
) -> Result<EntityRecord, ExtractionFailure> {
    let document = parse_document(body);
    let url = link.url.as_str();

    let headline = select_texts(&document, &selectors.headline);
    let data = parse_headline(&headline, url)?;

    let review_count = select_first_text(&document, &selectors.reviews)
        .and_then(|text| first_integer(&text))
        .unwrap_or(0);

    let price = select_first_text(&document, &selectors.price)
        .and_then(|text| first_decimal(&text))
        .unwrap_or(0.0);

    Ok(EntityRecord::from_profile(
        id,
        data,
        review_count,
        price,
        link.canonical_url(),
    ))
}

/// Reads the headline values: the name, then optionally the five metrics
///
/// A lone name is the `NameOnly` shape. A name followed by fewer than five
/// metrics is a missing field; values past the fifth are ignored.
pub fn parse_headline(values: &[String], url: &str) -> Result<ProfileData, ExtractionFailure> {
    let name = match values.first() {
        Some(name) if !name.is_empty() => name.clone(),
        _ => {
            return Err(ExtractionFailure::MissingField {
                url: url.to_string(),
                field: "name",
            })
        }
    };

    if values.len() == 1 {
        return Ok(ProfileData::NameOnly { name });
    }

    if values.len() <= METRIC_FIELDS.len() {
        return Err(ExtractionFailure::MissingField {
            url: url.to_string(),
            field: METRIC_FIELDS[values.len() - 1],
        });
    }

    let malformed = |field: &'static str, value: &str| ExtractionFailure::MalformedValue {
        url: url.to_string(),
        field,
        value: value.to_string(),
    };

    let rating = parse_rating(&values[1]).map_err(|_| malformed("rating", &values[1]))?;
    let student_count = parse_count(&values[2]).map_err(|_| malformed("students", &values[2]))?;
    let lesson_count = parse_count(&values[3]).map_err(|_| malformed("lessons", &values[3]))?;
    let attendance_pct = percentage(&values[4]).ok_or_else(|| malformed("attendance", &values[4]))?;
    let response_pct = percentage(&values[5]).ok_or_else(|| malformed("response", &values[5]))?;

    Ok(ProfileData::Full {
        name,
        metrics: HeadlineMetrics {
            rating,
            student_count,
            lesson_count,
            attendance_pct,
            response_pct,
        },
    })
}

fn percentage(text: &str) -> Option<u32> {
    first_integer(text).and_then(|value| u32::try_from(value).ok())
}
