use serde::Deserialize;

/// Main configuration structure for Profile-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Categories to crawl, in order
    pub categories: Vec<String>,
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Concurrency and timeout settings
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Listing pages fetched per batch
    #[serde(rename = "listing-concurrency", default = "default_concurrency")]
    pub listing_concurrency: u32,

    /// Maximum profile fetches in flight
    #[serde(rename = "profile-concurrency", default = "default_concurrency")]
    pub profile_concurrency: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_concurrency: default_concurrency(),
            profile_concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Where the listing pages live and how to read them
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Listing URL with `{category}` and `{page}` placeholders
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Path prefix of profile links, e.g. `/en/teacher`
    #[serde(rename = "profile-path")]
    pub profile_path: String,

    /// Text that appears on a listing page past the last result
    #[serde(rename = "end-marker")]
    pub end_marker: String,
}

/// CSS selectors used on profile pages
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Name followed by rating, students, lessons, attendance, response
    #[serde(default = "default_headline_selector")]
    pub headline: String,

    #[serde(default = "default_reviews_selector")]
    pub reviews: String,

    #[serde(default = "default_price_selector")]
    pub price: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            headline: default_headline_selector(),
            reviews: default_reviews_selector(),
            price: default_price_selector(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_concurrency() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_headline_selector() -> String {
    ".h4".to_string()
}

fn default_reviews_selector() -> String {
    "#reviews .text-gray1".to_string()
}

fn default_price_selector() -> String {
    ".text-lg.font-bold".to_string()
}
