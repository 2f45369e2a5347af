//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests to fetch listing and profile documents
//! - Error classification
//!
//! There is no retry logic: a failed fetch is reported to the caller,
//! which decides how much of the run it costs.

use crate::config::Config;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the final URL and body of a successful fetch, or the reason it failed
    pub fn into_page(self) -> Result<(String, String), FetchFailure> {
        match self {
            Self::Success { final_url, body } => Ok((final_url, body)),
            Self::HttpError { status_code } => Err(FetchFailure::Status(status_code)),
            Self::NetworkError { error } => Err(FetchFailure::Network(error)),
        }
    }

    /// Returns the body of a successful fetch, or the reason it failed
    pub fn into_body(self) -> Result<String, FetchFailure> {
        self.into_page().map(|(_, body)| body)
    }
}

/// Why a fetch produced no document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    Status(u16),
    Network(String),
    InvalidUrl(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Network(error) => write!(f, "{}", error),
            Self::InvalidUrl(error) => write!(f, "invalid URL: {}", error),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is formatted as `CrawlerName/Version (+ContactURL; ContactEmail)`.
/// Request and connect timeouts come from the `[crawler]` section; a request
/// exceeding them surfaces as a `NetworkError`, never a hang.
///
/// # Example
///
/// ```no_run
/// use profile_harvest::config::load_config;
/// use profile_harvest::crawler::build_http_client;
/// use std::path::Path;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let ua = &config.user_agent;
    let user_agent = format!(
        "{}/{} (+{}; {})",
        ua.crawler_name, ua.crawler_version, ua.contact_url, ua.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | `Success` |
/// | any other status | `HttpError` |
/// | timeout / connect failure / body read failure | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success { final_url, body },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}
