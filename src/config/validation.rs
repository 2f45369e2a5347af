use crate::config::types::{Config, CrawlerConfig, SelectorConfig, SiteConfig, UserAgentConfig};
use crate::model::category::{is_supported, SUPPORTED_CATEGORIES};
use crate::url::{listing_url, CATEGORY_PLACEHOLDER, PAGE_PLACEHOLDER};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_categories(&config.categories)?;
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_selectors(&config.selectors)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the category list
///
/// An unknown category stops the whole run: crawling it would silently
/// produce nothing.
pub fn validate_categories(categories: &[String]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in categories {
        if !is_supported(category) {
            return Err(ConfigError::UnsupportedCategory {
                category: category.clone(),
                supported: SUPPORTED_CATEGORIES.to_vec(),
            });
        }
        if !seen.insert(category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' is listed more than once",
                category
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.listing_concurrency < 1 || config.listing_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "listing_concurrency must be between 1 and 100, got {}",
            config.listing_concurrency
        )));
    }

    if config.profile_concurrency < 1 || config.profile_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "profile_concurrency must be between 1 and 100, got {}",
            config.profile_concurrency
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the listing template, profile path and end marker
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    for placeholder in [CATEGORY_PLACEHOLDER, PAGE_PLACEHOLDER] {
        if !config.listing_url.contains(placeholder) {
            return Err(ConfigError::Validation(format!(
                "listing_url must contain the {} placeholder",
                placeholder
            )));
        }
    }

    let sample = listing_url(&config.listing_url, "english", 1)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing_url: {}", e)))?;
    if sample.scheme() != "http" && sample.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "listing_url must use http or https, got '{}'",
            sample.scheme()
        )));
    }

    if !config.profile_path.starts_with('/') || config.profile_path.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "profile_path must be an absolute path, got '{}'",
            config.profile_path
        )));
    }

    if config.end_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "end_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector parses
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("headline", &config.headline),
        ("reviews", &config.reviews),
        ("price", &config.price),
    ] {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                field,
                selector: selector.clone(),
            });
        }
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &crate::config::types::OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
