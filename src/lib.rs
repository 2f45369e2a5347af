//! Profile-Harvest: a paginated profile crawler
//!
//! This crate discovers profile links across an open-ended run of listing
//! pages per category, fetches every profile, and extracts normalized
//! records deduplicated by entity id.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Profile-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Link pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector for {field}: '{selector}'")]
    InvalidSelector { field: &'static str, selector: String },

    #[error("'{category}' is not a supported category (supported: {})", supported.join(", "))]
    UnsupportedCategory {
        category: String,
        supported: Vec<&'static str>,
    },
}

/// Result type alias for Profile-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::ExtractionFailure;
pub use model::{CategoryMembership, EntityRecord, ProfileLink};
