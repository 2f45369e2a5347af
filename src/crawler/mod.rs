//! Crawler module for listing discovery and run orchestration
//!
//! This module contains the crawling side of a harvest, including:
//! - HTTP fetching without retries
//! - HTML parsing and profile link extraction
//! - Batch-scheduled pagination per category
//! - Cross-category link aggregation
//! - Overall run coordination

mod aggregate;
mod coordinator;
mod discover;
mod fetcher;
mod paginate;
mod parser;

pub use aggregate::{AggregatedLinks, CategorySummary, LinkAggregator};
pub use coordinator::{run_harvest, Coordinator};
pub use discover::{classify_listing, LinkDiscoverer, PageOutcome, PageResult};
pub use fetcher::{build_http_client, fetch_url, FetchFailure, FetchResult};
pub use paginate::{CategoryCrawl, PaginatedCrawler};
pub use parser::{extract_profile_links, parse_document, select_first_text, select_texts};
