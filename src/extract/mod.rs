//! Profile extraction module
//!
//! This module turns profile links into normalized records:
//! - Numeric normalization of free-text values
//! - Single-profile fetch and parse
//! - Bounded-concurrency extraction with id deduplication

mod normalize;
mod pipeline;
mod profile;

pub use normalize::{first_decimal, first_integer, parse_count, parse_rating, NormalizeError};
pub use pipeline::{ExtractionOutcome, ExtractionPipeline};
pub use profile::{
    parse_headline, parse_profile, ExtractionFailure, ProfileExtractor, ProfileSelectors,
};
