//! URL handling module for Profile-Harvest
//!
//! This module provides listing URL templating, profile link matching,
//! entity id extraction and canonical profile URLs.

mod identity;
mod template;

pub use identity::{canonical_url, entity_id};
pub use template::{listing_url, ProfilePattern, CATEGORY_PLACEHOLDER, PAGE_PLACEHOLDER};
