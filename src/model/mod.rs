//! Data model shared by the crawl and extraction stages
//!
//! - `ProfileLink`: one profile URL found under one category
//! - `CategoryMembership`: which categories an entity was listed under
//! - `ProfileData` / `EntityRecord`: parsed and normalized profile contents

pub mod category;
mod link;
mod record;

pub use link::{CategoryMembership, ProfileLink};
pub use record::{EntityRecord, HeadlineMetrics, ProfileData};
