//! Integration tests for Profile-Harvest
//!
//! These tests use wiremock to stand in for the listing and profile pages
//! and drive the crawl and extraction stages end-to-end.

mod common;
mod crawl_tests;
mod extract_tests;
mod harvest_tests;
