//! Batch-scheduled pagination over an open-ended listing
//!
//! The listing has no page count. Pages are fetched in fixed-size batches;
//! a batch is always awaited in full, then scanned in page order. The
//! first page carrying the end marker stops the scan and no further batch
//! is issued, so pages after it (in the same batch or later) never
//! contribute links. Fetch failures are not terminal.

use crate::crawler::discover::{LinkDiscoverer, PageOutcome, PageResult};
use crate::crawler::fetcher::FetchFailure;
use crate::model::ProfileLink;
use std::collections::BTreeSet;
use tokio::task::JoinHandle;

/// Everything one category's crawl produced
#[derive(Debug, Clone, Default)]
pub struct CategoryCrawl {
    pub category: String,

    /// Distinct profile links found before the end marker
    pub links: BTreeSet<ProfileLink>,

    /// The page that carried the end marker
    pub last_page: u32,

    /// Pages that failed to load and were counted as empty
    pub failed_pages: Vec<u32>,

    /// Number of batches issued
    pub batches: u32,
}

/// Drives a `LinkDiscoverer` across increasing page numbers
#[derive(Debug, Clone, Copy)]
pub struct PaginatedCrawler {
    batch_size: u32,
}

impl PaginatedCrawler {
    /// Creates a crawler issuing `batch_size` concurrent page fetches per batch
    pub fn new(batch_size: u32) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Crawls every listing page of the discoverer's category
    ///
    /// Terminates only on the end marker.
    pub async fn crawl(&self, discoverer: &LinkDiscoverer) -> CategoryCrawl {
        let mut crawl = CategoryCrawl {
            category: discoverer.category().to_string(),
            ..CategoryCrawl::default()
        };

        let mut first_page = 1u32;
        loop {
            let results = self.run_batch(discoverer, first_page).await;
            crawl.batches += 1;

            if let Some(end_page) = absorb_batch(&mut crawl, results) {
                crawl.last_page = end_page;
                break;
            }

            tracing::debug!(
                "'{}': pages {}..{} done, {} links so far",
                crawl.category,
                first_page,
                first_page + self.batch_size - 1,
                crawl.links.len()
            );
            first_page += self.batch_size;
        }

        tracing::info!(
            "All '{}' links were extracted, overall num = {}, last page = {}",
            crawl.category,
            crawl.links.len(),
            crawl.last_page
        );

        crawl
    }

    /// Issues one batch and waits for every page in it
    async fn run_batch(&self, discoverer: &LinkDiscoverer, first_page: u32) -> Vec<PageResult> {
        let handles: Vec<(u32, JoinHandle<PageResult>)> = (first_page
            ..first_page + self.batch_size)
            .map(|page| {
                let discoverer = discoverer.clone();
                (
                    page,
                    tokio::spawn(async move { discoverer.discover(page).await }),
                )
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (page, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Listing task for page {} aborted: {}", page, e);
                    results.push(PageResult {
                        page,
                        outcome: PageOutcome::Failed(FetchFailure::Network(e.to_string())),
                    });
                }
            }
        }
        results
    }
}

/// Folds a finished batch into the crawl, in page order
///
/// Returns the end page if the batch contained the end marker.
fn absorb_batch(crawl: &mut CategoryCrawl, mut results: Vec<PageResult>) -> Option<u32> {
    results.sort_by_key(|r| r.page);

    for result in results {
        match result.outcome {
            PageOutcome::Links(links) => crawl.links.extend(links),
            PageOutcome::Failed(_) => crawl.failed_pages.push(result.page),
            PageOutcome::End => return Some(result.page),
        }
    }
    None
}
