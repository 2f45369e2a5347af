//! Bounded-concurrency extraction over the full link set

use crate::extract::profile::{ExtractionFailure, ProfileExtractor};
use crate::model::{EntityRecord, ProfileLink};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// What the pipeline produced
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    /// One record per entity id, in link order
    pub records: Vec<EntityRecord>,

    /// Links that produced no record, with the reason
    pub failures: Vec<(ProfileLink, ExtractionFailure)>,

    /// Records dropped because their id had already been produced
    pub duplicates: usize,
}

/// Runs a `ProfileExtractor` over many links, at most `concurrency` at a time
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    extractor: ProfileExtractor,
    concurrency: usize,
}

impl ExtractionPipeline {
    pub fn new(extractor: ProfileExtractor, concurrency: u32) -> Self {
        Self {
            extractor,
            concurrency: concurrency.max(1) as usize,
        }
    }

    /// Extracts every link and deduplicates by entity id
    ///
    /// Failures never abort sibling work and are not retried. When two links
    /// resolve to the same id, the record from the link earlier in `links`
    /// is kept, whatever order the fetches completed in.
    pub async fn extract_all(&self, links: &[ProfileLink]) -> ExtractionOutcome {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let handles: Vec<_> = links
            .iter()
            .cloned()
            .map(|link| {
                let semaphore = semaphore.clone();
                let extractor = self.extractor.clone();
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    extractor.extract(&link).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (link, handle) in links.iter().zip(handles) {
            let result = handle.await.unwrap_or_else(|e| {
                Err(ExtractionFailure::Interrupted {
                    url: link.url.to_string(),
                    reason: e.to_string(),
                })
            });
            results.push((link.clone(), result));
        }

        let outcome = collect_records(results);

        tracing::info!(
            "Extraction finished: {} records, {} failures, {} duplicates dropped",
            outcome.records.len(),
            outcome.failures.len(),
            outcome.duplicates
        );

        outcome
    }
}

/// Splits ordered results into records and failures, keeping the first record per id
fn collect_records(
    results: Vec<(ProfileLink, Result<EntityRecord, ExtractionFailure>)>,
) -> ExtractionOutcome {
    let mut seen = HashSet::new();
    let mut outcome = ExtractionOutcome::default();

    for (link, result) in results {
        match result {
            Ok(record) => {
                if seen.insert(record.id) {
                    tracing::debug!("Extracted {} ({})", record.id, record.name);
                    outcome.records.push(record);
                } else {
                    outcome.duplicates += 1;
                }
            }
            Err(failure) => {
                tracing::warn!("Dropping {}: {}", link.url, failure);
                outcome.failures.push((link, failure));
            }
        }
    }

    outcome
}
