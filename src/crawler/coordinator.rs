//! Harvest coordinator - top-level run orchestration
//!
//! A run walks through these steps in order:
//! - Crawling every category's listing pages into one link set
//! - Extracting a record from every profile link
//! - Persisting categories, entities and memberships
//! - Closing the run with its totals

use crate::config::{validate, Config};
use crate::crawler::aggregate::{AggregatedLinks, LinkAggregator};
use crate::crawler::fetcher::build_http_client;
use crate::extract::{ExtractionOutcome, ExtractionPipeline, ProfileExtractor, ProfileSelectors};
use crate::model::ProfileLink;
use crate::output::HarvestReport;
use crate::storage::{RunStatus, RunTotals, SqliteStorage, Storage};
use crate::HarvestError;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    storage: SqliteStorage,
    client: Client,
    config_hash: String,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, opens the database and builds the
    /// shared HTTP client. Nothing is fetched yet.
    pub fn new(config: Config, config_hash: impl Into<String>) -> Result<Self, HarvestError> {
        validate(&config)?;

        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let client = build_http_client(&config)?;

        Ok(Self {
            config: Arc::new(config),
            storage,
            client,
            config_hash: config_hash.into(),
        })
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Crawls every configured category and merges the links
    pub async fn harvest_links(&self) -> Result<AggregatedLinks, HarvestError> {
        let aggregator = LinkAggregator::new(
            self.client.clone(),
            self.config.site.clone(),
            self.config.crawler.listing_concurrency,
        );
        aggregator.aggregate_all(&self.config.categories).await
    }

    /// Extracts one record per entity from the given links
    pub async fn extract_records(
        &self,
        links: &[ProfileLink],
    ) -> Result<ExtractionOutcome, HarvestError> {
        let selectors = ProfileSelectors::compile(&self.config.selectors)?;
        let extractor = ProfileExtractor::new(self.client.clone(), selectors);
        let pipeline = ExtractionPipeline::new(extractor, self.config.crawler.profile_concurrency);
        Ok(pipeline.extract_all(links).await)
    }

    /// Runs a full harvest and records it in storage
    ///
    /// A run that fails part-way is marked `failed`; rows already loaded
    /// before the failure stay in the database.
    pub async fn run(&mut self) -> Result<HarvestReport, HarvestError> {
        let run_id = self.storage.create_run(&self.config_hash)?;
        tracing::info!("Starting harvest run {}", run_id);

        match self.run_inner(run_id).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!("Harvest run {} failed: {}", run_id, e);
                if let Err(mark_err) = self.storage.update_run_status(run_id, RunStatus::Failed) {
                    tracing::warn!("Could not mark run {} as failed: {}", run_id, mark_err);
                }
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self, run_id: i64) -> Result<HarvestReport, HarvestError> {
        let start_time = Instant::now();

        let aggregated = self.harvest_links().await?;
        let outcome = self.extract_records(&aggregated.links).await?;

        let categories_loaded = self.storage.insert_categories(&self.config.categories)?;
        tracing::info!(
            "Categories: {} loaded, {} already present",
            categories_loaded.loaded,
            categories_loaded.skipped
        );

        let entities_loaded = self.storage.insert_entities(&outcome.records)?;
        tracing::info!(
            "Entities: {} loaded, {} already present",
            entities_loaded.loaded,
            entities_loaded.skipped
        );

        let memberships_loaded = self.storage.insert_memberships(&aggregated.memberships)?;
        tracing::info!(
            "Memberships: {} loaded, {} already present",
            memberships_loaded.loaded,
            memberships_loaded.skipped
        );

        let totals = RunTotals {
            links_found: aggregated.links.len() as u64,
            records_extracted: outcome.records.len() as u64,
            extraction_failures: outcome.failures.len() as u64,
        };
        self.storage.complete_run(run_id, &totals)?;

        let elapsed = start_time.elapsed();
        tracing::info!("Harvest run {} completed in {:?}", run_id, elapsed);

        Ok(HarvestReport {
            run_id,
            summaries: aggregated.summaries,
            links_found: aggregated.links.len(),
            memberships_found: aggregated.memberships.len(),
            records_extracted: outcome.records.len(),
            extraction_failures: outcome.failures.len(),
            duplicates_dropped: outcome.duplicates,
            categories_loaded,
            entities_loaded,
            memberships_loaded,
            elapsed,
        })
    }
}

/// Runs a complete harvest with a fresh coordinator
///
/// ```no_run
/// use profile_harvest::config::load_config_with_hash;
/// use profile_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let report = run_harvest(config, hash).await?;
/// println!("{} records", report.records_extracted);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config, config_hash: String) -> Result<HarvestReport, HarvestError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
