//! Run reports and database statistics
//!
//! `HarvestReport` describes one finished run; `HarvestStatistics` is read
//! back from storage for `--stats`.

use crate::crawler::CategorySummary;
use crate::storage::{LoadCounts, RunRecord, Storage, StorageResult};
use std::time::Duration;

/// Everything a finished harvest run produced
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    /// Storage run id
    pub run_id: i64,

    /// One line per crawled category, in configuration order
    pub summaries: Vec<CategorySummary>,

    /// Distinct profile links after URL deduplication
    pub links_found: usize,

    /// Distinct (entity id, category) pairs
    pub memberships_found: usize,

    pub records_extracted: usize,
    pub extraction_failures: usize,

    /// Records dropped because their id was already produced
    pub duplicates_dropped: usize,

    pub categories_loaded: LoadCounts,
    pub entities_loaded: LoadCounts,
    pub memberships_loaded: LoadCounts,

    pub elapsed: Duration,
}

/// Prints a run report to stdout
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Report (run {}) ===\n", report.run_id);

    println!("Categories:");
    for summary in &report.summaries {
        println!(
            "  {}: {} links, last page {}, {} failed pages",
            summary.category, summary.distinct_links, summary.last_page, summary.failed_pages
        );
    }
    println!();

    println!("Extraction:");
    println!("  Links found: {}", report.links_found);
    println!("  Category memberships: {}", report.memberships_found);
    println!("  Records extracted: {}", report.records_extracted);
    println!("  Failures: {}", report.extraction_failures);
    println!("  Duplicates dropped: {}", report.duplicates_dropped);
    println!();

    println!("Storage (loaded / already present):");
    print_load_line("categories", report.categories_loaded);
    print_load_line("entities", report.entities_loaded);
    print_load_line("memberships", report.memberships_loaded);
    println!();

    println!("Elapsed: {:.1}s", report.elapsed.as_secs_f64());
}

fn print_load_line(table: &str, counts: LoadCounts) {
    println!("  {}: {} / {}", table, counts.loaded, counts.skipped);
}

/// Database statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    pub total_entities: u64,
    pub total_memberships: u64,

    /// Membership count per category display name
    pub by_category: Vec<(String, u64)>,

    pub latest_run: Option<RunRecord>,
}

impl HarvestStatistics {
    /// Per-category membership counts with their share of all memberships
    ///
    /// An entity listed under several categories counts once per category,
    /// so shares are taken over memberships rather than entities.
    pub fn category_shares(&self) -> Vec<(&str, u64, f64)> {
        self.by_category
            .iter()
            .map(|(name, count)| {
                let share = if self.total_memberships > 0 {
                    (*count as f64 / self.total_memberships as f64) * 100.0
                } else {
                    0.0
                };
                (name.as_str(), *count, share)
            })
            .collect()
    }
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<HarvestStatistics> {
    Ok(HarvestStatistics {
        total_entities: storage.count_entities()?,
        total_memberships: storage.count_memberships()?,
        by_category: storage.count_by_category()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Entities stored: {}", stats.total_entities);
    println!("  Category memberships: {}", stats.total_memberships);
    println!();

    if !stats.by_category.is_empty() {
        println!("Memberships by Category:");
        for (name, count, share) in stats.category_shares() {
            println!("  {}: {} ({:.1}%)", name, count, share);
        }
        println!();
    }

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  Id: {}", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            if let Some(totals) = &run.totals {
                println!(
                    "  Links: {}, records: {}, failures: {}",
                    totals.links_found, totals.records_extracted, totals.extraction_failures
                );
            }
        }
        None => println!("No harvest runs recorded yet"),
    }
}
