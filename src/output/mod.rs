//! Output module for run reports and database statistics

pub mod stats;

pub use stats::{load_statistics, print_report, print_statistics, HarvestReport, HarvestStatistics};
