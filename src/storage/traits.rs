//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::{CategoryMembership, EntityRecord};
use crate::storage::{LoadCounts, RunRecord, RunStatus, RunTotals};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Value out of range for {field}: {value}")]
    OutOfRange { field: &'static str, value: u64 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every bulk insert is insert-if-absent: rows whose key already exists are
/// left untouched and counted as skipped.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Updates the status of a run
    fn update_run_status(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Marks a run as completed with its totals and a finish timestamp
    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()>;

    // ===== Loading =====

    /// Inserts the given categories (by name) with their codes
    fn insert_categories(&mut self, categories: &[String]) -> StorageResult<LoadCounts>;

    /// Inserts entity records keyed by id
    fn insert_entities(&mut self, records: &[EntityRecord]) -> StorageResult<LoadCounts>;

    /// Inserts (entity id, category) pairs
    fn insert_memberships(
        &mut self,
        memberships: &[CategoryMembership],
    ) -> StorageResult<LoadCounts>;

    // ===== Queries =====

    /// Gets one entity by id
    fn get_entity(&self, id: u64) -> StorageResult<Option<EntityRecord>>;

    /// Counts stored entities
    fn count_entities(&self) -> StorageResult<u64>;

    /// Counts stored memberships
    fn count_memberships(&self) -> StorageResult<u64>;

    /// Counts memberships per category name, ordered by name
    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>>;
}
