//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::category::{category_code, display_name};
use crate::model::{CategoryMembership, EntityRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{LoadCounts, RunRecord, RunStatus, RunTotals};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use url::Url;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and ensures the schema exists
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// SQLite integers are signed; ids and counts above `i64::MAX` are rejected
fn to_sql_int(field: &'static str, value: u64) -> StorageResult<i64> {
    i64::try_from(value).map_err(|_| StorageError::OutOfRange { field, value })
}

fn to_sql_opt(field: &'static str, value: Option<u64>) -> StorageResult<Option<i64>> {
    value.map(|v| to_sql_int(field, v)).transpose()
}

fn from_sql_int(value: i64) -> u64 {
    value.max(0) as u64
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status,
                    links_found, records_extracted, extraction_failures
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                let links: Option<i64> = row.get(5)?;
                let records: Option<i64> = row.get(6)?;
                let failures: Option<i64> = row.get(7)?;
                let totals = match (links, records, failures) {
                    (Some(l), Some(r), Some(f)) => Some(RunTotals {
                        links_found: from_sql_int(l),
                        records_extracted: from_sql_int(r),
                        extraction_failures: from_sql_int(f),
                    }),
                    _ => None,
                };

                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Failed),
                    totals,
                })
            })
            .optional()?;

        Ok(run)
    }

    fn update_run_status(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1 WHERE id = ?2",
            params![status.to_db_string(), run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2,
                 links_found = ?3, records_extracted = ?4, extraction_failures = ?5
             WHERE id = ?6",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                to_sql_int("links_found", totals.links_found)?,
                to_sql_int("records_extracted", totals.records_extracted)?,
                to_sql_int("extraction_failures", totals.extraction_failures)?,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Loading =====

    fn insert_categories(&mut self, categories: &[String]) -> StorageResult<LoadCounts> {
        let tx = self.conn.transaction()?;
        let mut counts = LoadCounts::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO categories (code, name) VALUES (?1, ?2)
                 ON CONFLICT(code) DO NOTHING",
            )?;
            for category in categories {
                let code = category_code(category)
                    .ok_or_else(|| StorageError::UnknownCategory(category.clone()))?;
                if stmt.execute(params![code, display_name(category)])? > 0 {
                    counts.loaded += 1;
                } else {
                    counts.skipped += 1;
                }
            }
        }
        tx.commit()?;
        Ok(counts)
    }

    fn insert_entities(&mut self, records: &[EntityRecord]) -> StorageResult<LoadCounts> {
        let tx = self.conn.transaction()?;
        let mut counts = LoadCounts::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entities (id, name, rating, student_count, lesson_count,
                     attendance_pct, response_pct, review_count, price, canonical_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO NOTHING",
            )?;
            for record in records {
                let inserted = stmt.execute(params![
                    to_sql_int("id", record.id)?,
                    record.name,
                    record.rating,
                    to_sql_opt("student_count", record.student_count)?,
                    to_sql_opt("lesson_count", record.lesson_count)?,
                    record.attendance_pct,
                    record.response_pct,
                    to_sql_int("review_count", record.review_count)?,
                    record.price,
                    record.canonical_url.as_str(),
                ])?;
                if inserted > 0 {
                    counts.loaded += 1;
                } else {
                    counts.skipped += 1;
                }
            }
        }
        tx.commit()?;
        Ok(counts)
    }

    fn insert_memberships(
        &mut self,
        memberships: &[CategoryMembership],
    ) -> StorageResult<LoadCounts> {
        let tx = self.conn.transaction()?;
        let mut counts = LoadCounts::default();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO entity_categories (entity_id, category_code) VALUES (?1, ?2)
                 ON CONFLICT(entity_id, category_code) DO NOTHING",
            )?;
            for membership in memberships {
                let code = category_code(&membership.category)
                    .ok_or_else(|| StorageError::UnknownCategory(membership.category.clone()))?;
                if stmt.execute(params![to_sql_int("entity_id", membership.entity_id)?, code])? > 0
                {
                    counts.loaded += 1;
                } else {
                    counts.skipped += 1;
                }
            }
        }
        tx.commit()?;
        Ok(counts)
    }

    // ===== Queries =====

    fn get_entity(&self, id: u64) -> StorageResult<Option<EntityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, rating, student_count, lesson_count, attendance_pct,
                    response_pct, review_count, price, canonical_url
             FROM entities WHERE id = ?1",
        )?;

        let row = stmt
            .query_row(params![to_sql_int("id", id)?], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                    row.get::<_, Option<u32>>(5)?,
                    row.get::<_, Option<u32>>(6)?,
                    row.get::<_, i64>(7)?,
                    row.get::<_, f64>(8)?,
                    row.get::<_, String>(9)?,
                ))
            })
            .optional()?;

        let Some((
            id,
            name,
            rating,
            student_count,
            lesson_count,
            attendance_pct,
            response_pct,
            review_count,
            price,
            canonical_url,
        )) = row
        else {
            return Ok(None);
        };

        let canonical_url = Url::parse(&canonical_url)
            .map_err(|e| StorageError::Serialization(format!("bad canonical_url: {}", e)))?;

        Ok(Some(EntityRecord {
            id: from_sql_int(id),
            name,
            rating,
            student_count: student_count.map(from_sql_int),
            lesson_count: lesson_count.map(from_sql_int),
            attendance_pct,
            response_pct,
            review_count: from_sql_int(review_count),
            price,
            canonical_url,
        }))
    }

    fn count_entities(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entities", [], |row| row.get(0))?;
        Ok(from_sql_int(count))
    }

    fn count_memberships(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM entity_categories", [], |row| {
                    row.get(0)
                })?;
        Ok(from_sql_int(count))
    }

    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, COUNT(ec.id)
             FROM categories c
             LEFT JOIN entity_categories ec ON ec.category_code = c.code
             GROUP BY c.code
             ORDER BY c.name",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, from_sql_int(row.get(1)?)))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
