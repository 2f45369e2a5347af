//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Profile-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track harvest runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    links_found INTEGER,
    records_extracted INTEGER,
    extraction_failures INTEGER
);

-- Categories profiles are listed under
CREATE TABLE IF NOT EXISTS categories (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- One row per entity; unset metrics are NULL
CREATE TABLE IF NOT EXISTS entities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    rating REAL,
    student_count INTEGER,
    lesson_count INTEGER,
    attendance_pct INTEGER,
    response_pct INTEGER,
    review_count INTEGER NOT NULL DEFAULT 0,
    price REAL NOT NULL DEFAULT 0.0,
    canonical_url TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entities_price ON entities(price);
CREATE INDEX IF NOT EXISTS idx_entities_students ON entities(student_count);

-- Which categories an entity was found under
CREATE TABLE IF NOT EXISTS entity_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entity_id INTEGER NOT NULL,
    category_code TEXT NOT NULL REFERENCES categories(code),
    UNIQUE(entity_id, category_code)
);

CREATE INDEX IF NOT EXISTS idx_entity_categories_category ON entity_categories(category_code);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
