//! SQL schema for the fredb SQLite store.
//!
//! Executed at connection startup. `PRAGMA user_version` records the schema
//! revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS series_metadata (
    series_id           TEXT PRIMARY KEY,
    title               TEXT NOT NULL,
    units               TEXT NOT NULL,
    frequency           TEXT NOT NULL,
    last_updated        TEXT,            -- RFC 3339 UTC
    seasonal_adjustment TEXT,
    observation_start   TEXT,            -- YYYY-MM-DD
    observation_end     TEXT,            -- YYYY-MM-DD
    popularity          INTEGER,
    notes               TEXT
);

-- (series_id, date) is the only uniqueness constraint.
CREATE TABLE IF NOT EXISTS observations (
    series_id TEXT NOT NULL REFERENCES series_metadata(series_id),
    date      TEXT NOT NULL,             -- YYYY-MM-DD
    value     REAL,                      -- NULL for the provider's missing marker
    PRIMARY KEY (series_id, date)
);

-- Append-only; no UPDATE or DELETE is ever issued against this table.
-- No foreign key: failures for unknown series are logged too.
CREATE TABLE IF NOT EXISTS extraction_log (
    log_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    series_id     TEXT NOT NULL,
    extracted_at  TEXT NOT NULL,         -- RFC 3339 UTC; store-assigned
    status        TEXT NOT NULL,         -- 'success' | 'failure'
    row_count     INTEGER,
    error_message TEXT
);

PRAGMA user_version = 1;
";
