//! SQL schema for the Tally SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tasks (
    task_id        TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    description    TEXT,
    base_points    TEXT NOT NULL,             -- decimal string, e.g. '10' or '-2.5'
    frequency_type TEXT NOT NULL DEFAULT 'daily',
    frequency_max  INTEGER NOT NULL DEFAULT -1,  -- -1 = unlimited
    is_consume     INTEGER NOT NULL DEFAULT 0,
    tags           TEXT,
    created_at     TEXT NOT NULL              -- RFC 3339 UTC; server-assigned
);

-- Check-in records are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS checkin_records (
    record_id     TEXT PRIMARY KEY,
    task_id       TEXT NOT NULL REFERENCES tasks(task_id),
    checkin_date  TEXT NOT NULL,   -- YYYY-MM-DD in the reference timezone
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, fixed width; server-assigned
    times         INTEGER NOT NULL,
    earned_points TEXT NOT NULL,   -- decimal string
    buff_value    TEXT NOT NULL    -- decimal string
);

CREATE INDEX IF NOT EXISTS records_task_date_idx ON checkin_records(task_id, checkin_date);
CREATE INDEX IF NOT EXISTS records_date_idx      ON checkin_records(checkin_date);
CREATE INDEX IF NOT EXISTS records_created_idx   ON checkin_records(created_at);

PRAGMA user_version = 1;
";
