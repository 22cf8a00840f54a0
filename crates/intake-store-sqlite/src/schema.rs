//! SQL schema for the Intake SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS facilities (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

-- Records are never deleted by the pipeline; only `stage` is rewritten.
CREATE TABLE IF NOT EXISTS admissions (
    id                  TEXT PRIMARY KEY,
    student_name        TEXT NOT NULL,
    parent_name         TEXT,
    student_phone       TEXT,
    parent_phone        TEXT,
    email               TEXT,
    date_of_birth       TEXT,            -- YYYY-MM-DD
    address             TEXT,
    facility_id         TEXT REFERENCES facilities(id),
    first_contact_date  TEXT,            -- YYYY-MM-DD
    stage               TEXT NOT NULL DEFAULT 'initial_contact'
                        CHECK (stage IN ('initial_contact', 'consultation',
                                         'trial_lesson', 'closed_won',
                                         'closed_lost')),
    assigned_to         TEXT,            -- display lookup only, not enforced
    notes               TEXT,
    created_at          TEXT NOT NULL    -- RFC 3339 UTC, fixed width
);

CREATE INDEX IF NOT EXISTS admissions_stage_idx    ON admissions(stage);
CREATE INDEX IF NOT EXISTS admissions_facility_idx ON admissions(facility_id);

PRAGMA user_version = 1;
";
