//! SQL schema for the Locus SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! `site_id` columns (and the user references on audit columns) are weak:
//! there is deliberately no FOREIGN KEY clause, so deleting a site neither
//! cascades nor blocks, and an orphaned reference is a tolerated state.
//! `AUTOINCREMENT` keeps every id monotonically increasing and never
//! reused, even after deletion.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string, never plaintext
    name          TEXT NOT NULL,
    role          TEXT NOT NULL,
    email         TEXT,
    phone         TEXT,
    active        INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS sites (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    site_code          TEXT NOT NULL UNIQUE,   -- e.g. 'CLC-001'
    name               TEXT NOT NULL,
    site_type          TEXT NOT NULL,
    district           TEXT NOT NULL,
    address            TEXT,
    latitude           REAL,
    longitude          REAL,
    operational_status TEXT NOT NULL,
    assessment_status  TEXT NOT NULL,
    classrooms         INTEGER NOT NULL DEFAULT 0,
    offices            INTEGER NOT NULL DEFAULT 0,
    labs               INTEGER NOT NULL DEFAULT 0,
    workshops          INTEGER NOT NULL DEFAULT 0,
    cond_building      TEXT NOT NULL DEFAULT 'not_assessed',
    cond_electrical    TEXT NOT NULL DEFAULT 'not_assessed',
    cond_plumbing      TEXT NOT NULL DEFAULT 'not_assessed',
    cond_interior      TEXT NOT NULL DEFAULT 'not_assessed',
    cond_exterior      TEXT NOT NULL DEFAULT 'not_assessed',
    notes              TEXT,
    images             TEXT NOT NULL DEFAULT '[]',  -- JSON list of URLs
    created_by         INTEGER NOT NULL,            -- weak ref, users.id
    last_visited_by    INTEGER,
    last_visit_date    TEXT                         -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS staff (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_code     TEXT NOT NULL UNIQUE,
    first_name     TEXT NOT NULL,
    last_name      TEXT NOT NULL,
    position       TEXT NOT NULL,
    department     TEXT,
    email          TEXT,
    phone          TEXT,
    verified       INTEGER NOT NULL DEFAULT 0,
    qualifications TEXT NOT NULL DEFAULT '[]',
    skills         TEXT NOT NULL DEFAULT '[]',
    workload       INTEGER,
    site_id        INTEGER                       -- weak ref, sites.id
);

CREATE TABLE IF NOT EXISTS assets (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    asset_code       TEXT NOT NULL UNIQUE,
    name             TEXT NOT NULL,
    category         TEXT NOT NULL,
    kind             TEXT,
    manufacturer     TEXT,
    model            TEXT,
    serial_numbers   TEXT NOT NULL DEFAULT '[]',
    purchase_date    TEXT,                       -- ISO 8601 date
    purchase_price   REAL,
    condition        TEXT NOT NULL,
    location         TEXT,
    assigned_to      TEXT,
    last_maintenance TEXT,
    next_maintenance TEXT,
    notes            TEXT,
    images           TEXT NOT NULL DEFAULT '[]',
    site_id          INTEGER                     -- weak ref, sites.id
);

CREATE TABLE IF NOT EXISTS programs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    program_code TEXT NOT NULL UNIQUE,
    name         TEXT NOT NULL,
    category     TEXT,
    description  TEXT,
    enrollment   INTEGER NOT NULL DEFAULT 0,
    start_date   TEXT,
    end_date     TEXT,
    status       TEXT NOT NULL,
    notes        TEXT,
    site_id      INTEGER                         -- weak ref, sites.id
);

-- The audit log is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS activities (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    kind         TEXT NOT NULL,
    description  TEXT NOT NULL,
    related_type TEXT,            -- 'site' | 'staff' | 'asset' | 'program'
    related_id   INTEGER,         -- weak ref into the table named above
    performed_by INTEGER NOT NULL,
    recorded_at  TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS recommendations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    site_id     INTEGER,
    status      TEXT NOT NULL DEFAULT 'open',
    recorded_by INTEGER NOT NULL,
    recorded_at TEXT NOT NULL
);

PRAGMA user_version = 1;
";
